//! DCS Finance WASM frontend
//!
//! Home, borrower and lender views over the lending contract, talking to it
//! through the injected EIP-1193 wallet. Each concern lives in its own module.

pub mod components;
pub mod config;
pub mod dashboard_ops;
pub mod dom;
pub mod events;
pub mod logging;
pub mod provider;
pub mod render;
pub mod router;
pub mod state;
pub mod wallet;

use std::rc::Rc;

use anyhow::{Result, anyhow};
use dcs_contract_client::WalletProvider;
use dcs_session::WalletSession;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::provider::Eip1193Provider;
use crate::state::App;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await.map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

async fn init() -> Result<()> {
    let config = config::load().await?;
    logging::init(&config.log_level)?;
    info!(address = %config.address, chain_id = ?config.chain_id, "contract config loaded");

    let provider =
        Eip1193Provider::detect(&gloo_utils::window(), config.receipt_poll_interval_ms).map(Rc::new);
    if provider.is_none() {
        warn!("no injected wallet provider found");
    }

    let els = dom::Elements::bind().map_err(js_error)?;
    let app = App::new(els, WalletSession::new(provider.clone(), config));

    if let Some(provider) = provider {
        let listener = app.clone();
        provider.subscribe(Box::new(move |event| wallet::on_provider_event(&listener, event)));
    }

    events::bind_events(&app).map_err(js_error)?;
    router::show(&app.els, router::current());
    render::all(&app);

    wallet::connect(&app).await;
    Ok(())
}

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{value:?}")
}
