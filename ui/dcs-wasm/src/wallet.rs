//! Wallet connection lifecycle as seen by the UI.

use std::rc::Rc;

use dcs_api_types::ProviderEvent;
use dcs_session::SessionChange;
use tracing::{debug, warn};

use crate::render;
use crate::state::App;

/// Request account access and bind the contract. Pages are reset on success,
/// since the previous handle has been revoked.
pub async fn connect(app: &App) {
    app.els.wallet_btn.set_disabled(true);
    app.els.wallet_btn.set_text_content(Some("Connecting..."));

    match dcs_session::connect(&app.session).await {
        Ok(_) => app.reset_pages(),
        Err(err) => debug!(error = %err, "connect attempt ended without an account"),
    }
    render::all(app);
}

pub fn disconnect(app: &App) {
    app.session.borrow_mut().disconnect();
    app.reset_pages();
    render::all(app);
}

/// The wallet button toggles between connect and disconnect.
pub async fn on_wallet_button(app: &Rc<App>) {
    let connected = app.session.borrow().account().is_some();
    if connected {
        disconnect(app);
    } else {
        connect(app).await;
    }
}

/// Apply an account or network change pushed by the provider.
pub fn on_provider_event(app: &Rc<App>, event: ProviderEvent) {
    let change = app.session.borrow_mut().handle_event(event);
    if change != SessionChange::Unchanged {
        app.reset_pages();
    }
    render::all(app);

    if change == SessionChange::ReconnectRequired {
        warn!("wallet network changed, reconnecting");
        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            connect(&app).await;
        });
    }
}
