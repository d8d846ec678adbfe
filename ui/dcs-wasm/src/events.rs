//! Event binding.
//!
//! Wires all UI event listeners. To add an action, write an `async fn(&Rc<App>)`
//! handler and attach it here with `on_click_async!`.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dashboard_ops;
use crate::router;
use crate::state::App;
use crate::wallet;

/// Helper: attach async click handler to an element.
macro_rules! on_click_async {
    ($el:expr, $app:expr, $handler:expr) => {{
        let app = $app.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let app2 = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&app2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(app: &Rc<App>) -> Result<(), JsValue> {
    let els = &app.els;

    // ── Routing ──
    {
        let app2 = app.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::HashChangeEvent| {
            router::show(&app2.els, router::current());
        }) as Box<dyn FnMut(_)>);
        gloo_utils::window()
            .add_event_listener_with_callback("hashchange", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // ── Wallet ──
    on_click_async!(els.wallet_btn, app, wallet::on_wallet_button);

    // ── Borrower ──
    on_click_async!(els.request_loan_btn, app, dashboard_ops::on_request_loan);
    on_click_async!(els.repay_loan_btn, app, dashboard_ops::on_repay_loan);
    on_click_async!(els.credit_score_btn, app, dashboard_ops::on_credit_score);

    // ── Lender ──
    on_click_async!(els.create_pool_btn, app, dashboard_ops::on_create_pool);
    on_click_async!(els.add_funds_btn, app, dashboard_ops::on_add_funds);
    on_click_async!(els.pool_count_btn, app, dashboard_ops::on_pool_count);
    on_click_async!(els.list_pools_btn, app, dashboard_ops::on_list_pools);

    Ok(())
}
