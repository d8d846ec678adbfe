//! Writes page and session state back into the DOM.

use dcs_session::SessionStatus;

use crate::components::{self, pool_card, short_address, stat_card};
use crate::dom;
use crate::state::App;

pub fn all(app: &App) {
    wallet(app);
    borrower(app);
    lender(app);
}

pub fn wallet(app: &App) {
    let els = &app.els;
    let session = app.session.borrow();

    let (label, address, error) = match session.status() {
        SessionStatus::Disconnected => ("Connect Wallet", None, None),
        SessionStatus::Connecting => ("Connecting...", None, None),
        SessionStatus::Connected(account) => ("Disconnect", Some(short_address(account)), None),
        SessionStatus::Failed(message) => ("Connect Wallet", None, Some(message.as_str())),
    };

    els.wallet_btn.set_text_content(Some(label));
    els.wallet_btn
        .set_disabled(matches!(session.status(), SessionStatus::Connecting));
    dom::set_text(&els.wallet_address, address.as_deref().unwrap_or_default());
    dom::set_hidden(&els.wallet_address, address.is_none());
    components::show_banner(&els.wallet_error, error);
}

pub fn borrower(app: &App) {
    let els = &app.els;
    let page = app.borrower.borrow();
    let busy = page.status().loading();

    dom::set_input_value(&els.loan_amount, &page.loan.amount);
    dom::set_input_value(&els.loan_duration, &page.loan.duration_days);
    dom::set_input_value(&els.repay_loan_id, &page.repay.loan_id);
    components::set_enabled(&[&els.loan_amount, &els.loan_duration, &els.repay_loan_id], !busy);
    for btn in [&els.request_loan_btn, &els.repay_loan_btn, &els.credit_score_btn] {
        components::set_busy(btn, busy);
    }

    match page.credit_score() {
        Some(score) => {
            els.credit_score_card
                .set_inner_html(&stat_card("Credit Score", &score.to_string()));
            dom::set_hidden(&els.credit_score_card, false);
        }
        None => dom::set_hidden(&els.credit_score_card, true),
    }

    components::show_banner(&els.borrower_error, page.status().error());
    components::show_banner(&els.borrower_notice, page.status().notice());
}

pub fn lender(app: &App) {
    let els = &app.els;
    let page = app.lender.borrow();
    let busy = page.status().loading();

    dom::set_input_value(&els.pool_risk_level, &page.create_pool.risk_level);
    dom::set_input_value(&els.fund_pool_id, &page.add_funds.pool_id);
    dom::set_input_value(&els.fund_amount, &page.add_funds.amount);
    components::set_enabled(&[&els.pool_risk_level, &els.fund_pool_id, &els.fund_amount], !busy);
    for btn in [
        &els.create_pool_btn,
        &els.add_funds_btn,
        &els.pool_count_btn,
        &els.list_pools_btn,
    ] {
        components::set_busy(btn, busy);
    }

    match page.pool_count() {
        Some(count) => {
            els.pool_count_card
                .set_inner_html(&stat_card("Total Pools", &count.to_string()));
            dom::set_hidden(&els.pool_count_card, false);
        }
        None => dom::set_hidden(&els.pool_count_card, true),
    }

    let cards: String = page.pools().iter().map(pool_card).collect();
    els.pool_list.set_inner_html(&cards);

    components::show_banner(&els.lender_error, page.status().error());
    components::show_banner(&els.lender_notice, page.status().notice());
}
