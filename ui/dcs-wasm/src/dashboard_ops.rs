//! Borrower and lender actions.
//!
//! Every handler, queries included, first copies all of its page's inputs
//! into the model. The driver redraws the inputs from the model.

use std::rc::Rc;

use dcs_dashboard::{borrower, lender};

use crate::dom;
use crate::render;
use crate::state::App;

fn sync_borrower_inputs(app: &App) {
    let els = &app.els;
    let mut page = app.borrower.borrow_mut();
    page.loan.amount = dom::get_input_value(&els.loan_amount);
    page.loan.duration_days = dom::get_input_value(&els.loan_duration);
    page.repay.loan_id = dom::get_input_value(&els.repay_loan_id);
}

fn sync_lender_inputs(app: &App) {
    let els = &app.els;
    let mut page = app.lender.borrow_mut();
    page.create_pool.risk_level = dom::get_input_value(&els.pool_risk_level);
    page.add_funds.pool_id = dom::get_input_value(&els.fund_pool_id);
    page.add_funds.amount = dom::get_input_value(&els.fund_amount);
}

// ── Borrower ──

pub async fn on_request_loan(app: &Rc<App>) {
    sync_borrower_inputs(app);
    let contract = app.session.borrow().contract();
    borrower::request_loan(&app.borrower, contract, &|| render::borrower(app)).await;
}

pub async fn on_repay_loan(app: &Rc<App>) {
    sync_borrower_inputs(app);
    let contract = app.session.borrow().contract();
    borrower::repay_loan(&app.borrower, contract, &|| render::borrower(app)).await;
}

pub async fn on_credit_score(app: &Rc<App>) {
    sync_borrower_inputs(app);
    let (contract, account) = {
        let session = app.session.borrow();
        (session.contract(), session.account())
    };
    borrower::fetch_credit_score(&app.borrower, contract, account, &|| render::borrower(app)).await;
}

// ── Lender ──

pub async fn on_create_pool(app: &Rc<App>) {
    sync_lender_inputs(app);
    let contract = app.session.borrow().contract();
    lender::create_pool(&app.lender, contract, &|| render::lender(app)).await;
}

pub async fn on_add_funds(app: &Rc<App>) {
    sync_lender_inputs(app);
    let contract = app.session.borrow().contract();
    lender::add_funds(&app.lender, contract, &|| render::lender(app)).await;
}

pub async fn on_pool_count(app: &Rc<App>) {
    sync_lender_inputs(app);
    let contract = app.session.borrow().contract();
    lender::fetch_pool_count(&app.lender, contract, &|| render::lender(app)).await;
}

pub async fn on_list_pools(app: &Rc<App>) {
    sync_lender_inputs(app);
    let contract = app.session.borrow().contract();
    lender::list_pools(&app.lender, contract, &|| render::lender(app)).await;
}
