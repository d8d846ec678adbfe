//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add a control, add a field
//! here and bind it in `Elements::bind()`.

use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Result<Vec<Element>, JsValue> {
    let nl = gloo_utils::document().query_selector_all(selector)?;
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(el) = nl.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            v.push(el);
        }
    }
    Ok(v)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value()
}

/// Only writes when the value differs, so the caret survives a redraw.
pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    if el.value() != val {
        el.set_value(val);
    }
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    if let Err(err) = el.class_list().toggle_with_force(cls, force) {
        warn!(id = %el.id(), class = cls, error = ?err, "could not toggle class");
    }
}

pub fn set_hidden(el: &Element, hidden: bool) {
    toggle_class(el, "hidden", hidden);
}

// ── Elements struct ──

/// All DOM element references used by the dApp.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Navigation
    pub nav_links: Vec<Element>,
    pub views: Vec<Element>,

    // Wallet
    pub wallet_btn: HtmlButtonElement,
    pub wallet_address: Element,
    pub wallet_error: Element,

    // Borrower: request loan
    pub loan_amount: HtmlInputElement,
    pub loan_duration: HtmlInputElement,
    pub request_loan_btn: HtmlButtonElement,

    // Borrower: repay
    pub repay_loan_id: HtmlInputElement,
    pub repay_loan_btn: HtmlButtonElement,

    // Borrower: credit score
    pub credit_score_btn: HtmlButtonElement,
    pub credit_score_card: Element,

    pub borrower_error: Element,
    pub borrower_notice: Element,

    // Lender: create pool
    pub pool_risk_level: HtmlInputElement,
    pub create_pool_btn: HtmlButtonElement,

    // Lender: add funds
    pub fund_pool_id: HtmlInputElement,
    pub fund_amount: HtmlInputElement,
    pub add_funds_btn: HtmlButtonElement,

    // Lender: pools
    pub pool_count_btn: HtmlButtonElement,
    pub pool_count_card: Element,
    pub list_pools_btn: HtmlButtonElement,
    pub pool_list: Element,

    pub lender_error: Element,
    pub lender_notice: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            nav_links: query_all("[data-route]")?,
            views: query_all(".view")?,

            wallet_btn: get_button!("walletBtn"),
            wallet_address: get_el!("walletAddress"),
            wallet_error: get_el!("walletError"),

            loan_amount: get_input!("loanAmount"),
            loan_duration: get_input!("loanDuration"),
            request_loan_btn: get_button!("requestLoanBtn"),

            repay_loan_id: get_input!("repayLoanId"),
            repay_loan_btn: get_button!("repayLoanBtn"),

            credit_score_btn: get_button!("creditScoreBtn"),
            credit_score_card: get_el!("creditScoreCard"),

            borrower_error: get_el!("borrowerError"),
            borrower_notice: get_el!("borrowerNotice"),

            pool_risk_level: get_input!("poolRiskLevel"),
            create_pool_btn: get_button!("createPoolBtn"),

            fund_pool_id: get_input!("fundPoolId"),
            fund_amount: get_input!("fundAmount"),
            add_funds_btn: get_button!("addFundsBtn"),

            pool_count_btn: get_button!("poolCountBtn"),
            pool_count_card: get_el!("poolCountCard"),
            list_pools_btn: get_button!("listPoolsBtn"),
            pool_list: get_el!("poolList"),

            lender_error: get_el!("lenderError"),
            lender_notice: get_el!("lenderNotice"),
        })
    }
}
