//! Shared presentation primitives used by both dashboards.

use dcs_api_types::{Address, RiskPool};
use dcs_dashboard::units::format_amount;
use tracing::warn;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

use crate::dom;

pub const BUSY_LABEL: &str = "Processing...";

/// Swap a button to its busy label and back. The idle label is kept in
/// `data-label` the first time the button goes busy.
pub fn set_busy(btn: &HtmlButtonElement, busy: bool) {
    btn.set_disabled(busy);
    if busy {
        if btn.get_attribute("data-label").is_none() {
            let label = btn.text_content().unwrap_or_default();
            if let Err(err) = btn.set_attribute("data-label", &label) {
                warn!(id = %btn.id(), error = ?err, "could not store button label");
            }
        }
        btn.set_text_content(Some(BUSY_LABEL));
    } else if let Some(label) = btn.get_attribute("data-label") {
        btn.set_text_content(Some(&label));
    }
}

pub fn set_enabled(inputs: &[&HtmlInputElement], enabled: bool) {
    for input in inputs {
        input.set_disabled(!enabled);
    }
}

/// Show `message` in a banner, or hide the banner when there is none.
pub fn show_banner(el: &Element, message: Option<&str>) {
    dom::set_text(el, message.unwrap_or_default());
    dom::set_hidden(el, message.is_none());
}

pub fn stat_card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="card stat"><span class="stat-label">{label}</span><span class="stat-value">{value}</span></div>"#
    )
}

pub fn pool_card(pool: &RiskPool) -> String {
    format!(
        concat!(
            r#"<div class="card pool">"#,
            r#"<h4>Pool #{id}</h4>"#,
            r#"<p>Total funds: {total} ETH</p>"#,
            r#"<p>Available funds: {available} ETH</p>"#,
            r#"<p>Risk level: {risk}</p>"#,
            r#"</div>"#
        ),
        id = pool.id,
        total = format_amount(pool.total_funds),
        available = format_amount(pool.available_funds),
        risk = pool.risk_level,
    )
}

/// `0x1234...abcd`: first 6 and last 4 characters of the checksummed address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
