//! Startup configuration.

use anyhow::{Context, Result, bail};
use dcs_contract_client::ContractConfig;
use gloo_net::http::Request;

pub const CONFIG_URL: &str = "config/contract.json";

/// Fetch and validate the contract config served next to the page.
pub async fn load() -> Result<ContractConfig> {
    let resp = Request::get(CONFIG_URL)
        .send()
        .await
        .with_context(|| format!("fetch {CONFIG_URL}"))?;

    if !resp.ok() {
        bail!("fetch {CONFIG_URL}: {} {}", resp.status(), resp.status_text());
    }

    let body = resp.text().await.context("read contract config body")?;
    ContractConfig::from_json(&body)
}
