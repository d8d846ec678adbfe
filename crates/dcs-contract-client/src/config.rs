use alloy_primitives::Address;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::abi::{self, ParamKind};

pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u32 = 1_500;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployed lending contract plus the interface the dashboards call on it.
///
/// Loaded from `config/contract.json`. Only `address` is required; every
/// method signature can be overridden individually to match the deployed ABI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    pub address: Address,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub methods: ContractMethods,
    #[serde(default = "default_poll_interval")]
    pub receipt_poll_interval_ms: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Canonical Solidity signatures, one per contract operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractMethods {
    pub request_loan: String,
    pub repay_loan: String,
    pub credit_score: String,
    pub create_pool: String,
    pub add_funds: String,
    pub pool_count: String,
    pub pool_details: String,
}

impl Default for ContractMethods {
    fn default() -> Self {
        Self {
            request_loan: "requestLoan(uint256,uint256)".to_owned(),
            repay_loan: "repayLoan(uint256)".to_owned(),
            credit_score: "getCreditScore(address)".to_owned(),
            create_pool: "createPool(uint256)".to_owned(),
            add_funds: "addFunds(uint256,uint256)".to_owned(),
            pool_count: "poolCount()".to_owned(),
            pool_details: "riskPools(uint256)".to_owned(),
        }
    }
}

impl ContractMethods {
    pub fn validate(&self) -> Result<()> {
        use ParamKind::Uint256;

        fn check(label: &str, signature: &str, params: &[ParamKind]) -> Result<()> {
            abi::check_signature(signature, params)
                .with_context(|| format!("invalid signature for method `{label}`"))
        }

        check("requestLoan", &self.request_loan, &[Uint256, Uint256])?;
        check("repayLoan", &self.repay_loan, &[Uint256])?;
        check("creditScore", &self.credit_score, &[ParamKind::Address])?;
        check("createPool", &self.create_pool, &[Uint256])?;
        check("addFunds", &self.add_funds, &[Uint256, Uint256])?;
        check("poolCount", &self.pool_count, &[])?;
        check("poolDetails", &self.pool_details, &[Uint256])
    }
}

impl ContractConfig {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            chain_id: None,
            methods: ContractMethods::default(),
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("parse contract config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.address == Address::ZERO {
            bail!("contract address must not be the zero address");
        }
        if self.receipt_poll_interval_ms == 0 {
            bail!("receiptPollIntervalMs must be greater than zero");
        }
        self.methods.validate()
    }
}

fn default_poll_interval() -> u32 {
    DEFAULT_RECEIPT_POLL_INTERVAL_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_owned()
}
