pub mod abi;
mod config;
mod error;
mod handle;

use async_trait::async_trait;
use dcs_api_types::{
    Address, Bytes, CreditScore, LoanId, PoolId, ProviderEvent, RiskLevel, RiskPool, TxHash,
    TxReceipt, U256,
};
use serde::Serialize;

pub use config::{ContractConfig, ContractMethods, DEFAULT_LOG_LEVEL, DEFAULT_RECEIPT_POLL_INTERVAL_MS};
pub use error::{ContractError, ContractResult, USER_REJECTED};
pub use handle::ContractHandle;

/// Parameters of an `eth_call` / `eth_sendTransaction` request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// The injected wallet capability (EIP-1193 in the browser).
///
/// Futures are `?Send`: the browser implementation awaits JS promises.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request_accounts(&self) -> ContractResult<Vec<Address>>;
    async fn chain_id(&self) -> ContractResult<u64>;
    async fn call(&self, request: &CallRequest) -> ContractResult<Bytes>;
    async fn send_transaction(&self, request: &CallRequest) -> ContractResult<TxHash>;
    /// Resolves once the transaction is mined. Imposes no timeout.
    async fn wait_for_transaction(&self, hash: TxHash) -> ContractResult<TxReceipt>;
    fn subscribe(&self, listener: Box<dyn Fn(ProviderEvent)>);
}

/// Operations the borrower and lender dashboards perform on the contract.
/// Mutating calls resolve after the transaction is confirmed.
#[async_trait(?Send)]
pub trait LendingContract {
    async fn request_loan(&self, amount: U256, duration_secs: u64) -> ContractResult<TxReceipt>;
    async fn repay_loan(&self, loan_id: LoanId) -> ContractResult<TxReceipt>;
    async fn credit_score(&self, account: Address) -> ContractResult<CreditScore>;
    async fn create_pool(&self, risk_level: RiskLevel) -> ContractResult<TxReceipt>;
    async fn add_funds(&self, pool_id: PoolId, amount: U256) -> ContractResult<TxReceipt>;
    async fn pool_count(&self) -> ContractResult<u64>;
    async fn pool(&self, id: PoolId) -> ContractResult<RiskPool>;
}
