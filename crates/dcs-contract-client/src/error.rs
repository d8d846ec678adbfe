use dcs_api_types::TxHash;
use thiserror::Error;

/// EIP-1193 code for "the user rejected the request".
pub const USER_REJECTED: i64 = 4001;

pub type ContractResult<T> = Result<T, ContractError>;

/// Everything that can go wrong between a page action and the deployed
/// contract. The `Display` text is what the page shows in its error banner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("Please install MetaMask to use this dApp")]
    ProviderMissing,

    #[error("{0}")]
    Rejected(String),

    #[error("no wallet account was authorized")]
    NoAccounts,

    #[error("User address not available. Please connect your wallet.")]
    NoAccount,

    #[error("Contract not initialized. Please try again.")]
    NotInitialized,

    #[error("wallet session changed; the previous contract handle is no longer valid")]
    StaleHandle,

    #[error("wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("{message}")]
    Rpc { code: i64, message: String },

    #[error("could not decode contract response: {0}")]
    Decode(String),

    #[error("{0}")]
    Transport(String),
}

impl ContractError {
    /// Map an EIP-1193 `{ code, message }` error object.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED {
            ContractError::Rejected(message)
        } else {
            ContractError::Rpc { code, message }
        }
    }
}
