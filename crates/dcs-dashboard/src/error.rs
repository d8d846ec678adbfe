use thiserror::Error;

/// Input errors raised before any contract call is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a loan ID")]
    MissingLoanId,

    #[error("Please enter a risk level")]
    MissingRiskLevel,

    #[error("Invalid amount `{0}`: enter an ETH value such as 1.5")]
    InvalidAmount(String),

    #[error("Invalid duration `{0}`: enter a whole number of days")]
    InvalidDuration(String),

    #[error("Invalid {field} `{value}`: enter a whole number")]
    InvalidNumber { field: &'static str, value: String },
}
