use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Missing data: {0}")]
    MissingData(&'static str),
    #[error("Currency mismatch: {expected} vs {found}")]
    CurrencyMismatch { expected: String, found: String },
    #[error("Gateway mismatch: transaction uses {transaction}, payment uses {payment}")]
    GatewayMismatch {
        transaction: &'static str,
        payment: &'static str,
    },
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
