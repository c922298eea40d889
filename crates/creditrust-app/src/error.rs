use creditrust_wallet::{CheckError, TransactionError};

/// Errors from application-level operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no wallet connected")]
    NotConnected,

    #[error("wallet session check failed: {0}")]
    Check(#[from] CheckError),

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}
