/// Errors reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("user rejected the request")]
    UserRejected,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("wallet error: {0}")]
    Provider(String),
}

/// Why a connect attempt failed.
///
/// `Clone` because one in-flight attempt is shared by every caller awaiting it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("no wallet installed; install one from {install_url}")]
    ProviderUnavailable { install_url: String },

    #[error("connection request was rejected")]
    UserRejected,

    #[error("wallet error: {0}")]
    ProviderError(String),

    /// The session was torn down while this attempt was in flight.
    #[error("connect attempt superseded by a newer session")]
    StaleCompletion,
}

impl From<WalletError> for ConnectError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => Self::UserRejected,
            WalletError::NotConnected => Self::ProviderError(err.to_string()),
            WalletError::Provider(message) => Self::ProviderError(message),
        }
    }
}

/// The remote side of a disconnect failed. Local state is already reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisconnectError {
    #[error("wallet disconnect failed: {0}")]
    Remote(WalletError),
}

/// The existing-session check could not query the wallet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("wallet query failed: {0}")]
    Provider(WalletError),
}

/// Contract action submission errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("no wallet installed")]
    ProviderUnavailable,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("transaction was rejected")]
    Rejected,

    #[error("transaction submission failed: {0}")]
    Provider(String),
}

impl From<WalletError> for TransactionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => Self::Rejected,
            WalletError::NotConnected => Self::NotConnected,
            WalletError::Provider(message) => Self::Provider(message),
        }
    }
}
