use crate::session_state::SessionStatus;

/// Core errors shared across the CrediTrust crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid session transition from {from} to {to}")]
    InvalidStateTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
