/// Ledger query errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger query failed: {0}")]
    QueryFailed(String),

    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected ledger response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode resource {resource_type}: {source}")]
    Decode {
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] creditrust_core::CoreError),
}
