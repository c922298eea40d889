//! CrediTrust Ledger Layer
//!
//! Read-only access to the on-chain state the dashboard displays:
//! - `LedgerQuery` trait for fetching account resources
//! - `RestLedger` (fullnode REST API) and `MemoryLedger` backends
//! - `LedgerClient` typed fetchers with degrade-to-default variants
//! - resource models for profiles, achievements, activity and modules

pub mod adapters;
pub mod client;
pub mod error;
pub mod models;
pub mod traits;

pub use adapters::memory::MemoryLedger;
pub use adapters::rest::RestLedger;
pub use client::LedgerClient;
pub use error::LedgerError;
pub use models::{
    Achievement, ActivityKind, ActivityRecord, LearningModule, UserProfile, APT_COIN_STORE,
};
pub use traits::LedgerQuery;
