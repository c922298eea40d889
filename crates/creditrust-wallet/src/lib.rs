//! CrediTrust Wallet Layer
//!
//! Owns the connection lifecycle against a browser-style wallet:
//! - `WalletProvider` trait and the in-memory `MemoryWallet`
//! - `WalletSession` with single-flight connect and stale-completion guards
//! - account-change reconciliation pushed by the wallet
//! - entry-function payloads for the learning-platform contract

pub mod adapters;
pub mod error;
pub mod events;
pub mod session;
pub mod traits;
pub mod transactions;

pub use adapters::memory::{ConnectBehavior, MemoryWallet};
pub use error::{CheckError, ConnectError, DisconnectError, TransactionError, WalletError};
pub use events::AccountChange;
pub use session::{ConnectedAccount, WalletSession};
pub use traits::{SignMessageRequest, SignMessageResponse, WalletProvider};
pub use transactions::{ContractAction, ContractActions, EntryFunctionPayload, PendingTransaction};
