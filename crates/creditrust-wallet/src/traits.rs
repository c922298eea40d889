use async_trait::async_trait;
use creditrust_core::{NetworkInfo, WalletAccount};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::WalletError;
use crate::events::AccountChange;
use crate::transactions::{EntryFunctionPayload, PendingTransaction};

/// A message to be signed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageRequest {
    pub message: String,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageResponse {
    pub signature: String,
    #[serde(rename = "fullMessage")]
    pub full_message: String,
}

/// Wallet provider interface.
///
/// Each implementation bridges to a concrete wallet (a browser extension,
/// a hardware device, an in-memory test double). Account and network
/// changes are pushed over broadcast channels rather than polled.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to authorize a connection. May prompt.
    async fn connect(&self) -> Result<WalletAccount, WalletError>;

    /// Revoke the connection.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Whether this site is already authorized. Never prompts.
    async fn is_connected(&self) -> Result<bool, WalletError>;

    /// The active account, if authorized. Never prompts.
    async fn account(&self) -> Result<Option<WalletAccount>, WalletError>;

    /// The network the wallet is pointed at.
    async fn network(&self) -> Result<NetworkInfo, WalletError>;

    /// Sign and submit an entry-function transaction.
    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, WalletError>;

    /// Sign an arbitrary message.
    async fn sign_message(
        &self,
        request: &SignMessageRequest,
    ) -> Result<SignMessageResponse, WalletError>;

    /// Subscribe to account changes.
    fn account_changes(&self) -> broadcast::Receiver<AccountChange>;

    /// Subscribe to network changes.
    fn network_changes(&self) -> broadcast::Receiver<NetworkInfo>;

    /// Human-readable wallet name (e.g. "Petra").
    fn wallet_name(&self) -> &str;
}
