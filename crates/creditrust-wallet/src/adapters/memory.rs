use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use creditrust_core::{NetworkInfo, WalletAccount};
use tokio::sync::{broadcast, watch};

use crate::error::WalletError;
use crate::events::AccountChange;
use crate::traits::{SignMessageRequest, SignMessageResponse, WalletProvider};
use crate::transactions::{EntryFunctionPayload, PendingTransaction};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// How the wallet answers the next connection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectBehavior {
    Approve,
    Reject,
    Fail(String),
}

#[derive(Debug)]
struct WalletState {
    account: Option<WalletAccount>,
    authorized: bool,
    locked: bool,
    connect_behavior: ConnectBehavior,
    disconnect_failure: Option<String>,
    network: NetworkInfo,
    submitted: Vec<EntryFunctionPayload>,
}

impl WalletState {
    fn exposes_account(&self) -> bool {
        self.authorized && !self.locked && self.account.is_some()
    }
}

/// In-process wallet provider.
///
/// Stands in for a browser extension: it holds one account, remembers
/// whether the site was authorized, and pushes account and network changes
/// to subscribers. Connection prompts can be held open with
/// [`pause_connect`](Self::pause_connect) to exercise in-flight races.
pub struct MemoryWallet {
    name: String,
    state: Mutex<WalletState>,
    connect_gate: watch::Sender<bool>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    tx_counter: AtomicU64,
    account_tx: broadcast::Sender<AccountChange>,
    network_tx: broadcast::Sender<NetworkInfo>,
}

impl MemoryWallet {
    pub fn new(account: WalletAccount) -> Self {
        Self::with_capacity(account, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a wallet whose change channels buffer `capacity` events.
    pub fn with_capacity(account: WalletAccount, capacity: usize) -> Self {
        let (connect_gate, _) = watch::channel(true);
        let (account_tx, _) = broadcast::channel(capacity.max(1));
        let (network_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            name: "Memory".to_string(),
            state: Mutex::new(WalletState {
                account: Some(account),
                authorized: false,
                locked: false,
                connect_behavior: ConnectBehavior::Approve,
                disconnect_failure: None,
                network: NetworkInfo {
                    name: "devnet".to_string(),
                    chain_id: "0".to_string(),
                },
                submitted: Vec::new(),
            }),
            connect_gate,
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            tx_counter: AtomicU64::new(0),
            account_tx,
            network_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the site as previously authorized, as if the user approved it in
    /// an earlier visit.
    pub fn authorize(&self) {
        self.lock().authorized = true;
    }

    pub fn set_locked(&self, locked: bool) {
        self.lock().locked = locked;
    }

    pub fn set_connect_behavior(&self, behavior: ConnectBehavior) {
        self.lock().connect_behavior = behavior;
    }

    /// Make every later `disconnect` fail with `message`.
    pub fn fail_disconnect(&self, message: impl Into<String>) {
        self.lock().disconnect_failure = Some(message.into());
    }

    /// Hold connection prompts open until [`resume_connect`](Self::resume_connect).
    pub fn pause_connect(&self) {
        self.connect_gate.send_replace(false);
    }

    pub fn resume_connect(&self) {
        self.connect_gate.send_replace(true);
    }

    /// Switch the active account (`None` locks the user out) and notify
    /// subscribers.
    pub fn switch_account(&self, account: Option<WalletAccount>) {
        {
            let mut state = self.lock();
            state.authorized = account.is_some();
            if account.is_some() {
                state.account = account.clone();
            }
        }
        tracing::debug!(cleared = account.is_none(), "memory wallet account switched");
        // No subscribers is fine.
        let _ = self.account_tx.send(AccountChange::from(account));
    }

    pub fn switch_network(&self, network: NetworkInfo) {
        self.lock().network = network.clone();
        let _ = self.network_tx.send(network);
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    /// Payloads signed so far, oldest first.
    pub fn submitted(&self) -> Vec<EntryFunctionPayload> {
        self.lock().submitted.clone()
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.connect_gate.subscribe();
        if gate.wait_for(|open| *open).await.is_err() {
            return Err(WalletError::Provider("wallet shut down".into()));
        }

        let mut state = self.lock();
        match state.connect_behavior.clone() {
            ConnectBehavior::Approve => {
                let account = state
                    .account
                    .clone()
                    .ok_or_else(|| WalletError::Provider("no account configured".into()))?;
                state.authorized = true;
                state.locked = false;
                Ok(account)
            }
            ConnectBehavior::Reject => Err(WalletError::UserRejected),
            ConnectBehavior::Fail(message) => Err(WalletError::Provider(message)),
        }
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if let Some(message) = &state.disconnect_failure {
            return Err(WalletError::Provider(message.clone()));
        }
        state.authorized = false;
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        Ok(self.lock().exposes_account())
    }

    async fn account(&self) -> Result<Option<WalletAccount>, WalletError> {
        let state = self.lock();
        Ok(if state.exposes_account() {
            state.account.clone()
        } else {
            None
        })
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        Ok(self.lock().network.clone())
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, WalletError> {
        let encoded =
            serde_json::to_vec(payload).map_err(|e| WalletError::Provider(e.to_string()))?;

        let mut state = self.lock();
        if !state.exposes_account() {
            return Err(WalletError::NotConnected);
        }
        state.submitted.push(payload.clone());

        let sequence = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&encoded);
        hasher.update(&sequence.to_le_bytes());
        Ok(PendingTransaction {
            hash: format!("0x{}", hex::encode(hasher.finalize().as_bytes())),
        })
    }

    async fn sign_message(
        &self,
        request: &SignMessageRequest,
    ) -> Result<SignMessageResponse, WalletError> {
        let state = self.lock();
        let account = match (&state.account, state.exposes_account()) {
            (Some(account), true) => account,
            _ => return Err(WalletError::NotConnected),
        };

        let full_message = format!(
            "APTOS\nmessage: {}\nnonce: {}",
            request.message, request.nonce
        );
        let mut hasher = blake3::Hasher::new();
        hasher.update(account.address.as_bytes());
        hasher.update(full_message.as_bytes());
        Ok(SignMessageResponse {
            signature: hex::encode(hasher.finalize().as_bytes()),
            full_message,
        })
    }

    fn account_changes(&self) -> broadcast::Receiver<AccountChange> {
        self.account_tx.subscribe()
    }

    fn network_changes(&self) -> broadcast::Receiver<NetworkInfo> {
        self.network_tx.subscribe()
    }

    fn wallet_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditrust_core::AccountAddress;

    fn wallet() -> MemoryWallet {
        MemoryWallet::new(WalletAccount::new(AccountAddress::parse("0xa11ce").unwrap(), "pk"))
    }

    #[tokio::test]
    async fn test_connect_authorizes() {
        let wallet = wallet();
        assert!(!wallet.is_connected().await.unwrap());
        assert!(wallet.account().await.unwrap().is_none());

        wallet.connect().await.unwrap();
        assert!(wallet.is_connected().await.unwrap());
        assert!(wallet.account().await.unwrap().is_some());
        assert_eq!(wallet.connect_calls(), 1);
    }

    #[tokio::test]
    async fn test_locked_wallet_hides_account() {
        let wallet = wallet();
        wallet.authorize();
        wallet.set_locked(true);
        assert!(!wallet.is_connected().await.unwrap());
        assert!(wallet.account().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reject_and_fail() {
        let wallet = wallet();
        wallet.set_connect_behavior(ConnectBehavior::Reject);
        assert_eq!(wallet.connect().await, Err(WalletError::UserRejected));

        wallet.set_connect_behavior(ConnectBehavior::Fail("boom".into()));
        assert_eq!(
            wallet.connect().await,
            Err(WalletError::Provider("boom".into()))
        );
    }

    #[tokio::test]
    async fn test_switch_account_notifies() {
        let wallet = wallet();
        let mut changes = wallet.account_changes();

        let bob = WalletAccount::new(AccountAddress::parse("0xb0b").unwrap(), "pk-bob");
        wallet.switch_account(Some(bob.clone()));
        assert_eq!(changes.recv().await.unwrap(), AccountChange::Switched(bob.clone()));
        assert_eq!(wallet.account().await.unwrap(), Some(bob));

        wallet.switch_account(None);
        assert_eq!(changes.recv().await.unwrap(), AccountChange::Cleared);
        assert!(!wallet.is_connected().await.unwrap());
    }

    #[tokio::test]
    async fn test_transaction_hashes_are_unique() {
        let wallet = wallet();
        let payload = EntryFunctionPayload::new("0x1::m::f", vec![]);
        assert_eq!(
            wallet.sign_and_submit_transaction(&payload).await,
            Err(WalletError::NotConnected)
        );

        wallet.connect().await.unwrap();
        let a = wallet.sign_and_submit_transaction(&payload).await.unwrap();
        let b = wallet.sign_and_submit_transaction(&payload).await.unwrap();
        assert_ne!(a.hash, b.hash);
        assert_eq!(a.hash.len(), 66);
        assert_eq!(wallet.submitted().len(), 2);
    }

    #[tokio::test]
    async fn test_sign_message() {
        let wallet = wallet();
        wallet.connect().await.unwrap();
        let response = wallet
            .sign_message(&SignMessageRequest {
                message: "hello".into(),
                nonce: "42".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.full_message, "APTOS\nmessage: hello\nnonce: 42");
        assert_eq!(response.signature.len(), 64);
    }

    #[tokio::test]
    async fn test_network_change() {
        let wallet = wallet();
        let mut changes = wallet.network_changes();
        let testnet = NetworkInfo {
            name: "testnet".into(),
            chain_id: "2".into(),
        };
        wallet.switch_network(testnet.clone());
        assert_eq!(changes.recv().await.unwrap(), testnet);
        assert_eq!(wallet.network().await.unwrap(), testnet);
    }
}
