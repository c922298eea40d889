//! The wallet session: one connection lifecycle against one wallet provider.
//!
//! All session fields live behind a single mutex that is never held across
//! an `.await`. Every teardown (explicit disconnect, or the wallet reporting
//! no account) bumps an epoch counter; async completions compare the epoch
//! they started under with the current one and are discarded when it moved.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use creditrust_core::{
    AccountAddress, Balance, NetworkInfo, SessionEvent, SessionSnapshot, SessionStateMachine,
    SessionStatus, WalletAccount,
};
use creditrust_ledger::LedgerClient;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{CheckError, ConnectError, DisconnectError, TransactionError, WalletError};
use crate::events::AccountChange;
use crate::traits::WalletProvider;
use crate::transactions::{EntryFunctionPayload, PendingTransaction};

type PendingConnect = Shared<BoxFuture<'static, Result<ConnectedAccount, ConnectError>>>;

/// The result of a successful connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedAccount {
    pub account: WalletAccount,
    pub balance: Balance,
}

struct SessionState {
    snapshot: SessionSnapshot,
    account: Option<WalletAccount>,
    epoch: u64,
    pending: Option<PendingConnect>,
}

impl SessionState {
    fn connected_account(&self) -> Option<ConnectedAccount> {
        if !self.snapshot.is_connected() {
            return None;
        }
        Some(ConnectedAccount {
            account: self.account.clone()?,
            balance: self.snapshot.balance()?,
        })
    }

    fn is_connected_to(&self, address: &AccountAddress) -> bool {
        self.snapshot.is_connected() && self.snapshot.address() == Some(address)
    }

    fn is_idle(&self) -> bool {
        matches!(
            self.snapshot.status(),
            SessionStatus::Disconnected | SessionStatus::Error
        )
    }
}

struct SessionInner {
    provider: Option<Arc<dyn WalletProvider>>,
    ledger: Arc<LedgerClient>,
    install_url: String,
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &mut SessionState, snapshot: SessionSnapshot) {
        state.snapshot = snapshot.clone();
        self.updates.send_replace(snapshot);
    }

    /// Apply `event` if the state machine allows it from the current status.
    fn commit(&self, state: &mut SessionState, event: SessionEvent, snapshot: SessionSnapshot) -> bool {
        match SessionStateMachine::transition(state.snapshot.status(), event) {
            Ok(_) => {
                self.publish(state, snapshot);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, event = ?event, "ignoring session event");
                false
            }
        }
    }

    fn set_connected(
        &self,
        state: &mut SessionState,
        event: SessionEvent,
        account: WalletAccount,
        balance: Balance,
    ) -> bool {
        let snapshot = SessionSnapshot::connected(account.address, balance);
        if self.commit(state, event, snapshot) {
            state.account = Some(account);
            true
        } else {
            false
        }
    }

    /// Invalidate every in-flight completion and move to `Disconnected`.
    /// The epoch moves even when already disconnected, since a restore or
    /// account switch may be in flight. Returns whether the snapshot changed.
    fn teardown(&self, state: &mut SessionState, event: SessionEvent) -> bool {
        state.epoch = state.epoch.wrapping_add(1);
        state.pending = None;
        state.account = None;
        let disconnected = SessionSnapshot::disconnected();
        state.snapshot != disconnected && self.commit(state, event, disconnected)
    }
}

/// A wallet session, shared by cloning.
///
/// Owned by the application root and handed to consumers; there is no
/// global session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

impl WalletSession {
    /// Create a disconnected session. `provider` is `None` when no wallet is
    /// installed; `install_url` is reported to the user in that case.
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        ledger: Arc<LedgerClient>,
        install_url: impl Into<String>,
    ) -> Self {
        let snapshot = SessionSnapshot::disconnected();
        let (updates, _) = watch::channel(snapshot.clone());
        Self {
            inner: Arc::new(SessionInner {
                provider,
                ledger,
                install_url: install_url.into(),
                state: Mutex::new(SessionState {
                    snapshot,
                    account: None,
                    epoch: 0,
                    pending: None,
                }),
                updates,
            }),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.inner.provider.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock().snapshot.status()
    }

    /// The connected account, if any.
    pub fn account(&self) -> Option<ConnectedAccount> {
        self.inner.lock().connected_account()
    }

    /// Receive every snapshot the session publishes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Connect to the wallet.
    ///
    /// While an attempt is in flight, further calls await that same attempt
    /// instead of prompting the user again. When already connected, returns
    /// the current account without prompting.
    pub async fn connect(&self) -> Result<ConnectedAccount, ConnectError> {
        let pending = {
            let mut state = self.inner.lock();
            if let Some(current) = state.connected_account() {
                tracing::debug!(address = %current.account.address.short(), "already connected");
                return Ok(current);
            }
            match state.pending.clone() {
                Some(pending) => {
                    tracing::debug!("connect already in flight; joining it");
                    pending
                }
                None => self.begin_connect(&mut state)?,
            }
        };
        pending.await
    }

    fn begin_connect(&self, state: &mut SessionState) -> Result<PendingConnect, ConnectError> {
        let inner = &self.inner;
        inner.commit(state, SessionEvent::ConnectRequested, SessionSnapshot::connecting());

        let Some(provider) = inner.provider.clone() else {
            let err = ConnectError::ProviderUnavailable {
                install_url: inner.install_url.clone(),
            };
            tracing::warn!(install_url = %inner.install_url, "no wallet provider available");
            inner.commit(state, SessionEvent::ConnectFailed, SessionSnapshot::error(err.to_string()));
            return Err(err);
        };

        let pending = run_connect(
            Arc::downgrade(inner),
            provider,
            inner.ledger.clone(),
            state.epoch,
        )
        .boxed()
        .shared();
        state.pending = Some(pending.clone());
        Ok(pending)
    }

    /// Disconnect. Local state is cleared first and unconditionally; a
    /// failure of the wallet's own disconnect is only reported.
    pub async fn disconnect(&self) -> Result<(), DisconnectError> {
        {
            let mut state = self.inner.lock();
            self.inner.teardown(&mut state, SessionEvent::DisconnectRequested);
        }
        tracing::info!("wallet session disconnected");

        let Some(provider) = &self.inner.provider else {
            return Ok(());
        };
        provider.disconnect().await.map_err(|e| {
            tracing::warn!(error = %e, "wallet disconnect failed; local session already cleared");
            DisconnectError::Remote(e)
        })
    }

    /// Restore an already-authorized connection without prompting.
    ///
    /// A missing or locked wallet leaves the session disconnected.
    pub async fn check_existing_session(&self) -> Result<SessionSnapshot, CheckError> {
        let Some(provider) = self.inner.provider.clone() else {
            tracing::debug!("no wallet provider; session stays disconnected");
            return Ok(self.snapshot());
        };

        let epoch = {
            let state = self.inner.lock();
            if !state.is_idle() {
                return Ok(state.snapshot.clone());
            }
            state.epoch
        };

        if !provider.is_connected().await.map_err(CheckError::Provider)? {
            tracing::debug!("wallet not authorized; session stays disconnected");
            return Ok(self.snapshot());
        }
        let Some(account) = provider.account().await.map_err(CheckError::Provider)? else {
            return Ok(self.snapshot());
        };
        let balance = lookup_balance(&self.inner.ledger, &account.address).await;

        let mut state = self.inner.lock();
        if state.epoch != epoch || !state.is_idle() {
            tracing::debug!("session changed during existing-session check; keeping current state");
            return Ok(state.snapshot.clone());
        }
        let address = account.address;
        self.inner
            .set_connected(&mut state, SessionEvent::SessionRestored, account, balance);
        tracing::info!(address = %address.short(), "restored existing wallet session");
        Ok(state.snapshot.clone())
    }

    /// Reconcile the session with an account change reported by the wallet.
    ///
    /// Idempotent: re-applying the account the session is already connected
    /// to changes nothing.
    pub async fn apply_account_change(&self, change: AccountChange) -> SessionSnapshot {
        let account = match change {
            AccountChange::Cleared => {
                let mut state = self.inner.lock();
                if self.inner.teardown(&mut state, SessionEvent::AccountCleared) {
                    tracing::info!("wallet reported no account; session disconnected");
                }
                return state.snapshot.clone();
            }
            AccountChange::Switched(account) => account,
        };

        let epoch = {
            let state = self.inner.lock();
            if state.is_connected_to(&account.address) {
                return state.snapshot.clone();
            }
            state.epoch
        };

        let balance = lookup_balance(&self.inner.ledger, &account.address).await;

        let mut state = self.inner.lock();
        if state.epoch != epoch {
            tracing::debug!("discarding stale account change");
            return state.snapshot.clone();
        }
        if !state.is_connected_to(&account.address) {
            let address = account.address;
            self.inner
                .set_connected(&mut state, SessionEvent::AccountChanged, account, balance);
            tracing::info!(address = %address.short(), "wallet account changed");
        }
        state.snapshot.clone()
    }

    /// Listen for account changes pushed by the wallet.
    ///
    /// Spawns a task (so it must be called inside a Tokio runtime) that
    /// applies each change and then hands the resulting snapshot to
    /// `handler`. Returns `None` when there is no wallet to listen to. The
    /// task ends when the wallet's channel closes or the session is dropped.
    pub fn on_account_changed<F>(&self, mut handler: F) -> Option<JoinHandle<()>>
    where
        F: FnMut(&SessionSnapshot) + Send + 'static,
    {
        let mut changes = self.inner.provider.as_ref()?.account_changes();
        let weak = Arc::downgrade(&self.inner);

        Some(tokio::spawn(async move {
            loop {
                let received = match changes.recv().await {
                    Ok(change) => Some(change),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "missed account changes; resynchronising");
                        None
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("account change channel closed");
                        break;
                    }
                };

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let session = WalletSession { inner };

                let change = match received {
                    Some(change) => change,
                    None => match session.provider_account().await {
                        Ok(change) => change,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to resynchronise account");
                            continue;
                        }
                    },
                };

                let snapshot = session.apply_account_change(change).await;
                handler(&snapshot);
            }
        }))
    }

    async fn provider_account(&self) -> Result<AccountChange, WalletError> {
        match &self.inner.provider {
            Some(provider) => Ok(AccountChange::from(provider.account().await?)),
            None => Ok(AccountChange::Cleared),
        }
    }

    /// Re-read the balance of the connected account. On failure the previous
    /// balance is kept. Returns the balance now shown, if connected.
    pub async fn refresh_balance(&self) -> Option<Balance> {
        let (address, epoch) = {
            let state = self.inner.lock();
            (*state.snapshot.address()?, state.epoch)
        };

        let fetched = self.inner.ledger.balance(&address).await;

        let mut state = self.inner.lock();
        if state.epoch != epoch || !state.is_connected_to(&address) {
            return state.snapshot.balance();
        }
        match fetched {
            Ok(balance) => {
                self.inner
                    .publish(&mut state, SessionSnapshot::connected(address, balance));
                Some(balance)
            }
            Err(e) => {
                tracing::warn!(address = %address.short(), error = %e, "balance refresh failed; keeping previous value");
                state.snapshot.balance()
            }
        }
    }

    /// The network the wallet is pointed at.
    pub async fn network(&self) -> Result<NetworkInfo, WalletError> {
        match &self.inner.provider {
            Some(provider) => provider.network().await,
            None => Err(WalletError::NotConnected),
        }
    }

    /// Sign and submit a payload with the connected wallet.
    pub async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, TransactionError> {
        let provider = self
            .inner
            .provider
            .clone()
            .ok_or(TransactionError::ProviderUnavailable)?;
        if !self.status().is_connected() {
            return Err(TransactionError::NotConnected);
        }
        Ok(provider.sign_and_submit_transaction(payload).await?)
    }
}

async fn run_connect(
    session: Weak<SessionInner>,
    provider: Arc<dyn WalletProvider>,
    ledger: Arc<LedgerClient>,
    epoch: u64,
) -> Result<ConnectedAccount, ConnectError> {
    tracing::info!(wallet = provider.wallet_name(), "requesting wallet connection");

    let outcome = match provider.connect().await {
        Ok(account) => {
            if !is_current(&session, epoch) {
                return Err(stale(epoch));
            }
            let balance = lookup_balance(&ledger, &account.address).await;
            Ok(ConnectedAccount { account, balance })
        }
        Err(e) => Err(ConnectError::from(e)),
    };

    let Some(inner) = session.upgrade() else {
        return Err(stale(epoch));
    };
    let mut state = inner.lock();
    if state.epoch != epoch {
        return Err(stale(epoch));
    }
    state.pending = None;
    let connecting = state.snapshot.status() == SessionStatus::Connecting;

    match outcome {
        Ok(connected) => {
            // An account pushed by the wallet during the prompt is newer
            // than the one the prompt approved.
            if !connecting {
                if let Some(current) = state.connected_account() {
                    tracing::debug!(
                        approved = %connected.account.address.short(),
                        current = %current.account.address.short(),
                        "wallet switched account during connect; keeping the newer account"
                    );
                    return Ok(current);
                }
            }
            let event = if connecting {
                SessionEvent::ConnectSucceeded
            } else {
                SessionEvent::AccountChanged
            };
            inner.set_connected(&mut state, event, connected.account.clone(), connected.balance);
            tracing::info!(
                address = %connected.account.address.short(),
                balance = %connected.balance,
                "wallet connected"
            );
            Ok(connected)
        }
        Err(err) => {
            if connecting {
                inner.commit(&mut state, SessionEvent::ConnectFailed, SessionSnapshot::error(err.to_string()));
            }
            tracing::warn!(error = %err, "wallet connection failed");
            Err(err)
        }
    }
}

fn is_current(session: &Weak<SessionInner>, epoch: u64) -> bool {
    session
        .upgrade()
        .map(|inner| inner.lock().epoch == epoch)
        .unwrap_or(false)
}

fn stale(epoch: u64) -> ConnectError {
    tracing::debug!(epoch, "discarding stale connect completion");
    ConnectError::StaleCompletion
}

/// Balance lookup that never fails a caller: errors degrade to zero.
async fn lookup_balance(ledger: &LedgerClient, address: &AccountAddress) -> Balance {
    match ledger.balance(address).await {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!(address = %address.short(), error = %e, "balance lookup failed; using zero");
            Balance::ZERO
        }
    }
}
