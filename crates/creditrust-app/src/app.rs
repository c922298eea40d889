use std::sync::Arc;

use creditrust_core::{AccountAddress, CrediTrustConfig, SessionSnapshot};
use creditrust_identity::{DerivedTrustScore, TrustScoreCalculator};
use creditrust_ledger::{LedgerClient, LedgerQuery};
use creditrust_wallet::{ContractActions, WalletProvider, WalletSession};
use tokio::task::JoinHandle;

use crate::dashboard::Dashboard;
use crate::error::AppError;

/// The application root.
///
/// Owns the single wallet session, the ledger client and the contract
/// actions, and hands out clones to whoever needs them.
pub struct CrediTrustApp {
    config: CrediTrustConfig,
    ledger: Arc<LedgerClient>,
    session: WalletSession,
    actions: ContractActions,
    trust: TrustScoreCalculator,
}

impl CrediTrustApp {
    /// Wire the application. `provider` is `None` when no wallet is
    /// installed; the app then works read-only.
    pub fn new(
        config: CrediTrustConfig,
        query: Arc<dyn LedgerQuery>,
        provider: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        let ledger = Arc::new(LedgerClient::new(query, config.contract.clone()));
        let session = WalletSession::new(provider, ledger.clone(), config.wallet.install_url.clone());
        let actions = ContractActions::new(session.clone(), config.contract.clone());
        let trust = TrustScoreCalculator::new(ledger.clone());

        tracing::info!(
            network = %config.network.name,
            contract = %config.contract.address,
            module = %config.contract.module,
            wallet = session.has_provider(),
            "CrediTrust app created"
        );

        Self {
            config,
            ledger,
            session,
            actions,
            trust,
        }
    }

    /// Restore a previously authorized wallet session, if any.
    pub async fn start(&self) -> Result<SessionSnapshot, AppError> {
        let snapshot = self.session.check_existing_session().await?;
        tracing::info!(status = %snapshot.status(), "wallet session checked");
        Ok(snapshot)
    }

    /// Follow account changes pushed by the wallet. See
    /// [`WalletSession::on_account_changed`].
    pub fn watch_accounts<F>(&self, handler: F) -> Option<JoinHandle<()>>
    where
        F: FnMut(&SessionSnapshot) + Send + 'static,
    {
        self.session.on_account_changed(handler)
    }

    pub fn config(&self) -> &CrediTrustConfig {
        &self.config
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn ledger(&self) -> &Arc<LedgerClient> {
        &self.ledger
    }

    pub fn actions(&self) -> &ContractActions {
        &self.actions
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.ledger.clone(), Some(self.actions.clone()))
    }

    pub async fn trust_score(&self, address: &AccountAddress) -> DerivedTrustScore {
        self.trust.calculate(address).await
    }
}
