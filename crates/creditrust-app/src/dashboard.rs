//! The dashboard: everything shown for one account, gathered in one pass.

use std::sync::Arc;

use creditrust_core::AccountAddress;
use creditrust_identity::{DerivedTrustScore, TrustScoreCalculator, TrustTier};
use creditrust_ledger::{Achievement, ActivityRecord, LearningModule, LedgerClient, UserProfile};
use creditrust_wallet::ContractActions;
use serde::Serialize;

use crate::catalogue::default_modules;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub address: AccountAddress,
    pub profile: Option<UserProfile>,
    pub achievements: Vec<Achievement>,
    pub trust_score: DerivedTrustScore,
    pub tier: TrustTier,
    pub activity: Vec<ActivityRecord>,
    pub learning_modules: Vec<LearningModule>,
}

/// Loads dashboard views and runs the actions offered on them.
///
/// Without `actions` the dashboard is read-only: missing profiles are not
/// created and the action methods return [`AppError::NotConnected`].
pub struct Dashboard {
    ledger: Arc<LedgerClient>,
    actions: Option<ContractActions>,
}

impl Dashboard {
    pub fn new(ledger: Arc<LedgerClient>, actions: Option<ContractActions>) -> Self {
        Self { ledger, actions }
    }

    /// Gather the view for `address`.
    ///
    /// Never fails: every resource degrades to its empty value. When the
    /// account has no profile and it is the connected wallet account, a
    /// profile is created first.
    pub async fn load(&self, address: &AccountAddress) -> DashboardView {
        let (profile, achievements, activity, modules) = tokio::join!(
            self.ledger.user_profile_or_default(address),
            self.ledger.achievements_or_default(address),
            self.ledger.activity_or_default(address),
            self.ledger.learning_modules_or_default(),
        );

        let profile = match profile {
            Some(profile) => Some(profile),
            None => self.ensure_profile(address).await,
        };

        let learning_modules = if modules.is_empty() {
            tracing::debug!("contract publishes no learning modules; using default catalogue");
            default_modules()
        } else {
            modules
        };

        let trust_score = TrustScoreCalculator::score(profile.as_ref(), achievements.len());
        tracing::debug!(
            address = %address.short(),
            score = trust_score.value(),
            achievements = achievements.len(),
            "dashboard loaded"
        );

        DashboardView {
            address: *address,
            profile,
            achievements,
            trust_score,
            tier: trust_score.tier(),
            activity,
            learning_modules,
        }
    }

    /// Actions that may sign for `address`: only the connected account's.
    fn signer_for(&self, address: &AccountAddress) -> Option<&ContractActions> {
        let actions = self.actions.as_ref()?;
        let snapshot = actions.session().snapshot();
        (snapshot.is_connected() && snapshot.address() == Some(address)).then_some(actions)
    }

    async fn ensure_profile(&self, address: &AccountAddress) -> Option<UserProfile> {
        let actions = self.signer_for(address)?;
        tracing::info!(address = %address.short(), "no profile found; creating one");

        match actions.create_user_profile().await {
            Ok(_) => self.ledger.user_profile_or_default(address).await,
            Err(e) => {
                tracing::warn!(address = %address.short(), error = %e, "profile creation failed");
                None
            }
        }
    }

    fn connected_signer(&self) -> Result<(AccountAddress, &ContractActions), AppError> {
        let actions = self.actions.as_ref().ok_or(AppError::NotConnected)?;
        let address = actions
            .session()
            .snapshot()
            .address()
            .copied()
            .ok_or(AppError::NotConnected)?;
        Ok((address, actions))
    }

    /// Record a completed platform action, then reload the connected
    /// account's dashboard.
    pub async fn complete_action(
        &self,
        action_type: impl Into<String>,
    ) -> Result<DashboardView, AppError> {
        let (address, actions) = self.connected_signer()?;
        actions.complete_action(action_type).await?;
        actions.session().refresh_balance().await;
        Ok(self.load(&address).await)
    }

    /// Mint an achievement for the connected account and return its
    /// refreshed achievement list.
    ///
    /// Once the mint is submitted the call succeeds; a failed re-read shows
    /// an empty list rather than inviting a second mint.
    pub async fn mint_achievement(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Vec<Achievement>, AppError> {
        let (address, actions) = self.connected_signer()?;
        actions.mint_achievement_sbt(name, description).await?;
        actions.session().refresh_balance().await;
        Ok(self.ledger.achievements_or_default(&address).await)
    }
}
