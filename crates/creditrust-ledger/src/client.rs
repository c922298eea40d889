use std::sync::Arc;

use creditrust_core::{AccountAddress, Balance, ContractConfig};
use serde::de::DeserializeOwned;

use crate::error::LedgerError;
use crate::models::{
    Achievement, AchievementCollection, ActivityHistory, ActivityRecord, CoinStore,
    LearningModule, LearningModules, UserProfile, ACHIEVEMENT_COLLECTION, ACTIVITY_HISTORY,
    APT_COIN_STORE, LEARNING_MODULES, USER_PROFILE,
};
use crate::traits::LedgerQuery;

/// Typed fetchers for the learning-platform resources.
///
/// Every fetcher comes in two flavours: one returning `Result`, and an
/// `*_or_default` variant that logs the failure and falls back to the empty
/// value (no profile, no achievements, ...). Callers pick the policy.
pub struct LedgerClient {
    query: Arc<dyn LedgerQuery>,
    contract: ContractConfig,
}

impl LedgerClient {
    pub fn new(query: Arc<dyn LedgerQuery>, contract: ContractConfig) -> Self {
        tracing::debug!(
            ledger = query.ledger_id(),
            contract = %contract.address,
            module = %contract.module,
            "ledger client created"
        );
        Self { query, contract }
    }

    pub fn contract(&self) -> &ContractConfig {
        &self.contract
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<T>, LedgerError> {
        let Some(data) = self.query.account_resource(address, resource_type).await? else {
            return Ok(None);
        };
        serde_json::from_value(data)
            .map(Some)
            .map_err(|source| LedgerError::Decode {
                resource_type: resource_type.to_string(),
                source,
            })
    }

    /// The account's profile, or `None` if it has not created one.
    pub async fn user_profile(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<UserProfile>, LedgerError> {
        self.fetch(address, &self.contract.resource_type(USER_PROFILE))
            .await
    }

    pub async fn user_profile_or_default(&self, address: &AccountAddress) -> Option<UserProfile> {
        self.user_profile(address).await.unwrap_or_else(|e| {
            tracing::warn!(address = %address.short(), error = %e, "failed to fetch user profile");
            None
        })
    }

    /// Soulbound achievements held by the account.
    pub async fn achievements(
        &self,
        address: &AccountAddress,
    ) -> Result<Vec<Achievement>, LedgerError> {
        let collection: Option<AchievementCollection> = self
            .fetch(address, &self.contract.resource_type(ACHIEVEMENT_COLLECTION))
            .await?;
        Ok(collection.map(|c| c.achievements).unwrap_or_default())
    }

    pub async fn achievements_or_default(&self, address: &AccountAddress) -> Vec<Achievement> {
        self.achievements(address).await.unwrap_or_else(|e| {
            tracing::warn!(address = %address.short(), error = %e, "failed to fetch achievements");
            Vec::new()
        })
    }

    pub async fn activity(
        &self,
        address: &AccountAddress,
    ) -> Result<Vec<ActivityRecord>, LedgerError> {
        let history: Option<ActivityHistory> = self
            .fetch(address, &self.contract.resource_type(ACTIVITY_HISTORY))
            .await?;
        Ok(history.map(|h| h.activities).unwrap_or_default())
    }

    pub async fn activity_or_default(&self, address: &AccountAddress) -> Vec<ActivityRecord> {
        self.activity(address).await.unwrap_or_else(|e| {
            tracing::warn!(address = %address.short(), error = %e, "failed to fetch activity");
            Vec::new()
        })
    }

    /// Learning modules, read from the contract account itself.
    pub async fn learning_modules(&self) -> Result<Vec<LearningModule>, LedgerError> {
        let contract_address = AccountAddress::parse(&self.contract.address)?;
        let modules: Option<LearningModules> = self
            .fetch(&contract_address, &self.contract.resource_type(LEARNING_MODULES))
            .await?;
        Ok(modules.map(|m| m.modules).unwrap_or_default())
    }

    pub async fn learning_modules_or_default(&self) -> Vec<LearningModule> {
        self.learning_modules().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch learning modules");
            Vec::new()
        })
    }

    /// APT balance. An account without a coin store holds zero.
    pub async fn balance(&self, address: &AccountAddress) -> Result<Balance, LedgerError> {
        let store: Option<CoinStore> = self.fetch(address, APT_COIN_STORE).await?;
        Ok(store
            .map(|s| Balance::from_octas(s.coin.value))
            .unwrap_or(Balance::ZERO))
    }
}
