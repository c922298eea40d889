use std::sync::Arc;

use creditrust_core::AccountAddress;
use creditrust_ledger::{LedgerClient, UserProfile};

use crate::trust_score::{DerivedTrustScore, TrustScoreInput};

/// Derives trust scores from ledger state.
///
/// Degrades rather than fails: a failed achievement fetch counts as zero
/// achievements, and an account without a readable profile gets
/// `DerivedTrustScore::DEFAULT`.
pub struct TrustScoreCalculator {
    ledger: Arc<LedgerClient>,
}

impl TrustScoreCalculator {
    pub fn new(ledger: Arc<LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Gather the score inputs for an account, or `None` if it has no profile.
    pub async fn input_for(&self, address: &AccountAddress) -> Option<TrustScoreInput> {
        let profile = self.ledger.user_profile_or_default(address).await?;
        let achievements = self.ledger.achievements_or_default(address).await;
        Some(Self::input_from(&profile, achievements.len()))
    }

    fn input_from(profile: &UserProfile, achievement_count: usize) -> TrustScoreInput {
        TrustScoreInput::new(
            saturate(achievement_count as u64),
            saturate(profile.completed_actions),
        )
    }

    /// Score already-fetched state without touching the ledger.
    pub fn score(profile: Option<&UserProfile>, achievement_count: usize) -> DerivedTrustScore {
        profile
            .map(|p| Self::input_from(p, achievement_count).derive())
            .unwrap_or(DerivedTrustScore::DEFAULT)
    }

    pub async fn calculate(&self, address: &AccountAddress) -> DerivedTrustScore {
        let score = match self.input_for(address).await {
            Some(input) => input.derive(),
            None => DerivedTrustScore::DEFAULT,
        };
        tracing::debug!(address = %address.short(), score = score.value(), "trust score derived");
        score
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditrust_core::ContractConfig;
    use creditrust_ledger::MemoryLedger;
    use serde_json::json;

    fn setup() -> (Arc<MemoryLedger>, TrustScoreCalculator, ContractConfig, AccountAddress) {
        let memory = Arc::new(MemoryLedger::new());
        let contract = ContractConfig::default();
        let ledger = Arc::new(LedgerClient::new(memory.clone(), contract.clone()));
        let address = AccountAddress::parse("0xb0b").unwrap();
        (memory, TrustScoreCalculator::new(ledger), contract, address)
    }

    fn achievements(n: usize) -> serde_json::Value {
        let list: Vec<_> = (0..n)
            .map(|i| json!({ "name": format!("badge-{i}"), "description": "", "minted_at": "0" }))
            .collect();
        json!({ "achievements": list })
    }

    #[tokio::test]
    async fn test_full_profile() {
        let (memory, calc, contract, address) = setup();
        memory.put_resource(
            address,
            contract.resource_type("UserProfile"),
            json!({ "username": "bob", "level": "3", "xp": "1250", "completed_actions": "8" }),
        );
        memory.put_resource(address, contract.resource_type("AchievementCollection"), achievements(3));

        assert_eq!(calc.calculate(&address).await.value(), 730);
    }

    #[tokio::test]
    async fn test_no_profile_gives_default() {
        let (memory, calc, contract, address) = setup();
        memory.put_resource(address, contract.resource_type("AchievementCollection"), achievements(4));

        assert!(calc.input_for(&address).await.is_none());
        assert_eq!(calc.calculate(&address).await, DerivedTrustScore::DEFAULT);
    }

    #[tokio::test]
    async fn test_achievement_failure_counts_as_zero() {
        let (memory, calc, contract, address) = setup();
        memory.put_resource(
            address,
            contract.resource_type("UserProfile"),
            json!({ "completed_actions": "8" }),
        );
        memory.fail_resource(contract.resource_type("AchievementCollection"), "indexer down");

        let input = calc.input_for(&address).await.unwrap();
        assert_eq!(input.achievement_count, 0);
        assert_eq!(calc.calculate(&address).await.value(), 580);
    }

    #[tokio::test]
    async fn test_many_achievements_clamp() {
        let (memory, calc, contract, address) = setup();
        memory.put_resource(address, contract.resource_type("UserProfile"), json!({}));
        memory.put_resource(address, contract.resource_type("AchievementCollection"), achievements(20));

        assert_eq!(calc.calculate(&address).await.value(), 1000);
    }

    #[test]
    fn test_score_from_fetched_state() {
        let profile = UserProfile {
            completed_actions: 8,
            ..UserProfile::default()
        };
        assert_eq!(TrustScoreCalculator::score(Some(&profile), 3).value(), 730);
        assert_eq!(TrustScoreCalculator::score(None, 3), DerivedTrustScore::DEFAULT);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(7), 7);
        assert_eq!(saturate(u64::MAX), u32::MAX);
    }
}
