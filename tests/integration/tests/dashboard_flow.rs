//! Integration test: dashboard and trust score across ledger, identity,
//! wallet and app crates.

use creditrust_core::CrediTrustConfig;
use creditrust_identity::{DerivedTrustScore, TrustTier};
use creditrust_integration_tests::{address, Platform};

#[tokio::test]
async fn test_dashboard_for_established_user() {
    let platform = Platform::new("0xa11ce");
    platform.seed_profile("0xa11ce", "alice", 8);
    platform.seed_achievements("0xa11ce", &["First Steps", "Contract Caller", "Collector"]);

    let view = platform.app.dashboard().load(&address("0xa11ce")).await;
    assert_eq!(view.profile.unwrap().username, "alice");
    assert_eq!(view.trust_score.value(), 730);
    assert_eq!(view.tier, TrustTier::Good);
    assert_eq!(view.learning_modules.len(), 6);
    assert!(view.activity.is_empty());

    assert_eq!(platform.app.trust_score(&address("0xa11ce")).await.value(), 730);
}

#[tokio::test]
async fn test_new_user_gets_profile_created_on_connect() {
    let platform = Platform::new("0xa11ce");
    platform.app.session().connect().await.unwrap();

    let view = platform.app.dashboard().load(&address("0xa11ce")).await;
    // The memory ledger does not execute transactions, so the profile is
    // still missing; the creation was submitted though.
    assert!(view.profile.is_none());
    assert_eq!(view.trust_score, DerivedTrustScore::DEFAULT);

    let submitted = platform.wallet.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].function.ends_with("::create_user_profile"));
}

#[tokio::test]
async fn test_actions_use_configured_contract() {
    let mut config = CrediTrustConfig::default();
    config.contract.address = "0xcafe".into();
    config.contract.module = "platform".into();
    let platform = Platform::with_config("0xa11ce", config);
    platform.seed_profile("0xa11ce", "alice", 1);
    platform.app.session().connect().await.unwrap();

    let view = platform
        .app
        .dashboard()
        .complete_action("credential_verified")
        .await
        .unwrap();
    assert_eq!(view.trust_score.value(), 510);

    platform
        .app
        .dashboard()
        .mint_achievement("First Steps", "Completed a lesson")
        .await
        .unwrap();

    let functions: Vec<_> = platform
        .wallet
        .submitted()
        .into_iter()
        .map(|p| p.function)
        .collect();
    assert_eq!(
        functions,
        vec![
            "0xcafe::platform::complete_action".to_string(),
            "0xcafe::platform::mint_achievement_sbt".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_degraded_ledger_still_renders() {
    let platform = Platform::new("0xa11ce");
    platform.seed_profile("0xa11ce", "alice", 3);
    platform.ledger.fail_resource(
        platform.config.contract.resource_type("AchievementCollection"),
        "indexer down",
    );
    platform.ledger.fail_resource(
        platform.config.contract.resource_type("LearningModules"),
        "indexer down",
    );

    let view = platform.app.dashboard().load(&address("0xa11ce")).await;
    assert!(view.achievements.is_empty());
    assert_eq!(view.trust_score.value(), 530);
    assert_eq!(view.learning_modules.len(), 6);
}
