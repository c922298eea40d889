//! Integration test: wallet session lifecycle through the application root.
//!
//! Drives `CrediTrustApp` with an in-memory wallet and ledger: restore,
//! connect, account switches pushed by the wallet, and disconnect.

use std::time::Duration;

use creditrust_core::{Balance, SessionStatus};
use creditrust_integration_tests::{account, address, Platform};
use creditrust_wallet::{AccountChange, ConnectError, ConnectBehavior, DisconnectError};
use tokio::sync::mpsc;

#[tokio::test]
async fn test_returning_user_is_restored_silently() {
    let platform = Platform::new("0xa11ce");
    platform.seed_balance("0xa11ce", 250_000_000);
    platform.wallet.authorize();

    let snapshot = platform.app.start().await.unwrap();
    assert_eq!(snapshot.status(), SessionStatus::Connected);
    assert_eq!(snapshot.address(), Some(&address("0xa11ce")));
    assert_eq!(snapshot.balance(), Some(Balance::from_octas(250_000_000)));
    assert_eq!(platform.wallet.connect_calls(), 0);
}

#[tokio::test]
async fn test_first_visit_then_connect() {
    let platform = Platform::new("0xa11ce");
    let snapshot = platform.app.start().await.unwrap();
    assert_eq!(snapshot.status(), SessionStatus::Disconnected);

    let connected = platform.app.session().connect().await.unwrap();
    assert_eq!(connected.account, account("0xa11ce"));
    assert_eq!(connected.balance, Balance::ZERO);
    assert_eq!(platform.wallet.connect_calls(), 1);
}

#[tokio::test]
async fn test_double_click_prompts_once() {
    let platform = Platform::new("0xa11ce");
    let session = platform.app.session().clone();
    platform.wallet.pause_connect();

    let clicks: Vec<_> = (0..5)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.connect().await })
        })
        .collect();
    while platform.wallet.connect_calls() == 0 {
        tokio::task::yield_now().await;
    }
    platform.wallet.resume_connect();

    for click in clicks {
        let connected = click.await.unwrap().unwrap();
        assert_eq!(connected.account.address, address("0xa11ce"));
    }
    assert_eq!(platform.wallet.connect_calls(), 1);
}

#[tokio::test]
async fn test_rejected_connect_then_wallet_switch_recovers() {
    let platform = Platform::new("0xa11ce");
    platform.wallet.set_connect_behavior(ConnectBehavior::Reject);

    let err = platform.app.session().connect().await.unwrap_err();
    assert_eq!(err, ConnectError::UserRejected);
    assert_eq!(platform.app.session().status(), SessionStatus::Error);

    let snapshot = platform
        .app
        .session()
        .apply_account_change(AccountChange::Switched(account("0xb0b")))
        .await;
    assert_eq!(snapshot.status(), SessionStatus::Connected);
    assert_eq!(snapshot.address(), Some(&address("0xb0b")));
    assert!(snapshot.last_error().is_none());
}

#[tokio::test]
async fn test_wallet_pushes_switch_and_lock() {
    let platform = Platform::new("0xa11ce");
    platform.seed_balance("0xb0b", 9);
    platform.app.session().connect().await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = platform
        .app
        .watch_accounts(move |snapshot| {
            let _ = tx.send(snapshot.clone());
        })
        .unwrap();

    platform.wallet.switch_account(Some(account("0xb0b")));
    let switched = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(switched.address(), Some(&address("0xb0b")));
    assert_eq!(switched.balance(), Some(Balance::from_octas(9)));

    platform.wallet.switch_account(None);
    let locked = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(locked.status(), SessionStatus::Disconnected);
    assert!(locked.address().is_none());

    listener.abort();
}

#[tokio::test]
async fn test_disconnect_during_prompt_wins() {
    let platform = Platform::new("0xa11ce");
    let session = platform.app.session().clone();
    platform.wallet.pause_connect();

    let attempt = tokio::spawn({
        let session = session.clone();
        async move { session.connect().await }
    });
    while platform.wallet.connect_calls() == 0 {
        tokio::task::yield_now().await;
    }

    session.disconnect().await.unwrap();
    platform.wallet.resume_connect();

    assert_eq!(attempt.await.unwrap(), Err(ConnectError::StaleCompletion));
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.snapshot().last_error().is_none());
}

#[tokio::test]
async fn test_disconnect_failure_still_logs_out() {
    let platform = Platform::new("0xa11ce");
    let session = platform.app.session();
    session.connect().await.unwrap();
    platform.wallet.fail_disconnect("extension crashed");

    let result = session.disconnect().await;
    assert!(matches!(result, Err(DisconnectError::Remote(_))));
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.account().is_none());

    // A fresh connect prompts again.
    session.connect().await.unwrap();
    assert_eq!(platform.wallet.connect_calls(), 2);
}
