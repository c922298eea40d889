//! Shared fixtures for the cross-crate flows in `tests/`.
//!
//! A `Platform` wires a `CrediTrustApp` to an in-memory ledger and wallet,
//! so tests can seed on-chain resources and drive the wallet by hand.

use std::sync::Arc;

use creditrust_app::CrediTrustApp;
use creditrust_core::{AccountAddress, Balance, CrediTrustConfig, WalletAccount};
use creditrust_ledger::MemoryLedger;
use creditrust_wallet::MemoryWallet;
use serde_json::json;

pub fn address(hex: &str) -> AccountAddress {
    AccountAddress::parse(hex).unwrap()
}

pub fn account(hex: &str) -> WalletAccount {
    WalletAccount::new(address(hex), format!("pk-{hex}"))
}

pub struct Platform {
    pub config: CrediTrustConfig,
    pub ledger: Arc<MemoryLedger>,
    pub wallet: Arc<MemoryWallet>,
    pub app: CrediTrustApp,
}

impl Platform {
    /// A platform whose wallet holds `owner`.
    pub fn new(owner: &str) -> Self {
        Self::with_config(owner, CrediTrustConfig::default())
    }

    pub fn with_config(owner: &str, config: CrediTrustConfig) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        let wallet = Arc::new(MemoryWallet::new(account(owner)));
        let app = CrediTrustApp::new(config.clone(), ledger.clone(), Some(wallet.clone()));
        Self {
            config,
            ledger,
            wallet,
            app,
        }
    }

    pub fn seed_balance(&self, owner: &str, octas: u64) {
        self.ledger.set_balance(address(owner), Balance::from_octas(octas));
    }

    pub fn seed_profile(&self, owner: &str, username: &str, completed_actions: u64) {
        self.ledger.put_resource(
            address(owner),
            self.config.contract.resource_type("UserProfile"),
            json!({
                "username": username,
                "level": "1",
                "xp": "0",
                "completed_actions": completed_actions.to_string(),
            }),
        );
    }

    pub fn seed_achievements(&self, owner: &str, names: &[&str]) {
        let achievements: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "name": name, "description": "", "minted_at": (1_700_000_000 + i).to_string() }))
            .collect();
        self.ledger.put_resource(
            address(owner),
            self.config.contract.resource_type("AchievementCollection"),
            json!({ "achievements": achievements }),
        );
    }
}
