use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use creditrust_core::{AccountAddress, Balance};
use dashmap::DashMap;
use serde_json::json;
use tokio::sync::watch;

use crate::error::LedgerError;
use crate::models::APT_COIN_STORE;
use crate::traits::LedgerQuery;

/// In-process ledger backed by a concurrent map.
///
/// Resources are stored as their JSON `data` objects, keyed by account and
/// resource type. Individual resource types can be made to fail, which is how
/// the degrade-to-default paths are exercised. Queries can also be held
/// open with [`pause_queries`](Self::pause_queries) to exercise races with
/// slow reads.
pub struct MemoryLedger {
    resources: DashMap<(AccountAddress, String), serde_json::Value>,
    failures: DashMap<String, String>,
    queries: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
            failures: DashMap::new(),
            queries: AtomicUsize::new(0),
            gate: watch::channel(true).0,
        }
    }

    /// Store (or replace) a resource for an account.
    pub fn put_resource(
        &self,
        address: AccountAddress,
        resource_type: impl Into<String>,
        data: serde_json::Value,
    ) {
        self.resources.insert((address, resource_type.into()), data);
    }

    pub fn remove_resource(&self, address: &AccountAddress, resource_type: &str) {
        self.resources.remove(&(*address, resource_type.to_string()));
    }

    /// Set an account's APT balance.
    pub fn set_balance(&self, address: AccountAddress, balance: Balance) {
        self.put_resource(
            address,
            APT_COIN_STORE,
            json!({ "coin": { "value": balance.octas().to_string() } }),
        );
    }

    /// Make every query for `resource_type` fail with `message`.
    pub fn fail_resource(&self, resource_type: impl Into<String>, message: impl Into<String>) {
        self.failures.insert(resource_type.into(), message.into());
    }

    pub fn clear_failure(&self, resource_type: &str) {
        self.failures.remove(resource_type);
    }

    /// Hold every query open until [`resume_queries`](Self::resume_queries).
    /// Held queries are already counted by [`query_count`](Self::query_count).
    pub fn pause_queries(&self) {
        self.gate.send_replace(false);
    }

    pub fn resume_queries(&self) {
        self.gate.send_replace(true);
    }

    /// Number of queries received so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerQuery for MemoryLedger {
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<serde_json::Value>, LedgerError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.gate.subscribe();
        if gate.wait_for(|open| *open).await.is_err() {
            return Err(LedgerError::QueryFailed("ledger shut down".into()));
        }

        if let Some(message) = self.failures.get(resource_type) {
            return Err(LedgerError::QueryFailed(message.value().clone()));
        }

        Ok(self
            .resources
            .get(&(*address, resource_type.to_string()))
            .map(|entry| entry.value().clone()))
    }

    fn ledger_id(&self) -> &str {
        "memory"
    }
}
