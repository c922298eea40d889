use async_trait::async_trait;
use creditrust_core::AccountAddress;

use crate::error::LedgerError;

/// Read-only access to account resources on the ledger.
///
/// Implementations return `Ok(None)` when the account does not hold the
/// requested resource; only transport or decoding problems are errors.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch the `data` object of a Move resource held by `address`.
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<serde_json::Value>, LedgerError>;

    /// Identifier of this backend (e.g. "rest", "memory").
    fn ledger_id(&self) -> &str;
}
