use async_trait::async_trait;
use creditrust_core::AccountAddress;
use reqwest::StatusCode;

use crate::error::LedgerError;
use crate::traits::LedgerQuery;

/// Fullnode REST backend.
///
/// Issues `GET {node_url}/accounts/{address}/resource/{resource_type}` and
/// returns the `data` object of the resource. A 404 means the account does
/// not hold the resource.
pub struct RestLedger {
    client: reqwest::Client,
    node_url: String,
}

impl RestLedger {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), node_url)
    }

    pub fn with_client(client: reqwest::Client, node_url: impl Into<String>) -> Self {
        Self {
            client,
            node_url: node_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Build the resource URL for an account.
    pub fn resource_url(&self, address: &AccountAddress, resource_type: &str) -> String {
        format!(
            "{}/accounts/{}/resource/{}",
            self.node_url, address, resource_type
        )
    }
}

#[async_trait]
impl LedgerQuery for RestLedger {
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<serde_json::Value>, LedgerError> {
        let url = self.resource_url(address, resource_type);
        tracing::debug!(%url, "fetching account resource");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(address = %address.short(), resource_type, "resource not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut resource: serde_json::Value = response.json().await?;
        match resource.get_mut("data").map(serde_json::Value::take) {
            Some(data) => Ok(Some(data)),
            None => Err(LedgerError::QueryFailed(format!(
                "resource {} has no data field",
                resource_type
            ))),
        }
    }

    fn ledger_id(&self) -> &str {
        "rest"
    }
}
