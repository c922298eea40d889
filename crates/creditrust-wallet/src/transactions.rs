//! Outbound contract actions, submitted through the wallet for signing.

use creditrust_core::ContractConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransactionError;
use crate::session::WalletSession;

pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// JSON payload of an entry-function call, as wallets expect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub arguments: Vec<Value>,
    pub type_arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub fn new(function: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            arguments,
            type_arguments: Vec::new(),
        }
    }
}

/// A submitted, not yet confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// The learning-platform entry functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractAction {
    CreateUserProfile,
    CompleteAction { action_type: String },
    MintAchievementSbt { name: String, description: String },
}

impl ContractAction {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CreateUserProfile => "create_user_profile",
            Self::CompleteAction { .. } => "complete_action",
            Self::MintAchievementSbt { .. } => "mint_achievement_sbt",
        }
    }

    fn arguments(&self) -> Vec<Value> {
        match self {
            Self::CreateUserProfile => Vec::new(),
            Self::CompleteAction { action_type } => vec![Value::from(action_type.as_str())],
            Self::MintAchievementSbt { name, description } => {
                vec![Value::from(name.as_str()), Value::from(description.as_str())]
            }
        }
    }

    pub fn to_payload(&self, contract: &ContractConfig) -> EntryFunctionPayload {
        EntryFunctionPayload::new(contract.function_id(self.function_name()), self.arguments())
    }
}

/// Submits contract actions through a connected wallet session.
///
/// Results are not interpreted beyond success or failure.
#[derive(Clone)]
pub struct ContractActions {
    session: WalletSession,
    contract: ContractConfig,
}

impl ContractActions {
    pub fn new(session: WalletSession, contract: ContractConfig) -> Self {
        Self { session, contract }
    }

    /// The session transactions are signed through.
    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub async fn submit(&self, action: ContractAction) -> Result<PendingTransaction, TransactionError> {
        let payload = action.to_payload(&self.contract);
        tracing::info!(function = %payload.function, "submitting contract action");

        let result = self.session.sign_and_submit(&payload).await;
        match &result {
            Ok(tx) => tracing::info!(function = %payload.function, hash = %tx.hash, "contract action submitted"),
            Err(e) => tracing::warn!(function = %payload.function, error = %e, "contract action failed"),
        }
        result
    }

    pub async fn create_user_profile(&self) -> Result<PendingTransaction, TransactionError> {
        self.submit(ContractAction::CreateUserProfile).await
    }

    pub async fn complete_action(
        &self,
        action_type: impl Into<String>,
    ) -> Result<PendingTransaction, TransactionError> {
        self.submit(ContractAction::CompleteAction {
            action_type: action_type.into(),
        })
        .await
    }

    pub async fn mint_achievement_sbt(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<PendingTransaction, TransactionError> {
        self.submit(ContractAction::MintAchievementSbt {
            name: name.into(),
            description: description.into(),
        })
        .await
    }
}
