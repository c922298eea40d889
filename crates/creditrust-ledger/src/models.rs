//! On-chain resource shapes published by the learning-platform module.
//!
//! Move serializes `u64` values as decimal strings in JSON, so numeric fields
//! accept either a string or a number.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Resource type of the native coin store.
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

pub const USER_PROFILE: &str = "UserProfile";
pub const ACHIEVEMENT_COLLECTION: &str = "AchievementCollection";
pub const ACTIVITY_HISTORY: &str = "ActivityHistory";
pub const LEARNING_MODULES: &str = "LearningModules";

pub(crate) mod move_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A learner's on-chain profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default, with = "move_u64")]
    pub level: u64,
    #[serde(default, with = "move_u64")]
    pub xp: u64,
    #[serde(default, with = "move_u64")]
    pub completed_actions: u64,
}

/// A soulbound achievement token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unix seconds.
    #[serde(default, with = "move_u64")]
    pub minted_at: u64,
}

impl Achievement {
    pub fn minted_at_utc(&self) -> Option<DateTime<Utc>> {
        timestamp_utc(self.minted_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementCollection {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

/// Kind of an activity-feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    CredentialVerified,
    TrustScoreUpdate,
    CredentialRequested,
    NetworkConnection,
    DataStored,
    SecurityAlert,
    Other(String),
}

impl ActivityKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CredentialVerified => "credential_verified",
            Self::TrustScoreUpdate => "trust_score_update",
            Self::CredentialRequested => "credential_requested",
            Self::NetworkConnection => "network_connection",
            Self::DataStored => "data_stored",
            Self::SecurityAlert => "security_alert",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ActivityKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "credential_verified" => Self::CredentialVerified,
            "trust_score_update" => Self::TrustScoreUpdate,
            "credential_requested" => Self::CredentialRequested,
            "network_connection" => Self::NetworkConnection,
            "data_stored" => Self::DataStored,
            "security_alert" => Self::SecurityAlert,
            _ => Self::Other(value),
        }
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One entry of an account's activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "type", alias = "activity_type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Unix seconds.
    #[serde(default, with = "move_u64")]
    pub timestamp: u64,
}

impl ActivityRecord {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        timestamp_utc(self.timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHistory {
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

/// A learning module offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningModule {
    #[serde(with = "move_u64")]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, with = "move_u64")]
    pub xp_reward: u64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningModules {
    #[serde(default)]
    pub modules: Vec<LearningModule>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CoinStore {
    pub coin: Coin,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Coin {
    #[serde(with = "move_u64")]
    pub value: u64,
}

fn timestamp_utc(secs: u64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}
