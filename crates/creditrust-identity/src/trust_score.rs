use serde::{Deserialize, Serialize};
use std::fmt;

/// Score every account starts from.
pub const BASE_SCORE: u32 = 500;

/// Upper bound of the trust score.
pub const MAX_SCORE: u32 = 1000;

/// Points per soulbound achievement.
pub const ACHIEVEMENT_WEIGHT: u32 = 50;

/// Points per completed platform action.
pub const ACTION_WEIGHT: u32 = 10;

/// Inputs to the trust score, taken from a profile snapshot and the
/// account's achievement collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScoreInput {
    pub base_score: u32,
    pub achievement_count: u32,
    pub completed_actions: u32,
}

impl TrustScoreInput {
    pub fn new(achievement_count: u32, completed_actions: u32) -> Self {
        Self {
            base_score: BASE_SCORE,
            achievement_count,
            completed_actions,
        }
    }

    /// `min(1000, base + achievements * 50 + actions * 10)`.
    ///
    /// Arithmetic saturates, so absurd counts still land on the cap.
    pub fn derive(&self) -> DerivedTrustScore {
        let score = self
            .base_score
            .saturating_add(self.achievement_count.saturating_mul(ACHIEVEMENT_WEIGHT))
            .saturating_add(self.completed_actions.saturating_mul(ACTION_WEIGHT));
        DerivedTrustScore(score.min(MAX_SCORE))
    }
}

impl Default for TrustScoreInput {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// A trust score in `[0, 1000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedTrustScore(u32);

impl DerivedTrustScore {
    /// The score of an account with no profile.
    pub const DEFAULT: DerivedTrustScore = DerivedTrustScore(BASE_SCORE);

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn tier(&self) -> TrustTier {
        TrustTier::from_score(self.0)
    }

    /// Fraction of the maximum score, for progress bars.
    pub fn ratio(&self) -> f64 {
        f64::from(self.0) / f64::from(MAX_SCORE)
    }
}

impl Default for DerivedTrustScore {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DerivedTrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_SCORE)
    }
}

/// Display band of a trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustTier {
    Fair,
    Good,
    Excellent,
}

impl TrustTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            900.. => Self::Excellent,
            700..=899 => Self::Good,
            _ => Self::Fair,
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fair => write!(f, "Fair"),
            Self::Good => write!(f, "Good"),
            Self::Excellent => write!(f, "Excellent"),
        }
    }
}
