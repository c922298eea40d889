//! CrediTrust Identity Layer
//!
//! Reputation primitives for connected accounts:
//! - `TrustScoreInput` / `DerivedTrustScore`: the bounded point formula
//! - `TrustTier`: display bands (Fair, Good, Excellent)
//! - `TrustScoreCalculator`: derives scores from ledger state

pub mod calculator;
pub mod trust_score;

pub use calculator::TrustScoreCalculator;
pub use trust_score::{DerivedTrustScore, TrustScoreInput, TrustTier, BASE_SCORE, MAX_SCORE};
