//! Tier Models

use serde::{Deserialize, Serialize};

/// One row of the tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub name: String,
    /// Minimum lifetime-earned points
    pub threshold: i64,
    /// Earning multiplier applied to the base rate
    pub multiplier: f64,
}

impl TierDefinition {
    pub fn new(name: impl Into<String>, threshold: i64, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            threshold,
            multiplier,
        }
    }
}

/// Classification of a lifetime-earned total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStatus {
    pub tier: String,
    pub multiplier: f64,
    /// None at the top tier
    pub next_tier: Option<String>,
    /// None at the top tier
    pub points_to_next_tier: Option<i64>,
}
