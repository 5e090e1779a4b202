//! Tier Classifier
//!
//! Maps a lifetime-earned total to a membership tier. The tier table is
//! data: operators add or reshape tiers through configuration, the
//! classification logic never changes.

use std::collections::HashSet;

use shared::models::{TierDefinition, TierStatus};
use shared::{AppError, AppResult};

/// Validated tier table, sorted ascending by threshold
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<TierDefinition>,
}

impl Default for TierTable {
    /// Bronze (0, ×1.0), Silver (5,000, ×1.25), Gold (20,000, ×1.5)
    fn default() -> Self {
        Self {
            tiers: vec![
                TierDefinition::new("bronze", 0, 1.0),
                TierDefinition::new("silver", 5_000, 1.25),
                TierDefinition::new("gold", 20_000, 1.5),
            ],
        }
    }
}

impl TierTable {
    /// Build a table from unordered definitions.
    ///
    /// Requires a tier at threshold 0 so every total classifies, unique
    /// names and thresholds, and finite positive multipliers.
    pub fn new(mut tiers: Vec<TierDefinition>) -> AppResult<Self> {
        if tiers.is_empty() {
            return Err(AppError::config("tier table must not be empty"));
        }

        let mut names = HashSet::new();
        let mut thresholds = HashSet::new();
        for tier in &tiers {
            if tier.name.trim().is_empty() {
                return Err(AppError::config("tier name must not be empty"));
            }
            if tier.threshold < 0 {
                return Err(AppError::config(format!(
                    "tier '{}' has negative threshold {}",
                    tier.name, tier.threshold
                )));
            }
            if !tier.multiplier.is_finite() || tier.multiplier <= 0.0 {
                return Err(AppError::config(format!(
                    "tier '{}' multiplier must be a finite positive number, got {}",
                    tier.name, tier.multiplier
                )));
            }
            if !names.insert(tier.name.as_str()) {
                return Err(AppError::config(format!("duplicate tier name '{}'", tier.name)));
            }
            if !thresholds.insert(tier.threshold) {
                return Err(AppError::config(format!(
                    "duplicate tier threshold {}",
                    tier.threshold
                )));
            }
        }
        if !thresholds.contains(&0) {
            return Err(AppError::config("tier table needs a tier with threshold 0"));
        }

        tiers.sort_by_key(|t| t.threshold);
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[TierDefinition] {
        &self.tiers
    }

    /// Classify a lifetime-earned total.
    ///
    /// Picks the highest tier whose threshold is ≤ `lifetime_earned`. Totals
    /// below zero cannot occur (lifetime earned only sums credits) and fall
    /// into the base tier.
    pub fn classify(&self, lifetime_earned: i64) -> TierStatus {
        // Index of the first tier above the total; the base tier has threshold 0.
        let above = self
            .tiers
            .partition_point(|t| t.threshold <= lifetime_earned)
            .max(1);
        let current = &self.tiers[above - 1];
        let next = self.tiers.get(above);

        TierStatus {
            tier: current.name.clone(),
            multiplier: current.multiplier,
            next_tier: next.map(|t| t.name.clone()),
            points_to_next_tier: next.map(|t| (t.threshold - lifetime_earned).max(0)),
        }
    }
}
