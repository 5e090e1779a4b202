//! Voucher Model

use serde::{Deserialize, Serialize};

/// Fixed-value, single-use reward instrument minted by a redemption
///
/// The engine only mints vouchers. Usage at checkout is enforced by the
/// coupon system that reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Voucher {
    pub id: i64,
    pub code: String,
    pub account_id: i64,
    pub customer_id: i64,
    /// Monetary value, 2 decimal places
    pub value: f64,
    pub points_redeemed: i64,
    pub valid_from: i64,
    pub valid_until: i64,
    pub usage_limit: i32,
    pub usage_per_customer: i32,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl Voucher {
    pub fn is_valid_at(&self, timestamp: i64) -> bool {
        timestamp >= self.valid_from && timestamp < self.valid_until
    }
}
