//! Loyalty operation payloads and results

use serde::{Deserialize, Serialize};

use super::ledger::TransactionCategory;
use super::voucher::Voucher;

/// Earn points for a completed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnRequest {
    pub customer_id: i64,
    pub order_id: String,
    pub order_subtotal: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnResult {
    pub points_earned: i64,
    pub new_balance: i64,
    pub tier: String,
    pub tier_multiplier: f64,
    /// True when the order was already credited and nothing was written
    pub duplicate: bool,
}

/// Redeem points for a voucher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub customer_id: i64,
    pub points_to_redeem: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemResult {
    pub voucher: Voucher,
    pub new_balance: i64,
}

/// Manual adjustment by an operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub customer_id: i64,
    pub points_delta: i64,
    pub reason: String,
}

/// Bonus credit (birthday and similar campaigns)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusRequest {
    pub customer_id: i64,
    pub points: i64,
    pub reason: String,
}

/// Reverse the points earned on a refunded order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    pub customer_id: i64,
    pub order_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResult {
    /// Points actually debited (capped at the balance at refund time)
    pub points_reversed: i64,
    pub new_balance: i64,
    /// True when the order was already refunded and nothing was written
    pub duplicate: bool,
}

/// Account summary for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: i64,
    pub customer_id: i64,
    pub balance: i64,
    pub lifetime_earned: i64,
    pub tier: String,
    pub tier_multiplier: f64,
    pub next_tier: Option<String>,
    pub points_to_next_tier: Option<i64>,
}

/// Transaction history filter
///
/// `from`/`to` are UTC milliseconds; `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub customer_id: Option<i64>,
    pub category: Option<TransactionCategory>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// 1-based, defaults to 1
    pub page: Option<u32>,
    /// Defaults to 20, capped at 100
    pub limit: Option<u32>,
}

impl TransactionFilter {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    pub fn for_customer(customer_id: i64) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Default::default()
        }
    }

    pub fn category(mut self, category: TransactionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn between(mut self, from: i64, to: i64) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.effective_page() as u64 - 1) * self.effective_limit() as u64
    }
}
