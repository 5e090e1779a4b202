//! Ledger Entry Models

use serde::{Deserialize, Serialize};

/// Business event that caused a ledger entry
///
/// Stored as snake_case text. Decoding an unknown value from storage is an
/// error rather than a silent new category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ReferenceType {
    /// Points earned on a purchase
    Order,
    /// Points spent on a voucher
    VoucherRedemption,
    /// Manual operator correction
    Adjustment,
    /// Bonus credit (birthday and similar campaigns)
    BirthdayBonus,
    /// Points expired
    Expiry,
    /// Order refund reversing earned points
    Refund,
}

impl ReferenceType {
    pub const ALL: [ReferenceType; 6] = [
        ReferenceType::Order,
        ReferenceType::VoucherRedemption,
        ReferenceType::Adjustment,
        ReferenceType::BirthdayBonus,
        ReferenceType::Expiry,
        ReferenceType::Refund,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Order => "order",
            ReferenceType::VoucherRedemption => "voucher_redemption",
            ReferenceType::Adjustment => "adjustment",
            ReferenceType::BirthdayBonus => "birthday_bonus",
            ReferenceType::Expiry => "expiry",
            ReferenceType::Refund => "refund",
        }
    }

    /// Display category for transaction history
    pub const fn category(&self) -> TransactionCategory {
        match self {
            ReferenceType::Order => TransactionCategory::Earned,
            ReferenceType::VoucherRedemption => TransactionCategory::Redeemed,
            ReferenceType::Adjustment => TransactionCategory::Adjusted,
            ReferenceType::BirthdayBonus => TransactionCategory::Bonus,
            ReferenceType::Expiry => TransactionCategory::Expired,
            ReferenceType::Refund => TransactionCategory::Refunded,
        }
    }
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable display vocabulary for transaction history filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    Earned,
    Redeemed,
    Adjusted,
    Bonus,
    Expired,
    Refunded,
}

impl TransactionCategory {
    /// The single reference type behind this category
    pub const fn reference_type(&self) -> ReferenceType {
        match self {
            TransactionCategory::Earned => ReferenceType::Order,
            TransactionCategory::Redeemed => ReferenceType::VoucherRedemption,
            TransactionCategory::Adjusted => ReferenceType::Adjustment,
            TransactionCategory::Bonus => ReferenceType::BirthdayBonus,
            TransactionCategory::Expired => ReferenceType::Expiry,
            TransactionCategory::Refunded => ReferenceType::Refund,
        }
    }
}

/// Ledger entry (积分流水), immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    /// Store-assigned, strictly increasing in creation order
    pub id: i64,
    pub account_id: i64,
    /// Positive = credit, negative = debit
    pub points_delta: i64,
    pub reference_type: ReferenceType,
    pub reference_id: String,
    pub reason: String,
    pub created_at: i64,
}

/// New ledger entry to append
#[derive(Debug, Clone)]
pub struct LedgerEntryCreate {
    pub account_id: i64,
    pub points_delta: i64,
    pub reference_type: ReferenceType,
    pub reference_id: String,
    pub reason: String,
}

/// Ledger entry with its running balance (for history views)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TransactionRecord {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub entry: LedgerEntry,
    pub customer_id: i64,
    /// Sum of all of the account's entries up to and including this one
    pub running_balance_after_entry: i64,
}

impl TransactionRecord {
    pub fn category(&self) -> TransactionCategory {
        self.entry.reference_type.category()
    }
}
