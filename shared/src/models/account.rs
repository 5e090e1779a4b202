//! Loyalty Account Model

use serde::{Deserialize, Serialize};

/// Loyalty account (积分账户)
///
/// One account per customer, created lazily on first use. The balance is
/// never stored here; it is derived from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoyaltyAccount {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: i64,
    /// Touched by every mutating operation; serialises writers per account.
    pub last_activity_at: i64,
}

/// Balance derived by folding the account's ledger entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DerivedBalance {
    /// Signed sum of all deltas
    pub current_balance: i64,
    /// Sum of positive deltas only; never decreases
    pub lifetime_earned: i64,
}

impl DerivedBalance {
    /// Fold a sequence of signed deltas
    pub fn from_deltas<I>(deltas: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        deltas.into_iter().fold(Self::default(), |acc, d| Self {
            current_balance: acc.current_balance + d,
            lifetime_earned: acc.lifetime_earned + d.max(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_deltas_empty() {
        assert_eq!(DerivedBalance::from_deltas([]), DerivedBalance::default());
    }

    #[test]
    fn test_from_deltas_debits_do_not_reduce_lifetime() {
        let b = DerivedBalance::from_deltas([500, -200, 100, -300]);
        assert_eq!(b.current_balance, 100);
        assert_eq!(b.lifetime_earned, 600);
    }
}
