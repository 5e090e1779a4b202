//! Read-only projections: account summary and transaction history

use shared::models::{AccountSummary, TransactionFilter, TransactionRecord};
use shared::{AppResult, PaginatedResponse};

use super::LoyaltyEngine;
use crate::db::repository::ledger::{self, HistoryQuery};

impl LoyaltyEngine {
    /// Balance, lifetime earned and tier progress for a customer.
    ///
    /// Creates the account on first use, so a known customer without
    /// activity reads as an empty bronze account.
    pub async fn get_account(&self, customer_id: i64) -> AppResult<AccountSummary> {
        let account = self.resolve_account(customer_id).await?;
        let balance = self.derive_balance(account.id).await?;
        let status = self.classify(balance.lifetime_earned);

        Ok(AccountSummary {
            account_id: account.id,
            customer_id: account.customer_id,
            balance: balance.current_balance,
            lifetime_earned: balance.lifetime_earned,
            tier: status.tier,
            tier_multiplier: status.multiplier,
            next_tier: status.next_tier,
            points_to_next_tier: status.points_to_next_tier,
        })
    }

    /// History page, newest first.
    ///
    /// Each record carries the account's running balance after that entry,
    /// counted over the full ledger regardless of the filter.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> AppResult<PaginatedResponse<TransactionRecord>> {
        let page = filter.effective_page();
        let limit = filter.effective_limit();
        let query = HistoryQuery {
            customer_id: filter.customer_id,
            reference_type: filter.category.map(|c| c.reference_type()),
            from: filter.from,
            to: filter.to,
            limit: i64::from(limit),
            offset: i64::try_from(filter.offset()).unwrap_or(i64::MAX),
        };

        let (records, total) = ledger::list_history(self.pool(), &query).await?;
        Ok(PaginatedResponse::new(records, total, page, limit))
    }
}
