//! Reverse the points of a refunded order

use shared::models::{LedgerEntryCreate, ReferenceType, RefundRequest, RefundResult};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use super::{LoyaltyEngine, require_text};
use crate::db::repository::{self, ledger};

impl LoyaltyEngine {
    /// Debit the points credited for an order.
    ///
    /// The debit is capped at the current balance: points already spent are
    /// not clawed back. Lifetime earned is unaffected. Refunding an order a
    /// second time returns the first refund with `duplicate = true`.
    pub async fn refund_order(&self, request: RefundRequest) -> AppResult<RefundResult> {
        let order_id = require_text(&request.order_id, "order_id")?;
        let reason = require_text(&request.reason, "reason")?;

        let account = self.resolve_account(request.customer_id).await?;
        let now = now_millis();
        let mut tx = self.begin_for(&account, now).await?;

        if let Some(prior) =
            ledger::find_by_reference(&mut *tx, account.id, ReferenceType::Refund, &order_id).await?
        {
            let balance = ledger::derive_balance(&mut *tx, account.id).await?;
            tracing::info!(
                customer_id = account.customer_id,
                order_id = %order_id,
                "Order already refunded"
            );
            return Ok(RefundResult {
                points_reversed: -prior.points_delta,
                new_balance: balance.current_balance,
                duplicate: true,
            });
        }

        let Some(credit) =
            ledger::find_by_reference(&mut *tx, account.id, ReferenceType::Order, &order_id).await?
        else {
            tracing::warn!(
                customer_id = account.customer_id,
                order_id = %order_id,
                "Refund declined: order has no credit"
            );
            return Err(AppError::order_not_earned(&order_id));
        };

        let before = ledger::derive_balance(&mut *tx, account.id).await?;
        let reversed = credit.points_delta.min(before.current_balance).max(0);
        if reversed < credit.points_delta {
            tracing::warn!(
                customer_id = account.customer_id,
                order_id = %order_id,
                earned = credit.points_delta,
                reversed,
                "Refund capped at current balance"
            );
        }

        let entry = LedgerEntryCreate {
            account_id: account.id,
            points_delta: -reversed,
            reference_type: ReferenceType::Refund,
            reference_id: order_id.clone(),
            reason,
        };
        ledger::append(&mut *tx, &entry, now).await?;
        repository::commit(tx).await?;

        let new_balance = before.current_balance - reversed;
        tracing::info!(
            customer_id = account.customer_id,
            account_id = account.id,
            order_id = %order_id,
            points = reversed,
            new_balance,
            "Order points reversed"
        );
        Ok(RefundResult {
            points_reversed: reversed,
            new_balance,
            duplicate: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use shared::ErrorCode;
    use shared::models::{EarnRequest, RedeemRequest};

    async fn earn(engine: &LoyaltyEngine, order_id: &str, subtotal: f64) {
        engine
            .earn(EarnRequest {
                customer_id: 1,
                order_id: order_id.into(),
                order_subtotal: subtotal,
                description: None,
            })
            .await
            .unwrap();
    }

    fn refund(order_id: &str) -> RefundRequest {
        RefundRequest {
            customer_id: 1,
            order_id: order_id.into(),
            reason: "Order refunded".into(),
        }
    }

    #[tokio::test]
    async fn test_refund_reverses_order_credit() {
        let engine = engine().await;
        earn(&engine, "o-1", 300.0).await;
        earn(&engine, "o-2", 120.0).await;

        let result = engine.refund_order(refund("o-1")).await.unwrap();
        assert_eq!(result.points_reversed, 300);
        assert_eq!(result.new_balance, 120);
        assert!(!result.duplicate);

        let account = engine.resolve_account(1).await.unwrap();
        let balance = engine.derive_balance(account.id).await.unwrap();
        assert_eq!(balance.lifetime_earned, 420);
    }

    #[tokio::test]
    async fn test_refund_capped_at_balance() {
        let engine = engine().await;
        earn(&engine, "o-1", 300.0).await;
        engine
            .redeem(RedeemRequest {
                customer_id: 1,
                points_to_redeem: 200,
                notes: None,
            })
            .await
            .unwrap();

        let result = engine.refund_order(refund("o-1")).await.unwrap();
        assert_eq!(result.points_reversed, 100);
        assert_eq!(result.new_balance, 0);
    }

    #[tokio::test]
    async fn test_refund_twice_is_duplicate() {
        let engine = engine().await;
        earn(&engine, "o-1", 300.0).await;
        engine.refund_order(refund("o-1")).await.unwrap();

        let again = engine.refund_order(refund("o-1")).await.unwrap();
        assert!(again.duplicate);
        assert_eq!(again.points_reversed, 300);
        assert_eq!(again.new_balance, 0);
    }

    #[tokio::test]
    async fn test_refund_unknown_order() {
        let engine = engine().await;
        earn(&engine, "o-1", 300.0).await;

        let err = engine.refund_order(refund("o-404")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotEarned);

        let err = engine
            .refund_order(RefundRequest {
                reason: "  ".into(),
                ..refund("o-1")
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
