//! Earn points on a completed order

use shared::AppResult;
use shared::models::{EarnRequest, EarnResult, LedgerEntryCreate, ReferenceType};
use shared::util::now_millis;
use sqlx::SqliteConnection;

use super::{LoyaltyEngine, non_blank, require_text};
use crate::db::repository::{self, RepoError, ledger};
use crate::loyalty::{earning, redemption};

impl LoyaltyEngine {
    /// Credit points for an order.
    ///
    /// The tier multiplier in force before the order applies; the result
    /// reports the tier after it. Crediting an order twice returns the
    /// first award with `duplicate = true` and writes nothing.
    pub async fn earn(&self, request: EarnRequest) -> AppResult<EarnResult> {
        let order_id = require_text(&request.order_id, "order_id")?;
        earning::validate_subtotal(request.order_subtotal)?;

        let account = self.resolve_account(request.customer_id).await?;
        let now = now_millis();
        let mut tx = self.begin_for(&account, now).await?;

        if let Some(prior) = self.replay_earn(&mut tx, account.id, &order_id).await? {
            tracing::info!(
                customer_id = account.customer_id,
                order_id = %order_id,
                "Order already credited"
            );
            return Ok(prior);
        }

        let before = ledger::derive_balance(&mut *tx, account.id).await?;
        let status = self.classify(before.lifetime_earned);
        let points = earning::calculate_earned(
            request.order_subtotal,
            self.config.points_per_currency_unit,
            status.multiplier,
        )?;

        let new_balance = redemption::check_credit(&before, points)?;

        let entry = LedgerEntryCreate {
            account_id: account.id,
            points_delta: points,
            reference_type: ReferenceType::Order,
            reference_id: order_id.clone(),
            reason: non_blank(request.description.as_deref())
                .unwrap_or_else(|| format!("Order {order_id}")),
        };
        match ledger::append(&mut *tx, &entry, now).await {
            Ok(_) => {}
            Err(RepoError::Duplicate(_)) => {
                if let Some(prior) = self.replay_earn(&mut tx, account.id, &order_id).await? {
                    return Ok(prior);
                }
                return Err(RepoError::Duplicate(format!("order {order_id}")).into());
            }
            Err(e) => return Err(e.into()),
        }
        repository::commit(tx).await?;

        let after = self.classify(before.lifetime_earned + points);
        if after.tier != status.tier {
            tracing::info!(
                customer_id = account.customer_id,
                from = %status.tier,
                to = %after.tier,
                "Tier changed"
            );
        }
        tracing::info!(
            customer_id = account.customer_id,
            account_id = account.id,
            order_id = %order_id,
            points,
            new_balance,
            "Points earned"
        );

        Ok(EarnResult {
            points_earned: points,
            new_balance,
            tier: after.tier,
            tier_multiplier: after.multiplier,
            duplicate: false,
        })
    }

    /// The earlier award for an order, if one exists
    async fn replay_earn(
        &self,
        conn: &mut SqliteConnection,
        account_id: i64,
        order_id: &str,
    ) -> AppResult<Option<EarnResult>> {
        let Some(prior) =
            ledger::find_by_reference(&mut *conn, account_id, ReferenceType::Order, order_id)
                .await?
        else {
            return Ok(None);
        };
        let balance = ledger::derive_balance(&mut *conn, account_id).await?;
        let status = self.classify(balance.lifetime_earned);
        Ok(Some(EarnResult {
            points_earned: prior.points_delta,
            new_balance: balance.current_balance,
            tier: status.tier,
            tier_multiplier: status.multiplier,
            duplicate: true,
        }))
    }
}
