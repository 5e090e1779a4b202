//! Manual adjustments and bonus credits

use shared::models::{AdjustRequest, BonusRequest, LedgerEntryCreate, ReferenceType};
use shared::util::now_millis;
use shared::AppResult;

use super::{LoyaltyEngine, require_text};
use crate::db::repository::{self, ledger};
use crate::loyalty::redemption;

impl LoyaltyEngine {
    /// Operator correction; returns the new balance.
    ///
    /// Positive adjustments count toward lifetime earned. A negative one may
    /// not take the balance below zero.
    pub async fn adjust(&self, request: AdjustRequest) -> AppResult<i64> {
        redemption::validate_adjustment(request.points_delta, &request.reason)?;
        let reason = request.reason.trim().to_string();

        let account = self.resolve_account(request.customer_id).await?;
        let now = now_millis();
        let mut tx = self.begin_for(&account, now).await?;

        let before = ledger::derive_balance(&mut *tx, account.id).await?;
        let checked = if request.points_delta > 0 {
            redemption::check_credit(&before, request.points_delta)
        } else {
            redemption::check_adjustment(before.current_balance, request.points_delta)
        };
        let new_balance = match checked {
            Ok(after) => after,
            Err(e) => {
                tracing::warn!(
                    customer_id = account.customer_id,
                    balance = before.current_balance,
                    points_delta = request.points_delta,
                    code = ?e.code,
                    "Adjustment declined"
                );
                return Err(e);
            }
        };

        let entry = LedgerEntryCreate {
            account_id: account.id,
            points_delta: request.points_delta,
            reference_type: ReferenceType::Adjustment,
            reference_id: uuid::Uuid::new_v4().to_string(),
            reason,
        };
        ledger::append(&mut *tx, &entry, now).await?;
        repository::commit(tx).await?;

        tracing::info!(
            customer_id = account.customer_id,
            account_id = account.id,
            points = request.points_delta,
            new_balance,
            "Points adjusted"
        );
        Ok(new_balance)
    }

    /// Credit bonus points (birthday and similar); returns the new balance
    pub async fn award_bonus(&self, request: BonusRequest) -> AppResult<i64> {
        redemption::validate_bonus(request.points)?;
        let reason = require_text(&request.reason, "reason")?;

        let account = self.resolve_account(request.customer_id).await?;
        let now = now_millis();
        let mut tx = self.begin_for(&account, now).await?;

        let before = ledger::derive_balance(&mut *tx, account.id).await?;
        let new_balance = redemption::check_credit(&before, request.points)?;
        let entry = LedgerEntryCreate {
            account_id: account.id,
            points_delta: request.points,
            reference_type: ReferenceType::BirthdayBonus,
            reference_id: uuid::Uuid::new_v4().to_string(),
            reason,
        };
        ledger::append(&mut *tx, &entry, now).await?;
        repository::commit(tx).await?;

        tracing::info!(
            customer_id = account.customer_id,
            account_id = account.id,
            points = request.points,
            new_balance,
            "Bonus awarded"
        );
        Ok(new_balance)
    }
}
