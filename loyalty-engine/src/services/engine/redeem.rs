//! Redeem points for a voucher

use shared::models::{LedgerEntryCreate, LoyaltyAccount, RedeemRequest, RedeemResult, ReferenceType, Voucher};
use shared::util::{MILLIS_PER_DAY, now_millis, snowflake_id, voucher_code};
use shared::{AppError, AppResult};
use sqlx::SqliteConnection;

use super::{LoyaltyEngine, MAX_ID_ATTEMPTS, non_blank};
use crate::db::repository::{self, RepoError, ledger, voucher};
use crate::loyalty::redemption;

impl LoyaltyEngine {
    /// Exchange points for a single-use voucher.
    ///
    /// The voucher and its debit entry commit together or not at all. Two
    /// concurrent redemptions on one account serialise on the account's
    /// write lock, so they can never jointly overdraw.
    pub async fn redeem(&self, request: RedeemRequest) -> AppResult<RedeemResult> {
        let points = request.points_to_redeem;
        let increment = self.config.redemption_increment;
        if let Err(e) = redemption::validate_amount(points, increment) {
            tracing::warn!(customer_id = request.customer_id, points, "Invalid redemption amount");
            return Err(e);
        }

        let account = self.resolve_account(request.customer_id).await?;
        let now = now_millis();
        let mut tx = self.begin_for(&account, now).await?;

        let before = ledger::derive_balance(&mut *tx, account.id).await?;
        if let Err(e) = redemption::check_balance(before.current_balance, points) {
            tracing::warn!(
                customer_id = account.customer_id,
                balance = before.current_balance,
                points,
                "Redemption declined: insufficient balance"
            );
            return Err(e);
        }

        let value = redemption::voucher_value(points, increment, self.config.increment_value);
        let prefix = &self.config.voucher_code_prefix;
        let minted = self
            .mint_voucher(
                &mut tx,
                &account,
                points,
                value,
                non_blank(request.notes.as_deref()),
                now,
                || voucher_code(prefix),
            )
            .await?;

        let entry = LedgerEntryCreate {
            account_id: account.id,
            points_delta: -points,
            reference_type: ReferenceType::VoucherRedemption,
            reference_id: minted.id.to_string(),
            reason: format!("Redeemed for voucher {}", minted.code),
        };
        ledger::append(&mut *tx, &entry, now).await?;
        repository::commit(tx).await?;

        let new_balance = before.current_balance - points;
        tracing::info!(
            customer_id = account.customer_id,
            account_id = account.id,
            points,
            voucher_id = minted.id,
            value = minted.value,
            new_balance,
            "Points redeemed"
        );

        Ok(RedeemResult {
            voucher: minted,
            new_balance,
        })
    }

    /// Insert a voucher under a fresh code from `next_code`, retrying code
    /// or ID collisions
    #[allow(clippy::too_many_arguments)]
    async fn mint_voucher(
        &self,
        conn: &mut SqliteConnection,
        account: &LoyaltyAccount,
        points: i64,
        value: f64,
        notes: Option<String>,
        now: i64,
        mut next_code: impl FnMut() -> String,
    ) -> AppResult<Voucher> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = Voucher {
                id: snowflake_id(),
                code: next_code(),
                account_id: account.id,
                customer_id: account.customer_id,
                value,
                points_redeemed: points,
                valid_from: now,
                valid_until: now + self.config.voucher_validity_days * MILLIS_PER_DAY,
                usage_limit: 1,
                usage_per_customer: 1,
                notes: notes.clone(),
                created_at: now,
            };
            match voucher::insert(&mut *conn, &candidate).await {
                Ok(()) => return Ok(candidate),
                Err(RepoError::Duplicate(_)) => {
                    tracing::warn!(account_id = account.id, attempt, "Voucher code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::internal("Failed to generate a unique voucher code"))
    }
}
