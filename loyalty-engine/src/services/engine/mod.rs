//! Loyalty Engine
//!
//! Orchestrates the points operations over the ledger. Every mutating
//! operation follows the same shape:
//!
//! 1. Validate the request shape (no storage access)
//! 2. Resolve the customer's account
//! 3. Open a transaction and touch the account row, taking the write lock
//! 4. Derive the balance on that transaction and check business rules
//! 5. Append the ledger entry (and voucher) and commit
//!
//! A rule violation returns before anything is written; dropping the
//! transaction rolls back the touch.

mod adjust;
mod earn;
mod query;
mod redeem;
mod refund;

use std::sync::Arc;

use shared::models::{DerivedBalance, LoyaltyAccount, TierStatus};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, AppResult};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::{Config, LoyaltyConfig};
use crate::db::DbService;
use crate::db::repository::{self, RepoError, account, ledger};
use crate::services::directory::CustomerDirectory;

/// Attempts at inserting a row under a freshly generated ID
const MAX_ID_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct LoyaltyEngine {
    db: DbService,
    config: LoyaltyConfig,
    directory: Arc<dyn CustomerDirectory>,
}

impl LoyaltyEngine {
    pub fn new(db: DbService, config: LoyaltyConfig, directory: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            db,
            config,
            directory,
        }
    }

    /// Validate configuration, open the database and build the engine
    pub async fn open(config: &Config, directory: Arc<dyn CustomerDirectory>) -> AppResult<Self> {
        config.loyalty.validate()?;
        let db = DbService::new(config).await?;
        Ok(Self::new(db, config.loyalty.clone(), directory))
    }

    pub fn config(&self) -> &LoyaltyConfig {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// Return the customer's account, creating it on first use.
    ///
    /// Fails with `AccountNotFound` when the directory does not know the
    /// customer. Concurrent first uses converge on one account.
    pub async fn resolve_account(&self, customer_id: i64) -> AppResult<LoyaltyAccount> {
        if !self.directory.customer_exists(customer_id).await? {
            tracing::warn!(customer_id, "Unknown customer");
            return Err(AppError::account_not_found(customer_id));
        }

        for attempt in 1..=MAX_ID_ATTEMPTS {
            if let Some(existing) = account::find_by_customer(self.pool(), customer_id).await? {
                return Ok(existing);
            }

            match account::insert_if_absent(self.pool(), snowflake_id(), customer_id, now_millis()).await
            {
                Ok(true) => tracing::info!(customer_id, "Loyalty account created"),
                Ok(false) => {}
                Err(RepoError::Duplicate(_)) => {
                    tracing::warn!(customer_id, attempt, "Account ID collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        account::find_by_customer(self.pool(), customer_id)
            .await?
            .ok_or_else(|| AppError::internal("Failed to create loyalty account"))
    }

    /// Current balance and lifetime earned, read outside any transaction
    pub async fn derive_balance(&self, account_id: i64) -> AppResult<DerivedBalance> {
        Ok(ledger::derive_balance(self.pool(), account_id).await?)
    }

    pub fn classify(&self, lifetime_earned: i64) -> TierStatus {
        self.config.tiers.classify(lifetime_earned)
    }

    /// Open the write transaction for an account. The touch is its first
    /// statement, so the balance read that follows sees every committed
    /// write and no other writer can interleave.
    async fn begin_for(
        &self,
        account: &LoyaltyAccount,
        now: i64,
    ) -> AppResult<Transaction<'static, Sqlite>> {
        let mut tx = repository::begin(self.pool()).await?;
        account::touch(&mut *tx, account.id, now).await?;
        Ok(tx)
    }
}

/// Trimmed text, or `None` when blank
fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trimmed required text
fn require_text(text: &str, field: &str) -> AppResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    Ok(trimmed.to_string())
}
