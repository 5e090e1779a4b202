//! Ledger Repository
//!
//! Append-only: the schema rejects UPDATE and DELETE on `loyalty_ledger`.

use super::RepoResult;
use shared::models::{DerivedBalance, LedgerEntry, LedgerEntryCreate, ReferenceType, TransactionRecord};
use sqlx::SqliteExecutor;

const LEDGER_COLUMNS: &str =
    "id, account_id, points_delta, reference_type, reference_id, reason, created_at";

/// Append one entry and return it with its store-assigned ID
pub async fn append(
    executor: impl SqliteExecutor<'_>,
    entry: &LedgerEntryCreate,
    now: i64,
) -> RepoResult<LedgerEntry> {
    let row = sqlx::query_as::<_, LedgerEntry>(&format!(
        "INSERT INTO loyalty_ledger (account_id, points_delta, reference_type, reference_id, reason, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {LEDGER_COLUMNS}"
    ))
    .bind(entry.account_id)
    .bind(entry.points_delta)
    .bind(entry.reference_type)
    .bind(&entry.reference_id)
    .bind(&entry.reason)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

/// Fold the account's entries into balance and lifetime earned
pub async fn derive_balance(
    executor: impl SqliteExecutor<'_>,
    account_id: i64,
) -> RepoResult<DerivedBalance> {
    let balance = sqlx::query_as::<_, DerivedBalance>(
        "SELECT COALESCE(SUM(points_delta), 0) AS current_balance, COALESCE(SUM(MAX(points_delta, 0)), 0) AS lifetime_earned FROM loyalty_ledger WHERE account_id = ?",
    )
    .bind(account_id)
    .fetch_one(executor)
    .await?;
    Ok(balance)
}

pub async fn find_by_reference(
    executor: impl SqliteExecutor<'_>,
    account_id: i64,
    reference_type: ReferenceType,
    reference_id: &str,
) -> RepoResult<Option<LedgerEntry>> {
    let row = sqlx::query_as::<_, LedgerEntry>(&format!(
        "SELECT {LEDGER_COLUMNS} FROM loyalty_ledger WHERE account_id = ?1 AND reference_type = ?2 AND reference_id = ?3 ORDER BY id LIMIT 1"
    ))
    .bind(account_id)
    .bind(reference_type)
    .bind(reference_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// All entries of an account in chronological order
pub async fn list_for_account(
    executor: impl SqliteExecutor<'_>,
    account_id: i64,
) -> RepoResult<Vec<LedgerEntry>> {
    let rows = sqlx::query_as::<_, LedgerEntry>(&format!(
        "SELECT {LEDGER_COLUMNS} FROM loyalty_ledger WHERE account_id = ? ORDER BY id"
    ))
    .bind(account_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// History query parameters, already resolved to storage terms
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub customer_id: Option<i64>,
    pub reference_type: Option<ReferenceType>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of history, newest first, with the total match count.
///
/// The running balance is computed over each account's full ledger before
/// the category and time filters apply, so hidden entries still count.
pub async fn list_history(
    executor: impl SqliteExecutor<'_> + Copy,
    query: &HistoryQuery,
) -> RepoResult<(Vec<TransactionRecord>, u64)> {
    let rows = sqlx::query_as::<_, TransactionRecord>(
        "SELECT id, account_id, points_delta, reference_type, reference_id, reason, created_at, customer_id, running_balance_after_entry FROM (\
            SELECT l.id, l.account_id, l.points_delta, l.reference_type, l.reference_id, l.reason, l.created_at, a.customer_id, \
            SUM(l.points_delta) OVER (PARTITION BY l.account_id ORDER BY l.id ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) AS running_balance_after_entry \
            FROM loyalty_ledger l JOIN loyalty_accounts a ON a.id = l.account_id \
            WHERE (?1 IS NULL OR a.customer_id = ?1)\
        ) AS h \
        WHERE (?2 IS NULL OR h.reference_type = ?2) AND (?3 IS NULL OR h.created_at >= ?3) AND (?4 IS NULL OR h.created_at < ?4) \
        ORDER BY h.id DESC LIMIT ?5 OFFSET ?6",
    )
    .bind(query.customer_id)
    .bind(query.reference_type)
    .bind(query.from)
    .bind(query.to)
    .bind(query.limit)
    .bind(query.offset)
    .fetch_all(executor)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM loyalty_ledger l JOIN loyalty_accounts a ON a.id = l.account_id \
        WHERE (?1 IS NULL OR a.customer_id = ?1) AND (?2 IS NULL OR l.reference_type = ?2) \
        AND (?3 IS NULL OR l.created_at >= ?3) AND (?4 IS NULL OR l.created_at < ?4)",
    )
    .bind(query.customer_id)
    .bind(query.reference_type)
    .bind(query.from)
    .bind(query.to)
    .fetch_one(executor)
    .await?;

    Ok((rows, total.max(0) as u64))
}
