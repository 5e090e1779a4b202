//! Loyalty Account Repository

use super::{RepoError, RepoResult};
use shared::models::LoyaltyAccount;
use sqlx::SqliteExecutor;

const ACCOUNT_COLUMNS: &str = "id, customer_id, created_at, last_activity_at";

pub async fn find_by_customer(
    executor: impl SqliteExecutor<'_>,
    customer_id: i64,
) -> RepoResult<Option<LoyaltyAccount>> {
    let row = sqlx::query_as::<_, LoyaltyAccount>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM loyalty_accounts WHERE customer_id = ?"
    ))
    .bind(customer_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<LoyaltyAccount>> {
    let row = sqlx::query_as::<_, LoyaltyAccount>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM loyalty_accounts WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Insert an account unless the customer already has one.
///
/// Returns whether a row was written. A concurrent creator for the same
/// customer is absorbed by the unique constraint; an ID collision surfaces
/// as [`RepoError::Duplicate`] so the caller can retry with a fresh ID.
pub async fn insert_if_absent(
    executor: impl SqliteExecutor<'_>,
    id: i64,
    customer_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "INSERT INTO loyalty_accounts (id, customer_id, created_at, last_activity_at) VALUES (?1, ?2, ?3, ?3) ON CONFLICT(customer_id) DO NOTHING",
    )
    .bind(id)
    .bind(customer_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Record activity on the account.
///
/// Issued as the first statement of every mutating transaction: the write
/// takes the database write lock before any balance is read.
pub async fn touch(executor: impl SqliteExecutor<'_>, account_id: i64, now: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE loyalty_accounts SET last_activity_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(account_id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Loyalty account {account_id} not found"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = test_pool().await;
        assert!(insert_if_absent(&pool, 11, 42, 1000).await.unwrap());

        let account = find_by_customer(&pool, 42).await.unwrap().unwrap();
        assert_eq!(account.id, 11);
        assert_eq!(account.created_at, 1000);
        assert_eq!(account.last_activity_at, 1000);

        assert_eq!(find_by_id(&pool, 11).await.unwrap(), Some(account));
        assert!(find_by_customer(&pool, 43).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_first_account() {
        let pool = test_pool().await;
        assert!(insert_if_absent(&pool, 11, 42, 1000).await.unwrap());
        assert!(!insert_if_absent(&pool, 12, 42, 2000).await.unwrap());

        let account = find_by_customer(&pool, 42).await.unwrap().unwrap();
        assert_eq!(account.id, 11);
    }

    #[tokio::test]
    async fn test_insert_id_collision_is_duplicate() {
        let pool = test_pool().await;
        insert_if_absent(&pool, 11, 42, 1000).await.unwrap();

        let err = insert_if_absent(&pool, 11, 43, 1000).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_touch() {
        let pool = test_pool().await;
        insert_if_absent(&pool, 11, 42, 1000).await.unwrap();

        touch(&pool, 11, 5000).await.unwrap();
        let account = find_by_id(&pool, 11).await.unwrap().unwrap();
        assert_eq!(account.last_activity_at, 5000);
        assert_eq!(account.created_at, 1000);

        let err = touch(&pool, 99, 5000).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
