//! Voucher Repository

use super::RepoResult;
use shared::models::Voucher;
use sqlx::SqliteExecutor;

const VOUCHER_COLUMNS: &str = "id, code, account_id, customer_id, value, points_redeemed, valid_from, valid_until, usage_limit, usage_per_customer, notes, created_at";

/// Insert a minted voucher. A code or ID collision is a `Duplicate`.
pub async fn insert(executor: impl SqliteExecutor<'_>, voucher: &Voucher) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO loyalty_vouchers (id, code, account_id, customer_id, value, points_redeemed, valid_from, valid_until, usage_limit, usage_per_customer, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(voucher.id)
    .bind(&voucher.code)
    .bind(voucher.account_id)
    .bind(voucher.customer_id)
    .bind(voucher.value)
    .bind(voucher.points_redeemed)
    .bind(voucher.valid_from)
    .bind(voucher.valid_until)
    .bind(voucher.usage_limit)
    .bind(voucher.usage_per_customer)
    .bind(&voucher.notes)
    .bind(voucher.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id(executor: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Voucher>> {
    let row = sqlx::query_as::<_, Voucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM loyalty_vouchers WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn find_by_code(
    executor: impl SqliteExecutor<'_>,
    code: &str,
) -> RepoResult<Option<Voucher>> {
    let row = sqlx::query_as::<_, Voucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM loyalty_vouchers WHERE code = ?"
    ))
    .bind(code)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Vouchers of an account, newest first
pub async fn list_for_account(
    executor: impl SqliteExecutor<'_>,
    account_id: i64,
) -> RepoResult<Vec<Voucher>> {
    let rows = sqlx::query_as::<_, Voucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM loyalty_vouchers WHERE account_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(account_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{RepoError, account, test_support::test_pool};

    fn voucher(id: i64, code: &str) -> Voucher {
        Voucher {
            id,
            code: code.to_string(),
            account_id: 11,
            customer_id: 42,
            value: 2.0,
            points_redeemed: 200,
            valid_from: 1000,
            valid_until: 1000 + 90 * shared::util::MILLIS_PER_DAY,
            usage_limit: 1,
            usage_per_customer: 1,
            notes: Some("birthday dinner".into()),
            created_at: 1000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = test_pool().await;
        account::insert_if_absent(&pool, 11, 42, 1000).await.unwrap();

        let v = voucher(7, "LOY-AAAAAAAAAA");
        insert(&pool, &v).await.unwrap();

        assert_eq!(find_by_id(&pool, 7).await.unwrap(), Some(v.clone()));
        assert_eq!(find_by_code(&pool, "LOY-AAAAAAAAAA").await.unwrap(), Some(v));
        assert!(find_by_code(&pool, "LOY-BBBBBBBBBB").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_code_collision_is_duplicate() {
        let pool = test_pool().await;
        account::insert_if_absent(&pool, 11, 42, 1000).await.unwrap();
        insert(&pool, &voucher(7, "LOY-AAAAAAAAAA")).await.unwrap();

        let err = insert(&pool, &voucher(8, "LOY-AAAAAAAAAA")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_requires_existing_account() {
        let pool = test_pool().await;
        let err = insert(&pool, &voucher(7, "LOY-AAAAAAAAAA")).await.unwrap_err();
        assert!(matches!(err, RepoError::Database(_)));
    }

    #[tokio::test]
    async fn test_list_for_account() {
        let pool = test_pool().await;
        account::insert_if_absent(&pool, 11, 42, 1000).await.unwrap();
        insert(&pool, &voucher(7, "LOY-AAAAAAAAAA")).await.unwrap();
        let mut later = voucher(8, "LOY-BBBBBBBBBB");
        later.created_at = 2000;
        insert(&pool, &later).await.unwrap();

        let ids: Vec<_> = list_for_account(&pool, 11)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, [8, 7]);
    }
}
