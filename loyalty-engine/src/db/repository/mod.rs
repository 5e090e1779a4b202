//! Repository Module
//!
//! Plain async functions over SQLite. Reads take any executor so they run
//! both on the pool and inside a write transaction.

pub mod account;
pub mod ledger;
pub mod voucher;

use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Busy, locked or unreachable store; retrying may succeed
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Rejected by the store (constraint, trigger, bad statement)
    #[error("Database error: {0}")]
    Database(String),
}

/// SQLite primary result codes that clear up on their own
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_IOERR: i32 = 10;
const SQLITE_CANTOPEN: i32 = 14;

fn is_transient_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| c & 0xff)
        .is_some_and(|c| matches!(c, SQLITE_BUSY | SQLITE_LOCKED | SQLITE_IOERR | SQLITE_CANTOPEN))
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if is_transient_code(db.code().as_deref()) => {
                RepoError::Unavailable(err.to_string())
            }
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => RepoError::Unavailable(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction. Dropping it without [`commit`] rolls back.
pub async fn begin(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin().await?)
}

pub async fn commit(tx: Transaction<'static, Sqlite>) -> RepoResult<()> {
    tx.commit().await?;
    Ok(())
}
