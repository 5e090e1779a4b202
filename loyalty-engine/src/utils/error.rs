//! Storage error bridge
//!
//! Repository failures become [`AppError`]s here. Storage details are logged
//! and never leave the engine: callers see `TransientStoreError` for a busy,
//! locked or unreachable store and `InternalError` for anything else.

use shared::{AppError, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => {
                tracing::error!(error = %msg, "Unexpected duplicate in store");
                AppError::internal("Conflicting record in store")
            }
            RepoError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Store unavailable");
                AppError::transient_store()
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Store error");
                AppError::internal("Store rejected the operation")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_retryable_and_hides_details() {
        let err: AppError = RepoError::Unavailable("database is locked".into()).into();
        assert_eq!(err.code, ErrorCode::TransientStoreError);
        assert!(!err.message.contains("locked"));
        assert!(err.code.is_retryable());
    }

    #[test]
    fn test_rejected_statement_is_internal() {
        let err: AppError =
            RepoError::Database("FOREIGN KEY constraint failed".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("FOREIGN"));
        assert!(!err.code.is_retryable());
    }

    #[test]
    fn test_duplicate_is_internal() {
        let err: AppError = RepoError::Duplicate("UNIQUE constraint failed".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("UNIQUE"));
    }

    #[test]
    fn test_not_found_passes_message() {
        let err: AppError = RepoError::NotFound("Loyalty account 7 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Loyalty account 7 not found");
    }
}
