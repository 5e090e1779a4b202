//! Error types

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error every engine operation returns:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages (never storage internals)
/// - Optional structured details (balance, requested amount, ...)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidInput, msg)
    }

    /// Create an account not found error
    pub fn account_not_found(customer_id: i64) -> Self {
        Self::with_message(
            ErrorCode::AccountNotFound,
            format!("Customer {customer_id} not found"),
        )
        .with_detail("customer_id", customer_id)
    }

    /// Create an insufficient balance error
    pub fn insufficient_balance(balance: i64, requested: i64) -> Self {
        Self::with_message(
            ErrorCode::InsufficientBalance,
            format!("Insufficient points: have {balance}, need {requested}"),
        )
        .with_detail("balance", balance)
        .with_detail("requested", requested)
    }

    /// Create an invalid redemption amount error
    pub fn invalid_redemption_amount(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRedemptionAmount, msg)
    }

    /// Create a would-overdraw error
    pub fn would_overdraw(balance: i64, delta: i64) -> Self {
        Self::with_message(
            ErrorCode::WouldOverdraw,
            format!("Adjustment of {delta} would overdraw balance {balance}"),
        )
        .with_detail("balance", balance)
        .with_detail("points_delta", delta)
    }

    /// Create an order-not-earned error
    pub fn order_not_earned(order_id: &str) -> Self {
        Self::with_message(
            ErrorCode::OrderNotEarned,
            format!("Order {order_id} has no earned points"),
        )
        .with_detail("order_id", order_id)
    }

    /// Create a transient store error (message is always the generic one)
    pub fn transient_store() -> Self {
        Self::new(ErrorCode::TransientStoreError)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }
}

/// Result type for engine operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::invalid_input("reason must not be empty")
            .with_detail("field", "reason");

        assert_eq!(err.code, ErrorCode::InvalidInput);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "reason");
    }

    #[test]
    fn test_insufficient_balance_details() {
        let err = AppError::insufficient_balance(250, 300);
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        assert_eq!(err.message, "Insufficient points: have 250, need 300");
        let details = err.details.unwrap();
        assert_eq!(details.get("balance").unwrap(), 250);
        assert_eq!(details.get("requested").unwrap(), 300);
    }

    #[test]
    fn test_transient_store_hides_detail() {
        let err = AppError::transient_store();
        assert_eq!(err.code, ErrorCode::TransientStoreError);
        assert_eq!(err.message, ErrorCode::TransientStoreError.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::would_overdraw(50, -100);
        assert_eq!(
            format!("{}", err),
            "Adjustment of -100 would overdraw balance 50"
        );
    }

    #[test]
    fn test_app_error_serialize() {
        let err = AppError::account_not_found(42);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":4001"));
        assert!(json.contains("\"customer_id\":42"));
    }
}
