//! Unified error codes for the loyalty ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Account errors
//! - 5xxx: Points errors (earning, redemption, adjustment)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so callers in any language
/// can match on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Malformed or out-of-range request data
    InvalidInput = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 4xxx: Account ====================
    /// Customer is unknown to the customer directory
    AccountNotFound = 4001,

    // ==================== 5xxx: Points ====================
    /// Redemption exceeds the current balance
    InsufficientBalance = 5001,
    /// Redemption amount is not a positive multiple of the increment
    InvalidRedemptionAmount = 5002,
    /// Adjustment would drive the balance negative
    WouldOverdraw = 5101,
    /// Refund requested for an order that never earned points
    OrderNotEarned = 5201,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Underlying store unavailable or timed out
    TransientStoreError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Business-rule rejections are detected before any write and must not
    /// be retried.
    pub const fn is_declined(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidInput
                | ErrorCode::InsufficientBalance
                | ErrorCode::InvalidRedemptionAmount
                | ErrorCode::WouldOverdraw
                | ErrorCode::OrderNotEarned
        )
    }

    /// The caller may retry at its own discretion.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::TransientStoreError)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::InvalidInput => "Invalid input",
            ErrorCode::NotFound => "Resource not found",

            // Account
            ErrorCode::AccountNotFound => "Loyalty account not found",

            // Points
            ErrorCode::InsufficientBalance => "Insufficient points balance",
            ErrorCode::InvalidRedemptionAmount => "Invalid redemption amount",
            ErrorCode::WouldOverdraw => "Adjustment would overdraw the points balance",
            ErrorCode::OrderNotEarned => "Order has no earned points to refund",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TransientStoreError => "Storage temporarily unavailable, please retry",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::InvalidInput),
            3 => Ok(ErrorCode::NotFound),

            // Account
            4001 => Ok(ErrorCode::AccountNotFound),

            // Points
            5001 => Ok(ErrorCode::InsufficientBalance),
            5002 => Ok(ErrorCode::InvalidRedemptionAmount),
            5101 => Ok(ErrorCode::WouldOverdraw),
            5201 => Ok(ErrorCode::OrderNotEarned),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::TransientStoreError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
