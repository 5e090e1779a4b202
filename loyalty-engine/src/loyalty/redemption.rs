//! Redemption rules
//!
//! Pure checks used by the redeem, adjust and bonus operations. Callers run
//! them against a balance derived inside the write transaction.

use rust_decimal::Decimal;
use shared::models::DerivedBalance;
use shared::{AppError, AppResult};

use super::money::{to_decimal, to_f64};

/// Sanity ceiling for the points moved by one adjustment or bonus
pub const MAX_POINTS_PER_OPERATION: i64 = 1_000_000_000;

/// Amount must be positive and a whole number of increments
pub fn validate_amount(points_to_redeem: i64, increment: i64) -> AppResult<()> {
    if points_to_redeem <= 0 {
        return Err(AppError::invalid_redemption_amount(format!(
            "points_to_redeem must be positive, got {points_to_redeem}"
        ))
        .with_detail("increment", increment));
    }
    if increment <= 0 || points_to_redeem % increment != 0 {
        return Err(AppError::invalid_redemption_amount(format!(
            "points_to_redeem must be a multiple of {increment}, got {points_to_redeem}"
        ))
        .with_detail("increment", increment));
    }
    Ok(())
}

pub fn check_balance(balance: i64, points_to_redeem: i64) -> AppResult<()> {
    if points_to_redeem > balance {
        return Err(AppError::insufficient_balance(balance, points_to_redeem));
    }
    Ok(())
}

/// Shape checks for a manual adjustment, independent of the balance
pub fn validate_adjustment(points_delta: i64, reason: &str) -> AppResult<()> {
    if points_delta == 0 {
        return Err(AppError::invalid_input("points_delta must not be zero"));
    }
    if points_delta.unsigned_abs() > MAX_POINTS_PER_OPERATION.unsigned_abs() {
        return Err(AppError::invalid_input(format!(
            "points_delta exceeds maximum allowed magnitude ({MAX_POINTS_PER_OPERATION}), got {points_delta}"
        )));
    }
    if reason.trim().is_empty() {
        return Err(AppError::invalid_input("reason must not be empty").with_detail("field", "reason"));
    }
    Ok(())
}

/// Bonus points must be positive and within the per-operation ceiling
pub fn validate_bonus(points: i64) -> AppResult<()> {
    if points <= 0 {
        return Err(AppError::invalid_input(format!(
            "points must be positive, got {points}"
        )));
    }
    if points > MAX_POINTS_PER_OPERATION {
        return Err(AppError::invalid_input(format!(
            "points exceeds maximum allowed ({MAX_POINTS_PER_OPERATION}), got {points}"
        )));
    }
    Ok(())
}

/// Balance after the adjustment; it must not go below zero
pub fn check_adjustment(balance: i64, points_delta: i64) -> AppResult<i64> {
    match balance.checked_add(points_delta) {
        Some(after) if after >= 0 => Ok(after),
        None if points_delta > 0 => Err(out_of_range(points_delta)),
        _ => Err(AppError::would_overdraw(balance, points_delta)),
    }
}

/// Balance after crediting `points`. Both the balance and lifetime earned
/// must stay representable, otherwise the ledger sums stop deriving.
pub fn check_credit(before: &DerivedBalance, points: i64) -> AppResult<i64> {
    match (
        before.current_balance.checked_add(points),
        before.lifetime_earned.checked_add(points.max(0)),
    ) {
        (Some(balance), Some(_)) => Ok(balance),
        _ => Err(out_of_range(points)),
    }
}

fn out_of_range(points: i64) -> AppError {
    AppError::invalid_input(format!("crediting {points} points exceeds the account's range"))
        .with_detail("points", points)
}

/// Voucher value: `points / increment × increment_value`, 2 decimal places
pub fn voucher_value(points_to_redeem: i64, increment: i64, increment_value: f64) -> f64 {
    if increment <= 0 {
        return 0.0;
    }
    let increments = Decimal::from(points_to_redeem) / Decimal::from(increment);
    to_f64(increments * to_decimal(increment_value))
}
