//! Decimal arithmetic for points and voucher values
//!
//! Inputs arrive as `f64`; every multiplication happens on `Decimal` and is
//! rounded once at the end, so 19.99 × 1.25 never drifts.

use rust_decimal::prelude::*;
use shared::{AppError, AppResult};

/// Voucher values carry two decimal places
const MONEY_DECIMAL_PLACES: u32 = 2;

/// Reject NaN and ±Infinity before they reach the arithmetic
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::invalid_input(format!(
            "{field_name} must be a finite number, got {value}"
        ))
        .with_detail("field", field_name));
    }
    Ok(())
}

/// Convert f64 to Decimal; callers validate finiteness first
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in points calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places (half away from zero)
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    let rounded =
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_f64().unwrap_or_else(|| {
        tracing::error!(value = %rounded, "Decimal out of f64 range, defaulting to zero");
        0.0
    })
}

/// Round to whole points, half away from zero
pub fn to_points(value: Decimal) -> AppResult<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::internal(format!("points value {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_finite() {
        assert!(require_finite(12.5, "order_subtotal").is_ok());
        assert!(require_finite(f64::NAN, "order_subtotal").is_err());
        assert!(require_finite(f64::NEG_INFINITY, "order_subtotal").is_err());
    }

    #[test]
    fn test_to_f64_rounds_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(1004, 3)), 1.0);
        assert_eq!(to_f64(Decimal::new(300, 2)), 3.0);
    }

    #[test]
    fn test_to_points_rounds_half_up() {
        assert_eq!(to_points(Decimal::new(25, 1)).unwrap(), 3);
        assert_eq!(to_points(Decimal::new(24, 1)).unwrap(), 2);
        assert_eq!(to_points(Decimal::new(249875, 4)).unwrap(), 25);
        assert_eq!(to_points(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_decimal_avoids_float_drift() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }
}
