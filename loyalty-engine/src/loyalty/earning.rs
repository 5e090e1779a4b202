//! Earning Calculator
//!
//! `points = round_half_up(subtotal × points_per_unit × tier_multiplier)`

use rust_decimal::Decimal;
use shared::{AppError, AppResult};

use super::money::{require_finite, to_decimal, to_points};

/// Sanity ceiling for a single order subtotal
pub const MAX_ORDER_SUBTOTAL: f64 = 10_000_000.0;

/// Validate an order subtotal at the boundary
pub fn validate_subtotal(order_subtotal: f64) -> AppResult<()> {
    require_finite(order_subtotal, "order_subtotal")?;
    if order_subtotal < 0.0 {
        return Err(AppError::invalid_input(format!(
            "order_subtotal must be non-negative, got {order_subtotal}"
        )));
    }
    if order_subtotal > MAX_ORDER_SUBTOTAL {
        return Err(AppError::invalid_input(format!(
            "order_subtotal exceeds maximum allowed ({MAX_ORDER_SUBTOTAL}), got {order_subtotal}"
        )));
    }
    Ok(())
}

/// Points earned for an order subtotal at the given tier multiplier
pub fn calculate_earned(
    order_subtotal: f64,
    points_per_currency_unit: f64,
    tier_multiplier: f64,
) -> AppResult<i64> {
    validate_subtotal(order_subtotal)?;
    require_finite(points_per_currency_unit, "points_per_currency_unit")?;
    require_finite(tier_multiplier, "tier_multiplier")?;

    let raw = to_decimal(order_subtotal)
        * to_decimal(points_per_currency_unit)
        * to_decimal(tier_multiplier);
    let points = to_points(raw.max(Decimal::ZERO))?;
    Ok(points)
}
