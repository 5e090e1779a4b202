//! Points rules
//!
//! Pure calculators with no storage access:
//! - [`tier`] - tier classifier
//! - [`earning`] - points earned per order
//! - [`redemption`] - redemption and adjustment checks, voucher value
//! - [`money`] - decimal helpers

pub mod earning;
pub mod money;
pub mod redemption;
pub mod tier;

pub use earning::calculate_earned;
pub use tier::TierTable;
