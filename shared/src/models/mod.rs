//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`; all timestamps are UTC epoch milliseconds.

pub mod account;
pub mod ledger;
pub mod operation;
pub mod tier;
pub mod voucher;

// Re-exports
pub use account::*;
pub use ledger::*;
pub use operation::*;
pub use tier::*;
pub use voucher::*;
