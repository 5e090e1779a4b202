//! Shared types for the loyalty ledger
//!
//! Domain models, the unified error system, pagination and ID/time
//! utilities used by the engine and by any host that embeds it.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use pagination::PaginatedResponse;
pub use serde::{Deserialize, Serialize};
