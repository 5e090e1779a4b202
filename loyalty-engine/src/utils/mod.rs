//! 工具模块
//!
//! - [`logger`] - 日志初始化
//! - [`error`] - 存储错误到 [`shared::AppError`] 的转换

pub mod error;
pub mod logger;

pub use logger::{init_from_config, init_logger, init_logger_with_file};
