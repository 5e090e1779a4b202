//! 核心模块 - 引擎配置
//!
//! - [`Config`] - 数据库与日志配置
//! - [`LoyaltyConfig`] - 积分规则 (等级表、积分比例、兑换规则)

pub mod config;

pub use config::{Config, LoyaltyConfig};
