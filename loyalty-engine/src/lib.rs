//! Loyalty Engine - 积分账本与会员等级引擎
//!
//! # 架构概述
//!
//! Points are never stored as a mutable balance. Every earn, redemption,
//! adjustment, bonus and refund appends an immutable entry to the ledger;
//! balance, lifetime earned and tier are derived from it on demand.
//!
//! # 模块结构
//!
//! ```text
//! loyalty-engine/src/
//! ├── core/          # 配置
//! ├── db/            # SQLite 连接池、迁移、仓储
//! ├── loyalty/       # 纯计算: 等级、积分、兑换规则
//! ├── services/      # LoyaltyEngine 与客户目录
//! └── utils/         # 日志、错误转换
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use loyalty_engine::{Config, LoyaltyEngine, OpenDirectory};
//! use shared::models::EarnRequest;
//!
//! # async fn run() -> shared::AppResult<()> {
//! let config = Config::load()?;
//! loyalty_engine::init_from_config(&config);
//! let engine = LoyaltyEngine::open(&config, Arc::new(OpenDirectory)).await?;
//!
//! let result = engine
//!     .earn(EarnRequest {
//!         customer_id: 42,
//!         order_id: "order-1001".into(),
//!         order_subtotal: 100.0,
//!         description: None,
//!     })
//!     .await?;
//! assert_eq!(result.points_earned, 100);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod db;
pub mod loyalty;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, LoyaltyConfig};
pub use db::DbService;
pub use loyalty::TierTable;
pub use services::{CustomerDirectory, LoyaltyEngine, OpenDirectory, StaticDirectory};
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_from_config, init_logger, init_logger_with_file};
