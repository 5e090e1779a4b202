use std::str::FromStr;

use shared::models::TierDefinition;
use shared::{AppError, AppResult};

use crate::loyalty::tier::TierTable;

/// 引擎配置 - 数据库、日志与积分规则
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LOYALTY_DB_PATH | loyalty.db | SQLite 数据库文件 |
/// | LOYALTY_DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | LOYALTY_DB_BUSY_TIMEOUT_MS | 5000 | 写锁等待时间(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (不设置则输出到 stdout) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// 积分规则见 [`LoyaltyConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 写冲突时的等待时间 (毫秒)
    pub busy_timeout_ms: u64,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 积分规则
    pub loyalty: LoyaltyConfig,
}

impl Config {
    /// 加载 .env 后从环境变量读取配置
    pub fn load() -> AppResult<Self> {
        let _ = dotenv::dotenv();
        Self::from_env()
    }

    /// 从环境变量加载配置
    ///
    /// 无法解析的数值回退到默认值；规则表无法解析或校验失败时返回 ConfigError
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            database_path: std::env::var("LOYALTY_DB_PATH").unwrap_or_else(|_| "loyalty.db".into()),
            max_connections: env_or("LOYALTY_DB_MAX_CONNECTIONS", 5),
            busy_timeout_ms: env_or("LOYALTY_DB_BUSY_TIMEOUT_MS", 5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            loyalty: LoyaltyConfig::from_env()?,
        })
    }

    /// 使用指定数据库路径和默认规则 (测试场景)
    pub fn with_database(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            max_connections: 5,
            busy_timeout_ms: 5000,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            loyalty: LoyaltyConfig::default(),
        }
    }
}

/// Points rules
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | LOYALTY_TIERS | Bronze/Silver/Gold | JSON array of `{name, threshold, multiplier}` |
/// | LOYALTY_POINTS_PER_UNIT | 1.0 | Base points per currency unit of subtotal |
/// | LOYALTY_REDEMPTION_INCREMENT | 100 | Redemptions must be a multiple of this |
/// | LOYALTY_INCREMENT_VALUE | 1.0 | Voucher value of one increment |
/// | LOYALTY_VOUCHER_VALIDITY_DAYS | 90 | Voucher validity window |
/// | LOYALTY_VOUCHER_PREFIX | LOY | Voucher code prefix |
#[derive(Debug, Clone)]
pub struct LoyaltyConfig {
    pub tiers: TierTable,
    pub points_per_currency_unit: f64,
    pub redemption_increment: i64,
    pub increment_value: f64,
    pub voucher_validity_days: i64,
    pub voucher_code_prefix: String,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            points_per_currency_unit: 1.0,
            redemption_increment: 100,
            increment_value: 1.0,
            voucher_validity_days: 90,
            voucher_code_prefix: "LOY".into(),
        }
    }
}

impl LoyaltyConfig {
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let tiers = match std::env::var("LOYALTY_TIERS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let definitions: Vec<TierDefinition> = serde_json::from_str(&raw)
                    .map_err(|e| AppError::config(format!("LOYALTY_TIERS is not valid JSON: {e}")))?;
                TierTable::new(definitions)?
            }
            _ => defaults.tiers,
        };

        let config = Self {
            tiers,
            points_per_currency_unit: env_or(
                "LOYALTY_POINTS_PER_UNIT",
                defaults.points_per_currency_unit,
            ),
            redemption_increment: env_or(
                "LOYALTY_REDEMPTION_INCREMENT",
                defaults.redemption_increment,
            ),
            increment_value: env_or("LOYALTY_INCREMENT_VALUE", defaults.increment_value),
            voucher_validity_days: env_or(
                "LOYALTY_VOUCHER_VALIDITY_DAYS",
                defaults.voucher_validity_days,
            ),
            voucher_code_prefix: std::env::var("LOYALTY_VOUCHER_PREFIX")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.voucher_code_prefix),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.points_per_currency_unit.is_finite() || self.points_per_currency_unit < 0.0 {
            return Err(AppError::config(format!(
                "points_per_currency_unit must be a finite non-negative number, got {}",
                self.points_per_currency_unit
            )));
        }
        if self.redemption_increment <= 0 {
            return Err(AppError::config(format!(
                "redemption_increment must be positive, got {}",
                self.redemption_increment
            )));
        }
        if !self.increment_value.is_finite() || self.increment_value <= 0.0 {
            return Err(AppError::config(format!(
                "increment_value must be a finite positive number, got {}",
                self.increment_value
            )));
        }
        if self.voucher_validity_days <= 0 {
            return Err(AppError::config(format!(
                "voucher_validity_days must be positive, got {}",
                self.voucher_validity_days
            )));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "Unparseable config value, using default");
            default
        }),
        Err(_) => default,
    }
}
