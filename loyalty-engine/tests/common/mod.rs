#![allow(dead_code)]

use std::ops::Deref;
use std::sync::Arc;

use loyalty_engine::{DbService, LoyaltyConfig, LoyaltyEngine, OpenDirectory};
use shared::models::{AdjustRequest, EarnRequest, RedeemRequest};
use tempfile::TempDir;

/// Engine over a temporary database file; the file lives as long as this value
pub struct TestEngine {
    engine: LoyaltyEngine,
    _dir: TempDir,
}

impl Deref for TestEngine {
    type Target = LoyaltyEngine;

    fn deref(&self) -> &LoyaltyEngine {
        &self.engine
    }
}

impl TestEngine {
    pub fn handle(&self) -> LoyaltyEngine {
        self.engine.clone()
    }
}

pub async fn test_engine() -> TestEngine {
    test_engine_with(LoyaltyConfig::default()).await
}

pub async fn test_engine_with(config: LoyaltyConfig) -> TestEngine {
    loyalty_engine::init_logger_with_file(Some("warn"), false, None);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loyalty.db");
    let db = DbService::open(path.to_str().unwrap(), 5, 5_000).await.unwrap();
    TestEngine {
        engine: LoyaltyEngine::new(db, config, Arc::new(OpenDirectory)),
        _dir: dir,
    }
}

pub fn earn(customer_id: i64, order_id: &str, subtotal: f64) -> EarnRequest {
    EarnRequest {
        customer_id,
        order_id: order_id.to_string(),
        order_subtotal: subtotal,
        description: None,
    }
}

pub fn redeem(customer_id: i64, points: i64) -> RedeemRequest {
    RedeemRequest {
        customer_id,
        points_to_redeem: points,
        notes: None,
    }
}

pub fn adjust(customer_id: i64, points_delta: i64, reason: &str) -> AdjustRequest {
    AdjustRequest {
        customer_id,
        points_delta,
        reason: reason.to_string(),
    }
}
