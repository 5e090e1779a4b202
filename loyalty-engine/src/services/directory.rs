//! Customer Directory
//!
//! The engine does not own customer identity. Before an account is resolved
//! the directory confirms the customer exists.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use shared::AppResult;

/// Source of truth for customer identity
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Whether the customer is known. Lookup failures surface as errors,
    /// not as an unknown customer.
    async fn customer_exists(&self, customer_id: i64) -> AppResult<bool>;
}

/// Accepts every positive customer ID
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenDirectory;

#[async_trait]
impl CustomerDirectory for OpenDirectory {
    async fn customer_exists(&self, customer_id: i64) -> AppResult<bool> {
        Ok(customer_id > 0)
    }
}

/// In-memory set of known customers
#[derive(Debug, Default)]
pub struct StaticDirectory {
    customers: RwLock<HashSet<i64>>,
}

impl StaticDirectory {
    pub fn new(customers: impl IntoIterator<Item = i64>) -> Self {
        Self {
            customers: RwLock::new(customers.into_iter().collect()),
        }
    }

    pub fn register(&self, customer_id: i64) {
        self.customers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(customer_id);
    }
}

#[async_trait]
impl CustomerDirectory for StaticDirectory {
    async fn customer_exists(&self, customer_id: i64) -> AppResult<bool> {
        Ok(self
            .customers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&customer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_directory() {
        assert!(OpenDirectory.customer_exists(1).await.unwrap());
        assert!(!OpenDirectory.customer_exists(0).await.unwrap());
        assert!(!OpenDirectory.customer_exists(-5).await.unwrap());
    }

    #[tokio::test]
    async fn test_static_directory_register() {
        let directory = StaticDirectory::new([1, 2]);
        assert!(directory.customer_exists(2).await.unwrap());
        assert!(!directory.customer_exists(3).await.unwrap());

        directory.register(3);
        assert!(directory.customer_exists(3).await.unwrap());
    }
}
