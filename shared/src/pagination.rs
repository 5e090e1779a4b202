//! 分页响应类型

use serde::{Deserialize, Serialize};

/// 分页响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 当前页码 (从 1 开始)
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(limit as u64) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_response() {
        let items = vec!["a", "b", "c"];
        let resp = PaginatedResponse::new(items, 100, 2, 10);

        assert_eq!(resp.total, 100);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 10);
        assert!(resp.has_next());
    }

    #[test]
    fn test_paginated_response_partial_last_page() {
        let resp = PaginatedResponse::new(vec![1], 21, 3, 10);
        assert_eq!(resp.total_pages, 3);
        assert!(!resp.has_next());
    }

    #[test]
    fn test_paginated_response_empty() {
        let resp = PaginatedResponse::<i64>::new(vec![], 0, 1, 20);
        assert_eq!(resp.total_pages, 0);
        assert!(!resp.has_next());
    }
}
