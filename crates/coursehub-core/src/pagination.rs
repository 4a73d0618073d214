//! Page-based pagination for list endpoints.
//!
//! Clients send `page` (1-indexed, default 1) and `limit` (default 20,
//! clamped to [1, 100]). Responses carry a [`PaginationMeta`] next to the
//! page of data:
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": { "total": 45, "limit": 20, "page": 2, "total_pages": 3, "has_more": true }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an `i64` at any limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Query strings like `?page=` arrive as empty strings; treat them as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of matching items
    pub total: i64,
    /// Items per page that was applied
    pub limit: i64,
    /// Current page (1-indexed)
    pub page: i64,
    /// Number of pages at this limit
    pub total_pages: i64,
    /// Whether a later page exists
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let page = params.page();
        let total = total.max(0);
        let total_pages = (total + limit - 1) / limit;

        Self {
            total,
            limit,
            page,
            total_pages,
            has_more: params.offset().saturating_add(limit) < total,
        }
    }
}

#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PaginationParams {
        PaginationParams { page, limit }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(None, Some(0)).limit(), 1);
        assert_eq!(params(None, Some(-4)).limit(), 1);
        assert_eq!(params(None, Some(500)).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_offset_from_page() {
        assert_eq!(params(Some(3), Some(20)).offset(), 40);
        assert_eq!(params(Some(0), Some(10)).offset(), 0);
        assert_eq!(params(Some(-2), Some(10)).page(), 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p: PaginationParams = serde_json::from_value(
            serde_json::json!({"page": "9223372036854775807", "limit": "20"}),
        )
        .unwrap();
        assert_eq!(p.page(), MAX_PAGE);
        assert!(p.offset() > 0);

        let p = params(Some(i64::MAX), Some(MAX_LIMIT));
        assert!(p.offset() > 0);
        let meta = PaginationMeta::new(&p, 45);
        assert!(!meta.has_more);
        assert_eq!(meta.page, MAX_PAGE);
    }

    #[test]
    fn test_meta_total_pages_and_has_more() {
        let meta = PaginationMeta::new(&params(Some(2), Some(20)), 45);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_more);

        let meta = PaginationMeta::new(&params(Some(3), Some(20)), 45);
        assert!(!meta.has_more);

        let meta = PaginationMeta::new(&params(None, None), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_empty_query_values_deserialize_as_none() {
        let p: PaginationParams =
            serde_json::from_value(serde_json::json!({"page": "", "limit": "5"})).unwrap();
        assert_eq!(p.page, None);
        assert_eq!(p.limit, Some(5));
    }
}
