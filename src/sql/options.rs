//! Pagination and sort parameters for list queries.

use crate::error::AppError;
use serde::Deserialize;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 1000;

/// `page`, `per_page` and `order_by` as received from the query string.
/// Zero means "use the default"; negative values are rejected by [`QueryOptions::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct QueryOptions {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub order_by: Option<String>,
}

impl QueryOptions {
    pub fn new(page: i64, per_page: i64, order_by: Option<&str>) -> Self {
        QueryOptions {
            page,
            per_page,
            order_by: order_by.map(String::from),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 0 {
            return Err(AppError::Validation("page cannot be less than 0".into()));
        }
        if self.per_page < 0 {
            return Err(AppError::Validation("per_page cannot be less than 0".into()));
        }
        Ok(())
    }

    /// 1-based page; anything below 1 is page 1.
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> i64 {
        if self.per_page < 1 {
            DEFAULT_PER_PAGE
        } else {
            self.per_page.min(MAX_PER_PAGE)
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Requested sort column; an empty `order_by=` counts as absent.
    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
