// Page/limit handling shared by every listing endpoint.
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MIN_PAGE: i64 = 1;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// Raw `page`/`limit` query pair. Handlers extract it next to their own query
/// type so every listing shares the same parsing.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (starts from 1)
    pub page: Option<i64>,
    /// Number of items per page (1..=100)
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    pub fn normalized(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(MIN_PAGE),
            limit: limit.unwrap_or(default_limit),
        }
    }

    /// Saturates for absurdly large pages; the row skip is then past any table.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }

    /// Returns every range violation, in page-then-limit order.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.page < MIN_PAGE {
            errors.push(format!("Page must be at least {MIN_PAGE}"));
        }
        if self.limit < MIN_LIMIT {
            errors.push(format!("Limit must be at least {MIN_LIMIT}"));
        }
        if self.limit > MAX_LIMIT {
            errors.push(format!("Limit cannot be more than {MAX_LIMIT}"));
        }
        errors
    }
}

impl PageQuery {
    pub fn resolve(self, default_limit: i64) -> PageRequest {
        PageRequest::normalized(self.page, self.limit, default_limit)
    }
}

/// One page of repository results plus the unpaged total.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    /// `page` is not clamped: a page past the end reports `has_next_page = false`
    /// and the caller returns an empty item list.
    pub fn calculate(req: PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + req.limit - 1) / req.limit
        };
        Self {
            current_page: req.page,
            total_pages,
            total_items,
            items_per_page: req.limit,
            has_next_page: req.page < total_pages,
            has_previous_page: req.page > 1,
        }
    }
}
