//! List query parameters and page windows

use crate::core::criteria::{Criteria, SortSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List parameters as they arrive from a URL or a saved view
///
/// All parameters have sensible defaults.
///
/// # Example
/// ```text
/// ?page=2&limit=10
/// ?search=acme&filter={"status": "active"}
/// ?page=1&limit=20&filter={"amount>": 100}&sort=due_date:desc
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Free-text search
    pub search: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    pub filter: Option<String>,

    /// Sort field and direction (`field`, `field:asc`, `field:desc`)
    pub sort: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    /// Requested page, never below 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Rows per page, between 1 and 100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Parse filter JSON string into Value; malformed JSON yields `None`
    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().and_then(SortSpec::parse)
    }

    /// Criteria equivalent to these parameters
    pub fn to_criteria(&self) -> Criteria {
        let mut criteria = Criteria::new();
        if let Some(search) = &self.search {
            criteria.search = search.clone();
        }
        if let Some(filter) = self.filter_value() {
            criteria = criteria.with_filter_json(&filter);
        }
        criteria.sort = self.sort_spec();
        criteria
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page(), self.limit())
    }
}

/// One page window over the visible rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Page is at least 1, limit at least 1
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Index of the first row on this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(default_page(), default_limit())
    }
}

/// Paginated rows
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub data: Vec<T>,

    pub pagination: PaginationMeta,
}

/// Position of a page within the visible rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Visible rows across all pages
    pub total: usize,

    /// Zero when there are no rows
    pub total_pages: usize,

    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Page and limit are clamped to at least 1
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// Slice one page out of `items`; pages past the end are empty
pub fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> Page<T> {
    let data = items
        .iter()
        .skip(request.offset())
        .take(request.limit)
        .cloned()
        .collect();

    Page {
        data,
        pagination: PaginationMeta::new(request.page, request.limit, items.len()),
    }
}
