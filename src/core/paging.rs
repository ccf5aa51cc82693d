//! Paging parameters and paged results
//!
//! [`ResourceParameters`] is extracted from the collection query string. Its
//! page size is clamped to [`MAX_PAGE_SIZE`] when it is built: larger values are
//! silently reduced and smaller values are kept as they are. The clamp never
//! produces an error.
//!
//! [`PagedResult`] wraps one materialized page with its count and page
//! metadata. `has_previous` and `has_next` are derived from the current page
//! and the page total, never stored.
//!
//! # Example
//! ```rust,ignore
//! // In handler:
//! pub async fn list_authors(
//!     Query(params): Query<ResourceParameters>,
//! ) -> Result<Response, ShaperError> {
//!     // params.page_number defaults to 1
//!     // params.page_size() defaults to 10 and never exceeds 20
//! }
//!
//! // Usage:
//! GET /api/authors?pageNumber=2&pageSize=5
//! GET /api/authors?orderBy=Name desc&fields=id,name
//! GET /api/authors?mainCategory=Rum&searchQuery=Kev
//! ```

use axum::http::HeaderValue;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::store::StorePage;

/// Page returned when the client does not ask for one
pub const DEFAULT_PAGE_NUMBER: usize = 1;

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a client can obtain
pub const MAX_PAGE_SIZE: usize = 20;

/// Sort applied to collections when `orderBy` is absent
pub const DEFAULT_ORDER_BY: &str = "Name";

/// Parameters that drive a page-producing collection read
///
/// The link builder uses this to rebuild the current request with only the
/// page number changed.
pub trait PageParameters: Serialize + Clone {
    fn page_number(&self) -> usize;

    fn page_size(&self) -> usize;

    /// A copy of these parameters pointing at another page
    fn for_page(&self, page_number: usize) -> Self;
}

/// Query parameters for a paged, sorted, filtered, shaped collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceParameters {
    /// Exact match on the main category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_category: Option<String>,

    /// Substring search across category and names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Page number (starts at 1)
    #[serde(deserialize_with = "at_least_one")]
    pub page_number: usize,

    #[serde(deserialize_with = "clamped_page_size")]
    page_size: usize,

    /// Comma-separated external sort fields
    pub order_by: String,

    /// Comma-separated external fields to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl Default for ResourceParameters {
    fn default() -> Self {
        Self {
            main_category: None,
            search_query: None,
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: DEFAULT_ORDER_BY.to_string(),
            fields: None,
        }
    }
}

fn clamp_page_size(requested: usize) -> usize {
    if requested > MAX_PAGE_SIZE {
        tracing::debug!(requested, max = MAX_PAGE_SIZE, "page size clamped");
    }
    requested.min(MAX_PAGE_SIZE)
}

/// Negative sizes become 0, oversized ones [`MAX_PAGE_SIZE`]
fn clamped_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    i64::deserialize(deserializer).map(|n| clamp_page_size(usize::try_from(n).unwrap_or(0)))
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    i64::deserialize(deserializer).map(|n| usize::try_from(n).unwrap_or(0).max(1))
}

impl ResourceParameters {
    /// Effective page size, never above [`MAX_PAGE_SIZE`]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set the page size, clamping it to [`MAX_PAGE_SIZE`]
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = clamp_page_size(page_size);
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_page_number(mut self, page_number: usize) -> Self {
        self.page_number = page_number.max(1);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Requested fields, or `None` when absent or blank
    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref().filter(|f| !f.trim().is_empty())
    }

    /// Trimmed main category filter, `None` when blank
    pub fn main_category(&self) -> Option<&str> {
        non_blank(self.main_category.as_deref())
    }

    /// Trimmed search query, `None` when blank
    pub fn search_query(&self) -> Option<&str> {
        non_blank(self.search_query.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl PageParameters for ResourceParameters {
    fn page_number(&self) -> usize {
        self.page_number
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn for_page(&self, page_number: usize) -> Self {
        self.clone().with_page_number(page_number)
    }
}

/// One page of a collection plus its paging metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_count: usize,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl<T> PagedResult<T> {
    /// Wrap an already-sliced page
    pub fn new(items: Vec<T>, total_count: usize, page_number: usize, page_size: usize) -> Self {
        let total_pages = if total_count == 0 || page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };

        Self {
            items,
            total_count,
            page_size,
            current_page: page_number,
            total_pages,
        }
    }

    /// Count the whole source, then take the requested page from it
    pub fn create(source: Vec<T>, page_number: usize, page_size: usize) -> Self {
        let total_count = source.len();
        let skip = page_number.saturating_sub(1).saturating_mul(page_size);
        let items = source.into_iter().skip(skip).take(page_size).collect();
        Self::new(items, total_count, page_number, page_size)
    }

    /// Wrap a page returned by the storage collaborator
    pub fn from_store_page(page: StorePage<T>, page_number: usize, page_size: usize) -> Self {
        Self::new(page.items, page.total_count, page_number, page_size)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Transform the items, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }

    /// Metadata for the pagination side-channel
    pub fn metadata(
        &self,
        previous_page_link: Option<String>,
        next_page_link: Option<String>,
    ) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            previous_page_link,
            next_page_link,
        }
    }
}

/// Contents of the `X-Pagination` response header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    /// Header name the metadata travels under
    pub const HEADER: &'static str = "x-pagination";

    /// Render as a JSON header value
    pub fn header_value(&self) -> Option<HeaderValue> {
        let json = serde_json::to_string(self).ok()?;
        match HeaderValue::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "pagination metadata is not a valid header value");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_defaults() {
        let params = ResourceParameters::default();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.order_by, "Name");
        assert_eq!(params.fields(), None);
    }

    #[test]
    fn test_page_size_clamped_never_raised() {
        assert_eq!(ResourceParameters::default().with_page_size(500).page_size(), 20);
        assert_eq!(ResourceParameters::default().with_page_size(5).page_size(), 5);
        assert_eq!(ResourceParameters::default().with_page_size(20).page_size(), 20);
    }

    #[test]
    fn test_deserialize_from_query_string() {
        let params: ResourceParameters = serde_urlencoded::from_str(
            "pageNumber=2&pageSize=500&orderBy=Name%20desc&fields=id,name&mainCategory=Rum",
        )
        .unwrap();
        assert_eq!(params.page_number, 2);
        assert_eq!(params.page_size(), 20);
        assert_eq!(params.order_by, "Name desc");
        assert_eq!(params.fields(), Some("id,name"));
        assert_eq!(params.main_category(), Some("Rum"));
        assert_eq!(params.search_query(), None);
    }

    #[test]
    fn test_deserialize_defaults_missing_values() {
        let params: ResourceParameters = serde_urlencoded::from_str("pageNumber=0").unwrap();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.order_by, DEFAULT_ORDER_BY);
    }

    #[test]
    fn test_negative_values_are_lenient() {
        let params: ResourceParameters =
            serde_urlencoded::from_str("pageNumber=-3&pageSize=-5").unwrap();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size(), 0);
    }

    #[test]
    fn test_blank_filters_are_absent() {
        let params: ResourceParameters =
            serde_urlencoded::from_str("mainCategory=%20%20&searchQuery=%20Kev%20").unwrap();
        assert_eq!(params.main_category(), None);
        assert_eq!(params.search_query(), Some("Kev"));
    }

    #[test]
    fn test_for_page_keeps_everything_else() {
        let params = ResourceParameters::default()
            .with_page_size(3)
            .with_order_by("Name desc")
            .with_fields("id");
        let next = params.for_page(2);
        assert_eq!(next.page_number, 2);
        assert_eq!(next.page_size(), 3);
        assert_eq!(next.order_by, "Name desc");
        assert_eq!(next.fields(), Some("id"));
    }

    #[test]
    fn test_serializes_as_query() {
        let params = ResourceParameters::default().with_page_size(3);
        let query = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(query, "pageNumber=1&pageSize=3&orderBy=Name");
    }

    #[test]
    fn test_paged_result_last_page() {
        let result = PagedResult::new(vec![0; 5], 25, 3, 10);
        assert_eq!(result.total_pages(), 3);
        assert!(!result.has_next());
        assert!(result.has_previous());
    }

    #[test]
    fn test_paged_result_first_page() {
        let result = PagedResult::new(vec![0; 10], 25, 1, 10);
        assert!(!result.has_previous());
        assert!(result.has_next());
    }

    #[test]
    fn test_paged_result_empty() {
        let result = PagedResult::<u8>::create(vec![], 1, 10);
        assert_eq!(result.total_count(), 0);
        assert_eq!(result.total_pages(), 0);
        assert!(!result.has_next());
        assert!(!result.has_previous());
    }

    #[test]
    fn test_create_counts_then_slices() {
        let result = PagedResult::create((1..=7).collect(), 3, 3);
        assert_eq!(result.items(), &[7]);
        assert_eq!(result.total_count(), 7);
        assert_eq!(result.total_pages(), 3);

        let beyond = PagedResult::create((1..=7).collect::<Vec<_>>(), 9, 3);
        assert!(beyond.items().is_empty());
        assert!(beyond.has_previous());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let result = PagedResult::create(vec![1, 2, 3], 1, 2).map(|n| n * 10);
        assert_eq!(result.items(), &[10, 20]);
        assert_eq!(result.total_pages(), 2);
    }

    #[test]
    fn test_metadata_header() {
        let result = PagedResult::new(vec![1], 7, 1, 3);
        let metadata = result.metadata(None, Some("http://localhost/next".into()));
        let value = metadata.header_value().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(value.to_str().unwrap()).unwrap();
        assert_eq!(parsed["totalCount"], 7);
        assert_eq!(parsed["totalPages"], 3);
        assert_eq!(parsed["previousPageLink"], serde_json::Value::Null);
        assert_eq!(parsed["nextPageLink"], "http://localhost/next");
    }
}
