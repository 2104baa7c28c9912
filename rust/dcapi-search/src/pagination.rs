use crate::SearchContext;
use dcapi_common::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a page of search results sits in the whole result set.
///
/// Derived from the same `size` and `from` the search was sent with, so
/// `page` numbers here round-trip through [`SearchContext::from_parameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based number of this page.
    pub current_page: u64,
    /// Hits per page.
    pub limit: u64,
    /// Offset of the first hit on this page.
    pub offset: u64,
    /// Hits across all pages.
    pub total_hits: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Previous page, unless this is the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
    /// Next page, unless this is the last one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

impl PageInfo {
    /// Page position for `context` given the hit count reported by the index.
    ///
    /// A missing or zero `size` counts as the default page size.
    pub fn new(context: &SearchContext, total_hits: u64) -> Self {
        let limit = context
            .size()
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = context.from().unwrap_or_default();

        let current_page = offset / limit + 1;
        let total_pages = total_hits.div_ceil(limit);

        Self {
            current_page,
            limit,
            offset,
            total_hits,
            total_pages,
            prev_page: (offset > 0 && current_page > 1).then(|| current_page - 1),
            next_page: (total_pages > current_page).then(|| current_page + 1),
        }
    }

    /// Page position for `context` from a raw search response.
    pub fn from_response(context: &SearchContext, response: &Value) -> Self {
        Self::new(context, total_hits(response))
    }
}

/// `hits.total` of a search response, in either of its shapes. `0` if absent.
pub fn total_hits(response: &Value) -> u64 {
    response
        .pointer("/hits/total/value")
        .or_else(|| response.pointer("/hits/total"))
        .and_then(Value::as_u64)
        .unwrap_or_default()
}
