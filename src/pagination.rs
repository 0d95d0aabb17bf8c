use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PageRequest;

/// Page-count metadata of a paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of rows matching the filter
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    /// Number of pages; zero when there are no rows
    pub total_pages: u64,
}

/// Function to calculate the page-count metadata.
///
/// # Arguments
///
/// * `total` - The total number of rows available.
/// * `page` - The requested page, clamped to at least 1.
/// * `page_size` - Rows per page, clamped to at least 1.
///
/// # Returns
///
/// `PaginationMeta` with `total_pages = ceil(total / page_size)`.
#[must_use]
pub fn paginate(total: u64, page: u64, page_size: u64) -> PaginationMeta {
    PaginationMeta {
        total,
        page: page.max(1),
        total_pages: total.div_ceil(page_size.max(1)),
    }
}

/// Paged response envelope: `{"data": [...], "meta": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            meta: paginate(total, request.page, request.per_page),
        }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
