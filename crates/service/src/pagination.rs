//! Pagination utilities for service layer
//!
//! Zero-based page requests, whitelisted sorting and the page envelope
//! returned by every list endpoint.
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Order, PaginatorTrait, QueryOrder, Select};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::author::domain::AuthorResponse;
use crate::book::domain::BookResponse;
use crate::errors::{ServiceError, ServiceResult};
use crate::reservation::domain::ReservationResponse;
use crate::search::domain::SearchResultResponse;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw paging query parameters as sent by clients.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index (default 0)
    pub page: Option<i64>,
    /// Page size, 1 to 100 (default 20)
    pub size: Option<i64>,
    /// `property[,asc|desc]`
    pub sort: Option<String>,
}

impl PageParams {
    pub fn pagination(&self) -> Pagination { Pagination::from_raw(self.page, self.size, MAX_PAGE_SIZE) }
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
}

impl Pagination {
    /// Negative pages become 0; sizes are clamped to `1..=max`. The page is
    /// capped so that `offset()` always fits in an `i64`.
    pub fn from_raw(page: Option<i64>, size: Option<i64>, max: u64) -> Self {
        let max = max.clamp(1, i64::MAX as u64) as i64;
        let size = size.map(|s| s.clamp(1, max)).unwrap_or((DEFAULT_PAGE_SIZE as i64).min(max));
        let page = page.unwrap_or(0).clamp(0, i64::MAX / size);
        Self { page: page as u64, size: size as u64 }
    }

    pub fn offset(&self) -> u64 { self.page.saturating_mul(self.size) }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 0, size: DEFAULT_PAGE_SIZE } }
}

/// Parse `property[,direction]` against a whitelist of sortable properties.
pub fn parse_sort<C: Copy>(raw: Option<&str>, allowed: &[(&'static str, C)]) -> ServiceResult<Option<(C, Order)>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else { return Ok(None) };
    let mut parts = raw.splitn(2, ',');
    let property = parts.next().unwrap_or_default().trim();
    let order = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
        None => Order::Asc,
        Some(d) if d.is_empty() || d == "asc" => Order::Asc,
        Some(d) if d == "desc" => Order::Desc,
        Some(d) => return Err(ServiceError::BadRequest(format!("Invalid sort direction '{}'", d))),
    };
    allowed
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, col)| Some((*col, order)))
        .ok_or_else(|| ServiceError::BadRequest(format!("Invalid sort property '{}'", property)))
}

/// Apply the requested order, always breaking ties by primary key.
pub fn apply_sort<E: EntityTrait>(select: Select<E>, sort: Option<(E::Column, Order)>, id: E::Column) -> Select<E> {
    match sort {
        Some((col, order)) => select.order_by(col, order).order_by_asc(id),
        None => select.order_by_asc(id),
    }
}

/// Fetch one page of `select` together with the total row count.
pub async fn fetch_page<'db, C, E>(db: &'db C, select: Select<E>, p: Pagination) -> Result<(Vec<E::Model>, u64), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync + 'db,
{
    let paginator = select.paginate(db, p.size);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(p.page).await?;
    Ok((rows, total))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    AuthorPage = Page<AuthorResponse>,
    BookPage = Page<BookResponse>,
    ReservationPage = Page<ReservationResponse>,
    SearchResultPage = Page<SearchResultResponse>
)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, p: Pagination, total_elements: u64) -> Self {
        let total_pages = if p.size == 0 { 0 } else { total_elements.div_ceil(p.size) };
        Self {
            content,
            page: p.page,
            size: p.size,
            total_elements,
            total_pages,
            first: p.page == 0,
            last: p.page + 1 >= total_pages,
        }
    }

    pub fn empty(p: Pagination) -> Self { Self::new(Vec::new(), p, 0) }
}
