//! Dual-mode pagination.
//!
//! A list endpoint paginates only when the caller supplies *both* `page` and
//! `limit`. With either one missing the complete result set is returned and
//! the `pagination` key is absent from the response. Some callers rely on
//! receiving the full set, so [`PageRequest::from_params`] returning `None` is
//! part of the contract, not a fallback.

use serde::Serialize;

use crate::query::QueryError;

/// Postgres binds OFFSET and LIMIT as `bigint`.
const MAX_SQL_ROWS: u64 = i64::MAX as u64;

/// A validated page request. `page` and `limit` are both ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Result<Self, QueryError> {
        if page < 1 {
            return Err(QueryError::InvalidNumber("page"));
        }
        if limit < 1 {
            return Err(QueryError::InvalidNumber("limit"));
        }
        Ok(Self { page, limit })
    }

    /// Build from raw query values. `Ok(None)` unless both are present.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Option<Self>, QueryError> {
        let (Some(page), Some(limit)) = (non_empty(page), non_empty(limit)) else {
            return Ok(None);
        };
        let page = page
            .trim()
            .parse::<u64>()
            .map_err(|_| QueryError::InvalidNumber("page"))?;
        let limit = limit
            .trim()
            .parse::<u64>()
            .map_err(|_| QueryError::InvalidNumber("limit"))?;
        Self::new(page, limit).map(Some)
    }

    /// Number of rows to skip, capped at what a `bigint` OFFSET can hold.
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(MAX_SQL_ROWS)
    }

    /// Row count for LIMIT. Any limit past `bigint` range already means
    /// "every remaining row".
    pub fn take(&self) -> u64 {
        self.limit.min(MAX_SQL_ROWS)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// The `pagination` envelope returned alongside a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit),
        }
    }
}

/// A list result. `pagination` is `None` (and not serialized) for full sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> Paginated<T> {
    pub fn all(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    pub fn page(items: Vec<T>, info: PageInfo) -> Self {
        Self {
            items,
            pagination: Some(info),
        }
    }

    /// Paginate an in-memory vector by slicing.
    pub fn slice(items: Vec<T>, request: Option<PageRequest>) -> Self {
        let Some(request) = request else {
            return Self::all(items);
        };
        let total = items.len() as u64;
        let skip = usize::try_from(request.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.take()).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(skip).take(limit).collect();
        Self::page(items, PageInfo::new(request, total))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paginated<U>, E> {
        Ok(Paginated {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            pagination: self.pagination,
        })
    }
}
