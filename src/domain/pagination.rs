//! Pagination bookkeeping for backend list envelopes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use utoipa::ToSchema;

use super::normalize::{coerce_number, normalize_positive_int};
use crate::backend::dto::BackendListResponse;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Page served when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page and limit a list call asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Reads raw query values. Anything that is not a whole number falls
    /// back to the default; zero is raised to one.
    #[must_use]
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<u32>().ok());
        Self {
            page: normalize_positive_int(parse(page), DEFAULT_PAGE),
            limit: normalize_positive_int(parse(limit), DEFAULT_LIMIT),
        }
    }
}

/// A page of view models.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginatedResult<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Total rows across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size that was requested.
    pub limit: u32,
}

/// Wraps a raw `{ items, total, page }` envelope into a typed page.
///
/// A non-array `items` yields no rows; each row that is not an object
/// decodes to the default backend item. A missing or non-numeric `total`
/// falls back to the number of rows received, a missing or non-numeric
/// `page` to the page that was requested. An explicit `null` counts as
/// zero, so it gives `total` 0 and `page` 1. `limit` always echoes the
/// request.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_paginated_result<I, O, F>(
    payload: BackendListResponse,
    mapper: F,
    requested_page: u32,
    requested_limit: u32,
) -> PaginatedResult<O>
where
    I: DeserializeOwned + Default,
    F: Fn(I) -> O,
{
    let items: Vec<O> = decode_items::<I>(payload.items)
        .into_iter()
        .map(mapper)
        .collect();

    let total = envelope_number(payload.total.as_ref())
        .map_or(items.len() as u64, |n| n.max(0.0) as u64);
    let page = envelope_number(payload.page.as_ref())
        .map_or(requested_page, |n| n.max(1.0).min(f64::from(u32::MAX)) as u32);

    PaginatedResult {
        items,
        total,
        page,
        limit: requested_limit,
    }
}

/// Decodes each element of a JSON array into `I`.
#[must_use]
pub fn decode_items<I>(items: Option<Value>) -> Vec<I>
where
    I: DeserializeOwned + Default,
{
    match items {
        Some(Value::Array(rows)) => rows
            .into_iter()
            .map(|row| serde_json::from_value(row).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

/// Numeric envelope field, floored. An explicit `null` reads as zero; a
/// missing field is not a number.
fn envelope_number(value: Option<&Value>) -> Option<f64> {
    coerce_number(value).map(f64::floor)
}
