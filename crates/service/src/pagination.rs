//! Pagination utilities for service layer
//!
//! `PageRequest` carries a zero-based page index, a page size and a single sort key;
//! `Page` is what stores hand back, with totals for the caller.

use serde::Serialize;

/// Upper bound applied to requested page sizes
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `asc` in any letter case selects ascending; every other value selects descending.
    pub fn from_param(dir: &str) -> Self {
        if dir.eq_ignore_ascii_case("asc") { Direction::Asc } else { Direction::Desc }
    }
}

/// Sort key; the field name is resolved by the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self { field: field.into(), direction }
    }
}

/// Pagination parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    /// Clamp the page size into `1..=MAX_PAGE_SIZE`.
    pub fn of(page: u64, size: u64, sort: Sort) -> Self {
        Self { page, size: size.clamp(1, MAX_PAGE_SIZE), sort }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus totals
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, req: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(req.size.max(1));
        Self { content, page: req.page, size: req.size, total_elements, total_pages }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
