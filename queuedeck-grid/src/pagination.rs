//! Pagination controller: page-based slicing of the sorted rows.

use std::ops::Range;

use serde::Serialize;

use crate::row::Row;

/// Position of the current page within the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Zero-based page, always within `0..page_count`.
    pub page_index: usize,
    /// Rows per page (at least 1).
    pub page_size: usize,
    /// Number of pages, at least 1 even with no rows.
    pub page_count: usize,
    /// Total rows being paginated.
    pub row_count: usize,
}

impl PageInfo {
    /// Compute page info, clamping the page index into range.
    pub fn new(row_count: usize, page_index: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page_count = row_count.div_ceil(page_size).max(1);
        Self {
            page_index: page_index.min(page_count - 1),
            page_size,
            page_count,
            row_count,
        }
    }

    /// Row positions covered by the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.row_count);
        let end = (start + self.page_size).min(self.row_count);
        start..end
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// One page of rows.
#[derive(Debug)]
pub struct Page<T> {
    /// Rows on this page, in sorted order.
    pub rows: Vec<Row<T>>,
    /// Clamped page index.
    pub page_index: usize,
    /// Total page count.
    pub page_count: usize,
}

impl<T> Clone for Page<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            page_index: self.page_index,
            page_count: self.page_count,
        }
    }
}

/// Slice `rows` into the requested page.
///
/// An out-of-range `page_index` is clamped, never an error.
pub fn apply<T>(rows: &[Row<T>], page_index: usize, page_size: usize) -> Page<T> {
    let info = PageInfo::new(rows.len(), page_index, page_size);
    Page {
        rows: rows[info.range()].to_vec(),
        page_index: info.page_index,
        page_count: info.page_count,
    }
}
