use thiserror::Error;

use super::model::Record;

/// Rows shown per page in the record explorer.
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("page {requested} is outside 1..={total_pages}")]
    OutOfRange { requested: usize, total_pages: usize },
}

// ---------------------------------------------------------------------------
// Page – one fixed-size window over a collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub visible: &'a [Record],
    /// 1-based.
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl Page<'_> {
    /// Whether a "previous" control should be enabled.
    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    /// Whether a "next" control should be enabled.
    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }
}

/// `ceil(total_records / page_size)`, never less than 1 so an empty
/// collection still has a "page 1 of 1".
pub fn total_pages(total_records: usize, page_size: usize) -> Result<usize, PageError> {
    if page_size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    Ok(total_records.div_ceil(page_size).max(1))
}

/// Slice `records` into the page at `page_index` (1-based).
///
/// Out-of-range indices are rejected, not clamped: callers are expected to
/// disable navigation at the first and last page.
pub fn paginate(records: &[Record], page_index: usize, page_size: usize) -> Result<Page<'_>, PageError> {
    let total_pages = total_pages(records.len(), page_size)?;
    if page_index < 1 || page_index > total_pages {
        return Err(PageError::OutOfRange {
            requested: page_index,
            total_pages,
        });
    }

    let start = ((page_index - 1) * page_size).min(records.len());
    let end = (page_index * page_size).min(records.len());

    Ok(Page {
        visible: &records[start..end],
        page_index,
        page_size,
        total_pages,
        total_records: records.len(),
    })
}
