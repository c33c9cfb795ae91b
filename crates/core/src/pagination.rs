//! Page/size handling for the list endpoint.
//!
//! Query values arrive as raw strings so a non-numeric value can be reported
//! as a validation error instead of an extractor rejection.

use crate::error::CoreError;

/// Page used when the client does not ask for one (pages are 1-based).
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size served; larger requests are clamped to this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Largest row window (`page * size`) a single list query may scan.
///
/// The store has no server-side offset, so every row before the page is
/// read and discarded; deeper pages are rejected instead of scanned.
pub const MAX_WINDOW: u32 = 10_000;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Rows per page.
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Parse optional `page` and `size` query values.
    ///
    /// Missing or empty values fall back to the defaults. Values must be
    /// integers >= 1; `size` is clamped to [`MAX_PAGE_SIZE`].
    pub fn parse(page: Option<&str>, size: Option<&str>) -> Result<Self, CoreError> {
        let number = parse_positive("page", page)?.unwrap_or(DEFAULT_PAGE);
        let size = parse_positive("size", size)?
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        let page = Self { number, size };
        if page.window().is_none() {
            return Err(CoreError::Validation(format!(
                "page {number} is out of range for size {size}"
            )));
        }
        Ok(page)
    }

    /// Number of rows to skip before the page starts.
    pub fn offset(&self) -> u32 {
        (self.number - 1) * self.size
    }

    /// Rows that must be read to reach the end of this page, if within
    /// [`MAX_WINDOW`].
    pub fn window(&self) -> Option<u32> {
        self.number
            .checked_mul(self.size)
            .filter(|window| *window <= MAX_WINDOW)
    }
}

fn parse_positive(field: &str, raw: Option<&str>) -> Result<Option<u32>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let value: i64 = raw
        .parse()
        .map_err(|_| CoreError::Validation(format!("Invalid {field}: '{raw}' is not an integer")))?;

    if value < 1 {
        return Err(CoreError::Validation(format!(
            "Invalid {field}: must be at least 1"
        )));
    }

    u32::try_from(value)
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("Invalid {field}: '{raw}' is too large")))
}
