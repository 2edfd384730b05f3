//! Parsing and slicing for page-number requests.

use crate::PaginationError;

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Page size used when configuration does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Validated page selection.
///
/// ## Invariants
/// - `number` is at least 1.
/// - `size` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u64,
    size: u32,
}

impl PageRequest {
    /// Build a request for an explicit page number and size.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPage`] when `number` is zero and
    /// [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn new(number: u64, size: u32) -> Result<Self, PaginationError> {
        if size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        if number == 0 {
            return Err(PaginationError::InvalidPage {
                value: number.to_string(),
            });
        }
        Ok(Self { number, size })
    }

    /// First page with the given size.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn first(size: u32) -> Result<Self, PaginationError> {
        Self::new(1, size)
    }

    /// Interpret the raw `page` query value.
    ///
    /// A missing or blank value selects the first page.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPage`] when the value is not a
    /// positive integer.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(None, 10).expect("first page");
    /// assert_eq!(request.number(), 1);
    /// assert!(PageRequest::from_query(Some("zero"), 10).is_err());
    /// ```
    pub fn from_query(raw: Option<&str>, size: u32) -> Result<Self, PaginationError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Self::first(size),
            Some(value) => {
                let number = value
                    .parse::<u64>()
                    .map_err(|_| PaginationError::InvalidPage {
                        value: value.to_owned(),
                    })?;
                Self::new(number, size)
            }
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.number
            .saturating_sub(1)
            .saturating_mul(self.limit())
    }

    /// Number of items to fetch for this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    /// Last page number for a collection of `count` items.
    ///
    /// An empty collection still has one (empty) page.
    #[must_use]
    pub fn last_page(&self, count: u64) -> u64 {
        count.div_ceil(self.limit()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 1)]
    #[case(Some(""), 1)]
    #[case(Some("  "), 1)]
    #[case(Some("1"), 1)]
    #[case(Some("7"), 7)]
    fn parses_valid_page_values(#[case] raw: Option<&str>, #[case] expected: u64) {
        let request = PageRequest::from_query(raw, DEFAULT_PAGE_SIZE).expect("valid page");
        assert_eq!(request.number(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("two")]
    #[case("1.5")]
    fn rejects_invalid_page_values(#[case] raw: &str) {
        let error = PageRequest::from_query(Some(raw), DEFAULT_PAGE_SIZE)
            .expect_err("invalid page must fail");
        assert!(matches!(error, PaginationError::InvalidPage { .. }));
    }

    #[rstest]
    fn rejects_zero_page_size() {
        assert_eq!(PageRequest::new(1, 0), Err(PaginationError::ZeroPageSize));
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(4, 3, 9)]
    fn offset_skips_previous_pages(#[case] number: u64, #[case] size: u32, #[case] offset: u64) {
        let request = PageRequest::new(number, size).expect("valid request");
        assert_eq!(request.offset(), offset);
        assert_eq!(request.limit(), u64::from(size));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(25, 3)]
    fn last_page_rounds_up(#[case] count: u64, #[case] last: u64) {
        let request = PageRequest::first(10).expect("valid request");
        assert_eq!(request.last_page(count), last);
    }
}
