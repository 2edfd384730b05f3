//! Page-number pagination primitives shared by the events backend.
//!
//! Endpoints accept a 1-based `page` query parameter, slice their result set
//! with [`PageRequest::offset`] and [`PageRequest::limit`], and answer with a
//! [`Paginated`] envelope whose `next`/`previous` links are absolute URLs
//! derived from the current request URL.
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//! use url::Url;
//!
//! let request = PageRequest::from_query(Some("2"), 2).expect("valid page");
//! let base = Url::parse("http://localhost/event/?location=London&page=2").expect("url");
//! let page = Paginated::build(request, 5, vec!["c", "d"], &base).expect("page exists");
//!
//! assert_eq!(page.count, 5);
//! assert_eq!(
//!     page.next.as_deref(),
//!     Some("http://localhost/event/?location=London&page=3"),
//! );
//! assert_eq!(
//!     page.previous.as_deref(),
//!     Some("http://localhost/event/?location=London"),
//! );
//! ```

mod envelope;
mod request;

pub use envelope::Paginated;
pub use request::{DEFAULT_PAGE_SIZE, PAGE_PARAM, PageRequest};

/// Errors raised when a page request cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The `page` parameter is not a positive integer.
    #[error("invalid page number: {value}")]
    InvalidPage {
        /// Raw value supplied by the client.
        value: String,
    },
    /// The requested page lies beyond the last page of the collection.
    #[error("page {page} is out of range; last page is {last}")]
    OutOfRange {
        /// Requested page number.
        page: u64,
        /// Last available page number.
        last: u64,
    },
    /// Page size must be at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}
