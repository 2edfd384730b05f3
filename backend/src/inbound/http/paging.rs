//! Page-number pagination for list endpoints.

use pagination::{PageRequest, Paginated, PaginationError};
use url::Url;

use crate::domain::Error;

const INVALID_PAGE: &str = "Invalid page.";

fn to_http_error(err: PaginationError) -> Error {
    match err {
        PaginationError::InvalidPage { .. } | PaginationError::OutOfRange { .. } => {
            Error::not_found(INVALID_PAGE)
        }
        PaginationError::ZeroPageSize => Error::internal("page size must be positive"),
    }
}

/// Parse the raw `page` query value. Bad page numbers are `404`.
pub(crate) fn page_request(raw: Option<&str>, size: u32) -> Result<PageRequest, Error> {
    PageRequest::from_query(raw, size).map_err(to_http_error)
}

/// Wrap a fetched window in the `{count, next, previous, results}` envelope.
pub(crate) fn paginate<T>(
    request: PageRequest,
    count: u64,
    results: Vec<T>,
    base: &Url,
) -> Result<Paginated<T>, Error> {
    Paginated::build(request, count, results, base).map_err(to_http_error)
}
