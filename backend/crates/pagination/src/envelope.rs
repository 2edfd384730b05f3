//! Response envelope with absolute navigation links.

use serde::Serialize;
use url::Url;

use crate::{PAGE_PARAM, PageRequest, PaginationError};

/// One page of a collection.
///
/// Serialises as `{"count": .., "next": .., "previous": .., "results": [..]}`
/// where missing links are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the following page, if any.
    pub next: Option<String>,
    /// Absolute link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Assemble a page from the request, the collection size, and the items
    /// fetched for the window.
    ///
    /// `base` is the URL of the current request; other query parameters are
    /// preserved in the generated links.
    ///
    /// # Errors
    /// Returns [`PaginationError::OutOfRange`] when the request points past
    /// the last page. Page 1 of an empty collection is always valid.
    pub fn build(
        request: PageRequest,
        count: u64,
        results: Vec<T>,
        base: &Url,
    ) -> Result<Self, PaginationError> {
        let last = request.last_page(count);
        let number = request.number();
        if number > last {
            return Err(PaginationError::OutOfRange { page: number, last });
        }

        let next = (number < last).then(|| page_link(base, Some(number.saturating_add(1))));
        let previous = (number > 1).then(|| {
            let target = number.saturating_sub(1);
            page_link(base, (target > 1).then_some(target))
        });

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }

    /// Transform every item while keeping the envelope intact.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Rewrite the `page` parameter of `base`, dropping it for `None`.
fn page_link(base: &Url, page: Option<u64>) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    if !retained.is_empty() || page.is_some() {
        let mut pairs = link.query_pairs_mut();
        pairs.extend_pairs(retained);
        if let Some(number) = page {
            pairs.append_pair(PAGE_PARAM, &number.to_string());
        }
    }
    link.into()
}
