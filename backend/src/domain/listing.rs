//! Windowed query results.

/// One window of a larger result set together with the set's total size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    /// Number of items matching the query across all windows.
    pub total: u64,
    /// Items inside the requested window, in query order.
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    /// Bundle a window with its total.
    pub fn new(total: u64, items: Vec<T>) -> Self {
        Self { total, items }
    }
}
