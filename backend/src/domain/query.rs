//! Sorting and filtering applied to the event collection before paging.
//!
//! Adapters translate [`EventQuery`] into their own query language; the
//! in-memory adapter evaluates it directly through [`EventQuery::matches`]
//! and [`EventOrdering::compare`].

use std::cmp::Ordering;
use std::str::FromStr;

use super::Event;

/// Field an event list may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    /// Surrogate key (`id` or `eventID`).
    #[default]
    Id,
    /// Event name.
    Name,
    /// Name of the related location.
    Location,
    /// Name of the related category.
    Category,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Rejected `order_by` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot order events by '{value}'; expected one of id, eventID, name, location, category")]
pub struct OrderingParseError {
    /// Value supplied by the client.
    pub value: String,
}

/// Requested ordering. Ties are always broken by ascending id.
///
/// # Examples
/// ```
/// use events_backend::domain::{EventOrdering, OrderField, SortDirection};
///
/// let ordering: EventOrdering = "-category".parse().unwrap();
/// assert_eq!(ordering.field, OrderField::Category);
/// assert_eq!(ordering.direction, SortDirection::Descending);
/// assert!("colour".parse::<EventOrdering>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOrdering {
    /// Primary sort key.
    pub field: OrderField,
    /// Direction applied to the primary key.
    pub direction: SortDirection,
}

impl EventOrdering {
    /// Compare two events under this ordering.
    pub fn compare(&self, left: &Event, right: &Event) -> Ordering {
        let primary = match self.field {
            OrderField::Id => left.id.cmp(&right.id),
            OrderField::Name => left.name.cmp(&right.name),
            OrderField::Location => left.location.cmp(&right.location),
            OrderField::Category => left.category.cmp(&right.category),
        };
        let directed = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        directed.then_with(|| left.id.cmp(&right.id))
    }
}

impl FromStr for EventOrdering {
    type Err = OrderingParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (direction, field_name) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, raw),
        };
        let field = match field_name {
            "id" | "eventID" => OrderField::Id,
            "name" => OrderField::Name,
            "location" => OrderField::Location,
            "category" => OrderField::Category,
            _ => {
                return Err(OrderingParseError {
                    value: raw.to_owned(),
                });
            }
        };
        Ok(Self { field, direction })
    }
}

/// Ordering plus conjunctive exact-match filters on related names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventQuery {
    /// Ordering of the filtered set.
    pub ordering: EventOrdering,
    /// Keep only events at the location with exactly this name.
    pub location: Option<String>,
    /// Keep only events in the category with exactly this name.
    pub category: Option<String>,
}

impl EventQuery {
    /// Whether `event` passes every active filter.
    pub fn matches(&self, event: &Event) -> bool {
        let location_ok = self
            .location
            .as_deref()
            .is_none_or(|wanted| event.location.as_str() == wanted);
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|wanted| event.category.as_str() == wanted);
        location_ok && category_ok
    }
}
