//! Natural-key names shared by events, locations, and categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error raised when a name cannot identify an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntityNameError {
    /// The name contained no visible characters.
    #[error("name must not be blank")]
    Blank,
}

/// Name of an event, location, or category.
///
/// Names are the natural key at the API boundary. Matching is exact and
/// case-sensitive, so the value is stored exactly as supplied.
///
/// # Examples
/// ```
/// use events_backend::domain::EntityName;
///
/// let name = EntityName::new("Baby Yoga at Islington Town Hall ☯").unwrap();
/// assert_eq!(name.as_str(), "Baby Yoga at Islington Town Hall ☯");
/// assert!(EntityName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Validate a candidate name.
    pub fn new(raw: impl Into<String>) -> Result<Self, EntityNameError> {
        let value = raw.into();
        if value.trim().is_empty() {
            return Err(EntityNameError::Blank);
        }
        Ok(Self(value))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityName {
    type Error = EntityNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityName> for String {
    fn from(value: EntityName) -> Self {
        value.0
    }
}
