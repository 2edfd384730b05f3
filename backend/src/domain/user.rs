//! Identity of an authenticated account.

use std::fmt;

use uuid::Uuid;

/// Validation errors raised for user identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// Stable identifier of a user account.
///
/// # Examples
/// ```
/// use events_backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdError::Invalid);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdError::Invalid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserIdError::Empty)]
    #[case("abc", UserIdError::Invalid)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserIdError::Invalid)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: UserIdError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn accepts_uuid() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.as_uuid().to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }
}
