//! Shared validation helpers for inbound HTTP adapters.

use serde_json::{Value, json};

use crate::domain::{EntityName, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Blank,
    InvalidOrderField,
    InvalidBody,
    InvalidQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Blank => "blank",
            ErrorCode::InvalidOrderField => "invalid_order_field",
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::InvalidQuery => "invalid_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const LOCATION: FieldName = FieldName::new("location");
pub(crate) const CATEGORY: FieldName = FieldName::new("category");
pub(crate) const ORDER_BY: FieldName = FieldName::new("order_by");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn blank_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be blank")).with_code(ErrorCode::Blank)
}

pub(crate) fn invalid_order_field_error(value: &str) -> Error {
    let field = ORDER_BY.as_str();
    ValidationError::new(
        field,
        format!("cannot order events by '{value}'; expected one of id, eventID, name, location, category"),
    )
    .with_value(ErrorCode::InvalidOrderField, value)
}

/// Error for a request body that failed to deserialise.
pub(crate) fn invalid_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {reason}"))
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
}

/// Error for a query string that failed to deserialise.
pub(crate) fn invalid_query_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed query string: {reason}"))
        .with_details(json!({ "code": ErrorCode::InvalidQuery.as_str() }))
}

/// Require a present, non-blank name for `field`.
pub(crate) fn require_name(value: Option<String>, field: FieldName) -> Result<EntityName, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    EntityName::new(raw).map_err(|_| blank_field_error(field))
}

/// Merge per-field failures into one error. A lone failure is returned as
/// is; several keep the first as `details` and list every one under `fields`.
pub(crate) fn field_errors(errors: impl IntoIterator<Item = Error>) -> Error {
    let mut errors: Vec<Error> = errors.into_iter().collect();
    if errors.len() <= 1 {
        return errors
            .pop()
            .unwrap_or_else(|| Error::invalid_request("invalid request body"));
    }
    let message = errors
        .iter()
        .map(Error::message)
        .collect::<Vec<_>>()
        .join("; ");
    let fields: Vec<Value> = errors
        .iter()
        .filter_map(|error| error.details().cloned())
        .collect();
    let mut details = fields.first().cloned().unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut details {
        map.insert("fields".to_owned(), Value::Array(fields));
    }
    Error::invalid_request(message).with_details(details)
}
