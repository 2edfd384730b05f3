//! The error every port and handler eventually returns.
//!
//! [`Error`] carries no transport types: the HTTP adapter picks a status from
//! the [`ErrorCode`] and sends the value itself as the JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::TraceId;

/// Failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input, a failed validation, or a duplicate name.
    InvalidRequest,
    /// Login credentials were rejected.
    Unauthorized,
    /// A write was attempted without a session.
    Forbidden,
    /// Unknown id or invalid page.
    NotFound,
    /// The store could not be reached.
    ServiceUnavailable,
    /// Anything else; the message never reaches clients.
    InternalError,
}

/// Client-facing error body: `{code, message, traceId?, details?}`.
///
/// Constructing an error inside a request picks up that request's
/// [`TraceId`].
///
/// # Examples
/// ```
/// use events_backend::domain::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::invalid_request("name must not be blank")
///     .with_details(json!({ "field": "name", "code": "blank" }));
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("name")));
/// assert!(err.trace_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "an event named 'Yoga' already exists")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

macro_rules! constructors {
    ($($(#[$meta:meta])* $name:ident => $code:ident,)+) => {
        $(
            $(#[$meta])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// Build an error tagged with the current request's trace id, if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    constructors! {
        /// `400`.
        invalid_request => InvalidRequest,
        /// `401`.
        unauthorized => Unauthorized,
        /// `403`.
        forbidden => Forbidden,
        /// `404`.
        not_found => NotFound,
        /// `503`.
        service_unavailable => ServiceUnavailable,
        /// `500`.
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Field-level context such as `{field, code}`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Overwrite the captured trace id.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
