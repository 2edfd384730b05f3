//! Rendering of domain errors as HTTP responses.
//!
//! Every failure leaves the service as the JSON [`Error`] body with the status
//! implied by its code. The `trace-id` header repeats the body's `traceId` so
//! clients can correlate without parsing.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by every handler.
pub type ApiResult<T> = Result<T, Error>;

const NOT_FOUND: &str = "Not found.";
const REDACTED: &str = "Internal server error";

/// `404` for an id that names no stored entity.
pub(crate) fn resource_not_found() -> Error {
    Error::not_found(NOT_FOUND)
}

impl Error {
    fn http_status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client. Internal failures keep only their trace id.
    fn client_view(&self) -> Self {
        if self.code() != ErrorCode::InternalError {
            return self.clone();
        }
        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        let redacted = Self::internal(REDACTED);
        match self.trace_id() {
            Some(id) => redacted.with_trace_id(id.to_owned()),
            None => redacted,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::ServiceUnavailable {
            warn!(message = self.message(), "store unavailable");
        }
        let body = self.client_view();
        let mut response = HttpResponse::build(self.http_status());
        if let Some(id) = body.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    const TRACE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
        let response = error.error_response();
        let status = response.status();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        (status, header, serde_json::from_slice(&bytes).expect("JSON body"))
    }

    #[rstest]
    #[case(Error::invalid_request("bad name"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("invalid credentials"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("sign in to write"), StatusCode::FORBIDDEN)]
    #[case(resource_not_found(), StatusCode::NOT_FOUND)]
    #[case(Error::service_unavailable("pool timeout"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("constraint exploded"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_names_render_field_details() {
        let error = Error::invalid_request("an event named 'Yoga' already exists")
            .with_trace_id(TRACE)
            .with_details(json!({ "field": "name", "value": "Yoga", "code": "not_unique" }));

        let (status, header, body) = render(&error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header.as_deref(), Some(TRACE));
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["traceId"], TRACE);
        assert_eq!(body["details"]["code"], "not_unique");
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_errors_hide_their_message_and_details() {
        let error = Error::internal("relation \"events\" does not exist")
            .with_trace_id(TRACE)
            .with_details(json!({ "sql": "SELECT 1" }));

        let (status, header, body) = render(&error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header.as_deref(), Some(TRACE));
        assert_eq!(
            body,
            json!({ "code": "internal_error", "message": REDACTED, "traceId": TRACE })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn untraced_errors_send_no_header() {
        let (status, header, body) = render(&resource_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(header.is_none());
        assert_eq!(body["message"], NOT_FOUND);
        assert!(body.get("traceId").is_none());
    }
}
