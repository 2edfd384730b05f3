//! Permission gate for resource scopes.
//!
//! Safe methods (`GET`, `HEAD`, `OPTIONS`) pass for everyone. Any other
//! method needs a user id in the session and is rejected with `403` when the
//! caller is anonymous. The session middleware must wrap this one.

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error as DomainError, UserId};
use crate::inbound::http::session::SessionContext;

const NOT_AUTHENTICATED: &str = "authentication credentials were not provided";

/// Whether `method` changes state and therefore needs an authenticated user.
pub fn requires_authentication(method: &Method) -> bool {
    ![Method::GET, Method::HEAD, Method::OPTIONS].contains(method)
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Access {
    /// Read-only request; no session lookup needed.
    Open,
    /// Write by an authenticated user.
    Authenticated,
    /// Write by an anonymous caller.
    Anonymous,
    /// The session could not be read.
    SessionUnreadable(String),
}

/// Decide access, reading the session only for state-changing methods.
pub(crate) fn decide<F>(method: &Method, session_user: F) -> Access
where
    F: FnOnce() -> Result<Option<UserId>, DomainError>,
{
    if !requires_authentication(method) {
        return Access::Open;
    }
    match session_user() {
        Ok(Some(_)) => Access::Authenticated,
        Ok(None) => Access::Anonymous,
        Err(err) => Access::SessionUnreadable(err.message().to_owned()),
    }
}

/// Middleware allowing anonymous reads and authenticated writes.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use events_backend::middleware::PermissionGate;
///
/// let app = App::new().service(web::scope("/event").wrap(PermissionGate));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissionGate;

impl<S, B> Transform<S, ServiceRequest> for PermissionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PermissionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PermissionGateMiddleware { service }))
    }
}

/// Service wrapper produced by [`PermissionGate`].
pub struct PermissionGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for PermissionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let access = decide(req.method(), || {
            SessionContext::new(req.get_session()).user_id()
        });
        // Rejections are built inside the future so they pick up the trace id.
        match access {
            Access::Open | Access::Authenticated => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Access::Anonymous => Box::pin(async move {
                debug!(method = %req.method(), path = req.path(), "anonymous write rejected");
                let error = DomainError::forbidden(NOT_AUTHENTICATED);
                Ok(req.error_response(error).map_into_right_body())
            }),
            Access::SessionUnreadable(message) => Box::pin(async move {
                let error = DomainError::internal(message);
                Ok(req.error_response(error).map_into_right_body())
            }),
        }
    }
}
