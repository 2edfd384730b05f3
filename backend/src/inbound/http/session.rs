//! Typed access to the login stored in the session cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Rotate the session key before storing a new identity.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn whoami(session: &SessionContext) -> Result<HttpResponse, Error> {
        Ok(match session.user_id()? {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::NoContent().finish(),
        })
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(crate::inbound::http::test_utils::test_session_middleware())
                    .route(
                        "/login",
                        web::get().to(|session: SessionContext| async move {
                            let id = UserId::new(FIXTURE_ID).expect("fixture id");
                            session.renew();
                            session.persist_user(&id)?;
                            Ok::<_, Error>(HttpResponse::Ok().finish())
                        }),
                    )
                    .route(
                        "/tamper",
                        web::get().to(|session: Session| async move {
                            session
                                .insert(USER_ID_KEY, "not-a-uuid")
                                .expect("set invalid user id");
                            HttpResponse::Ok().finish()
                        }),
                    )
                    .route(
                        "/logout",
                        web::get().to(|session: SessionContext| async move {
                            session.purge();
                            HttpResponse::Ok().finish()
                        }),
                    )
                    .route(
                        "/whoami",
                        web::get().to(|session: SessionContext| async move { whoami(&session) }),
                    ),
            )
            .await
        };
    }

    fn session_cookie(
        res: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = session_app!();
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn missing_session_is_anonymous() {
        let app = session_app!();
        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_anonymous() {
        let app = session_app!();
        let tampered =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&tampered))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = session_app!();
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;
        assert_eq!(session_cookie(&res).value(), "");
    }
}
