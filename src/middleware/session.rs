// src/middleware/session.rs

use std::future::{ready, Ready};

use actix_web::{
    cookie::Cookie,
    dev::{self, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "coinsim_session";

/// Session id bound to the caller for the lifetime of the request.
/// Handlers that touch session state take it as an extractor.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);

impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionId>()
                .copied()
                .ok_or_else(|| actix_web::error::ErrorInternalServerError("session not bound")),
        )
    }
}

/// Binds every request to a session: reuses the cookie when present and
/// valid, otherwise mints a fresh id and sets the cookie on the way out.
pub struct SessionBinder;

impl<S, B> Transform<S, ServiceRequest> for SessionBinder
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionBinderMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionBinderMiddleware { service }))
    }
}

pub struct SessionBinderMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionBinderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let existing = req
            .cookie(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());
        let (sid, minted) = match existing {
            Some(id) => (id, false),
            None => (Uuid::new_v4(), true),
        };
        req.extensions_mut().insert(SessionId(sid));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if minted {
                let cookie = Cookie::build(SESSION_COOKIE, sid.to_string())
                    .path("/")
                    .http_only(true)
                    .finish();
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    log::warn!("session cookie not set: {e}");
                }
            }
            Ok(res)
        })
    }
}
