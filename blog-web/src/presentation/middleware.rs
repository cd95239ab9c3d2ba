use std::future::{Ready, ready};
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Instant;

use crate::application::auth_service::AuthService;
use crate::data::user_repository::UserRepository;
use crate::presentation::session::{
    CurrentUser, FLASH_COOKIE, FlashMessages, SESSION_COOKIE, removal_cookie,
};
use crate::presentation::views::RenderedPage;
use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};
use uuid::Uuid;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
static TIMING_HEADER: HeaderName = HeaderName::from_static("server-timing");

#[derive(Clone)]
pub struct RequestId(pub String);

/// Tags each request with an id, times it and logs the outcome together with
/// the user the session middleware resolved.
pub struct RequestTracing;

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTracingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTracingService { service }))
    }
}

pub struct RequestTracingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTracingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_owned())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(request_id.clone()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let duration = start.elapsed();
            let status = res.status().as_u16();
            let user_id = res
                .request()
                .extensions()
                .get::<CurrentUser>()
                .map(|user| user.id);

            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                user_id,
                duration_ms = duration.as_millis() as u64,
                "request completed"
            );

            let headers = res.response_mut().headers_mut();
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                headers.insert(REQUEST_ID_HEADER.clone(), value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("app;dur={}", duration.as_millis())) {
                headers.insert(TIMING_HEADER.clone(), value);
            }

            Ok(res)
        })
    }
}

/// Resolves the session cookie to a `CurrentUser` and the flash cookie to
/// `FlashMessages`, both stored in request extensions. Requests without a
/// valid session pass through anonymously.
pub struct SessionMiddleware<R: UserRepository + 'static> {
    auth: AuthService<R>,
}

impl<R: UserRepository + 'static> SessionMiddleware<R> {
    pub fn new(auth: AuthService<R>) -> Self {
        Self { auth }
    }
}

impl<S, B, R> Transform<S, ServiceRequest> for SessionMiddleware<R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    R: UserRepository + Clone + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionService<S, R>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionService {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}

pub struct SessionService<S, R: UserRepository + 'static> {
    service: Rc<S>,
    auth: AuthService<R>,
}

impl<S, B, R> Service<ServiceRequest> for SessionService<S, R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    R: UserRepository + Clone + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let auth = self.auth.clone();
        let session_token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned());
        let flash_token = req.cookie(FLASH_COOKIE).map(|c| c.value().to_owned());

        Box::pin(async move {
            if let Some(token) = session_token.filter(|t| !t.is_empty()) {
                match auth.session_user(&token).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(CurrentUser::from(user));
                    }
                    Ok(None) => {}
                    Err(err) => warn!("session lookup failed: {}", err),
                }
            }

            let had_flash = flash_token.as_deref().is_some_and(|t| !t.is_empty());
            let flashes = flash_token
                .map(|token| auth.keys().open_flash(&token))
                .unwrap_or_default();
            req.extensions_mut().insert(FlashMessages(flashes));

            let mut res = service.call(req).await?;

            // Pending messages are consumed once a page template showed them.
            let rendered = res.response().extensions().contains::<RenderedPage>();
            if had_flash && rendered {
                if let Err(err) = res.response_mut().add_cookie(&removal_cookie(FLASH_COOKIE)) {
                    warn!("failed to clear flash cookie: {}", err);
                }
            }

            Ok(res)
        })
    }
}
