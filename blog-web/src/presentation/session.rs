use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, web};
use futures_util::future::{Ready, ready};
use tera::Context;

use crate::domain::error::DomainError;
use crate::domain::user::{self, User};
use crate::infrastructure::security::SessionKeys;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "_flash";

/// The logged-in user, placed in request extensions by the session middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        user::is_admin(self.id)
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Messages carried over from the previous response's flash cookie.
#[derive(Debug, Clone, Default)]
pub struct FlashMessages(pub Vec<String>);

pub fn ensure_admin(user: &CurrentUser) -> Result<(), DomainError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Per-request view of who is asking and what the previous request wanted to
/// tell them.
pub struct RequestContext {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<String>,
    keys: SessionKeys,
}

impl RequestContext {
    pub fn require_user(&self) -> Result<&CurrentUser, DomainError> {
        self.user.as_ref().ok_or(DomainError::Unauthorized)
    }

    /// Guard for post management: anonymous requests get 401, everybody but
    /// the admin gets 403.
    pub fn require_admin(&self) -> Result<&CurrentUser, DomainError> {
        let user = self.require_user()?;
        ensure_admin(user)?;
        Ok(user)
    }

    /// Template context shared by every page.
    pub fn page(&self) -> Context {
        let mut ctx = Context::new();
        ctx.insert("logged_in", &self.user.is_some());
        ctx.insert(
            "is_admin",
            &self.user.as_ref().map(CurrentUser::is_admin).unwrap_or(false),
        );
        ctx.insert(
            "current_user_name",
            &self.user.as_ref().map(|u| u.name.as_str()).unwrap_or(""),
        );
        ctx.insert("flashes", &self.flashes);
        ctx
    }

    pub fn redirect_with_flash(
        &self,
        location: &str,
        message: &str,
    ) -> Result<HttpResponse, DomainError> {
        let token = self
            .keys
            .seal_flash(&[message.to_string()])
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .cookie(cookie(FLASH_COOKIE, token))
            .finish())
    }
}

impl FromRequest for RequestContext {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(keys) = req.app_data::<web::Data<SessionKeys>>() else {
            return ready(Err(DomainError::Internal("session keys missing".into())));
        };
        let extensions = req.extensions();
        ready(Ok(Self {
            user: extensions.get::<CurrentUser>().cloned(),
            flashes: extensions
                .get::<FlashMessages>()
                .map(|f| f.0.clone())
                .unwrap_or_default(),
            keys: keys.get_ref().clone(),
        }))
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect that logs the user in by setting the session cookie.
pub fn redirect_with_session(location: &str, token: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie(SESSION_COOKIE, token))
        .finish()
}

/// Redirect that logs the user out.
pub fn redirect_clearing_session(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(removal_cookie(SESSION_COOKIE))
        .finish()
}

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = cookie(name, String::new());
    cookie.set_max_age(CookieDuration::ZERO);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn context_for(user: Option<CurrentUser>) -> RequestContext {
        RequestContext {
            user,
            flashes: vec![],
            keys: SessionKeys::new("secret".into(), 1),
        }
    }

    fn user(id: i64) -> CurrentUser {
        CurrentUser {
            id,
            name: format!("user{id}"),
            email: format!("user{id}@x.com"),
        }
    }

    #[test]
    fn admin_guard_distinguishes_anonymous_from_non_admin() {
        assert!(matches!(
            context_for(None).require_admin(),
            Err(DomainError::Unauthorized)
        ));
        assert!(matches!(
            context_for(Some(user(2))).require_admin(),
            Err(DomainError::Forbidden)
        ));
        assert_eq!(context_for(Some(user(1))).require_admin().unwrap().id, 1);
    }

    #[actix_web::test]
    async fn extracts_user_and_flashes_from_extensions() {
        let req = TestRequest::default()
            .app_data(web::Data::new(SessionKeys::new("secret".into(), 1)))
            .to_http_request();
        req.extensions_mut().insert(user(3));
        req.extensions_mut()
            .insert(FlashMessages(vec!["hello".to_string()]));

        let ctx = RequestContext::extract(&req).await.unwrap();
        assert_eq!(ctx.user.map(|u| u.id), Some(3));
        assert_eq!(ctx.flashes, vec!["hello".to_string()]);
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(SESSION_COOKIE);
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
