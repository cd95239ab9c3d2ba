#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use blog_web::domain::user::User;
use blog_web::infrastructure::config::AppConfig;
use blog_web::infrastructure::database::{create_memory_pool, run_migrations};
use blog_web::presentation::forms::PostForm;
use blog_web::presentation::session::SESSION_COOKIE;
use blog_web::server::AppServices;
use sqlx::SqlitePool;

/// Builds the full application (routes, session and tracing middleware)
/// around the given `AppServices`.
macro_rules! blog_app {
    ($services:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($services.session())
                .wrap(blog_web::presentation::middleware::RequestTracing)
                .configure(|cfg| $services.configure(cfg)),
        )
        .await
    };
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "sqlite::memory:".into(),
        database_max_connections: 1,
        secret_key: "integration-test-secret".into(),
        session_ttl_hours: 1,
        telegram: None,
    }
}

pub async fn setup() -> (AppServices, SqlitePool) {
    let pool = create_memory_pool().await.expect("in-memory database");
    run_migrations(&pool).await.expect("migrations");
    let services = AppServices::new(pool.clone(), &test_config()).expect("services");
    (services, pool)
}

pub async fn create_user(services: &AppServices, name: &str, email: &str) -> User {
    services
        .auth
        .register(name.into(), email.into(), "abcd".into())
        .await
        .expect("register user")
}

/// Session cookie as the browser would send it back after logging in.
pub fn session_for(services: &AppServices, user: &User) -> Cookie<'static> {
    let token = services.auth.issue_session(user).expect("session token");
    Cookie::new(SESSION_COOKIE, token)
}

pub async fn create_post(services: &AppServices, owner: &User, title: &str) -> i64 {
    services
        .posts
        .create_post(owner.id, &owner.name, post_form(title).into_draft())
        .await
        .expect("create post")
        .id
}

pub fn post_form(title: &str) -> PostForm {
    PostForm {
        title: title.into(),
        subtitle: "A subtitle".into(),
        img_url: "https://images.example.com/cover.jpg".into(),
        body: "<p>Some body text</p>".into(),
    }
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM \"{}\"", table))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub fn cookie_named<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}
