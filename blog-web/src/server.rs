use std::sync::Arc;

use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use sqlx::SqlitePool;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::comment_repository::SqliteCommentRepository;
use crate::data::post_repository::SqlitePostRepository;
use crate::data::user_repository::SqliteUserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::security::SessionKeys;
use crate::infrastructure::telegram::TelegramNotifier;
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestTracing, SessionMiddleware};
use crate::presentation::views::Views;

pub type BlogAuthService = AuthService<SqliteUserRepository>;
pub type BlogPostService = PostService<SqlitePostRepository>;
pub type BlogCommentService = CommentService<SqliteCommentRepository, SqlitePostRepository>;

/// Post bodies are rich text and easily outgrow actix's 16 KiB form default.
pub const FORM_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Everything the handlers need, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: BlogAuthService,
    pub posts: BlogPostService,
    pub comments: BlogCommentService,
    pub keys: SessionKeys,
    pub views: Views,
    pub notifier: TelegramNotifier,
}

impl AppServices {
    pub fn new(pool: SqlitePool, config: &AppConfig) -> anyhow::Result<Self> {
        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let post_repo = Arc::new(SqlitePostRepository::new(pool.clone()));
        let comment_repo = Arc::new(SqliteCommentRepository::new(pool));

        let keys = SessionKeys::new(config.secret_key.clone(), config.session_ttl_hours);

        Ok(Self {
            auth: AuthService::new(user_repo, keys.clone()),
            posts: PostService::new(Arc::clone(&post_repo)),
            comments: CommentService::new(comment_repo, post_repo),
            keys,
            views: Views::new()?,
            notifier: TelegramNotifier::new(config.telegram.clone()),
        })
    }

    /// Registers shared state and every route. The session middleware has to
    /// be wrapped around the app separately, see [`AppServices::session`].
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT_BYTES))
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.comments.clone()))
            .app_data(web::Data::new(self.keys.clone()))
            .app_data(web::Data::new(self.views.clone()))
            .app_data(web::Data::new(self.notifier.clone()))
            .service(handlers::post::get_all_posts)
            .service(handlers::auth::register_page)
            .service(handlers::auth::register)
            .service(handlers::auth::login_page)
            .service(handlers::auth::login)
            .service(handlers::auth::logout)
            .service(handlers::post::show_post)
            .service(handlers::post::add_comment)
            .service(handlers::pages::about)
            .service(handlers::pages::contact)
            .service(handlers::post::new_post_page)
            .service(handlers::post::add_new_post)
            .service(handlers::post::edit_post_page)
            .service(handlers::post::edit_post)
            .service(handlers::post::delete_post)
            .service(handlers::pages::bot);
    }

    pub fn session(&self) -> SessionMiddleware<SqliteUserRepository> {
        SessionMiddleware::new(self.auth.clone())
    }
}

pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;

    let services = AppServices::new(pool, &config)?;
    if !services.notifier.is_configured() {
        info!("telegram is not configured, /bot will answer 503");
    }

    let bind_address = (config.host.clone(), config.port);
    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(services.session())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(RequestTracing)
            .wrap(Logger::default())
            .configure(|cfg| services.configure(cfg))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}
