use std::collections::HashMap;
use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::error;

use crate::domain::error::DomainError;
use crate::infrastructure::gravatar::{DEFAULT_AVATAR_SIZE, gravatar_url};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("post.html", include_str!("../../templates/post.html")),
    ("make-post.html", include_str!("../../templates/make-post.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("about.html", include_str!("../../templates/about.html")),
    ("contact.html", include_str!("../../templates/contact.html")),
    ("bot.html", include_str!("../../templates/bot.html")),
];

/// Marks responses rendered from a page template. Those show pending flash
/// messages, so the session middleware can drop the flash cookie.
#[derive(Debug, Clone, Copy)]
pub struct RenderedPage;

/// Page templates, compiled once at startup and shared by all workers.
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.register_function("gravatar_url", gravatar_function);
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn render(&self, name: &str, ctx: &Context) -> Result<HttpResponse, DomainError> {
        self.render_with_status(StatusCode::OK, name, ctx)
    }

    pub fn render_with_status(
        &self,
        status: StatusCode,
        name: &str,
        ctx: &Context,
    ) -> Result<HttpResponse, DomainError> {
        let body = self.tera.render(name, ctx).map_err(|e| {
            error!("failed to render {}: {:?}", name, e);
            DomainError::Internal(format!("template error: {}", e))
        })?;
        let mut response = HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body);
        response.extensions_mut().insert(RenderedPage);
        Ok(response)
    }
}

fn gravatar_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let email = args
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("gravatar_url expects a string `email` argument"))?;
    let size = args
        .get("size")
        .and_then(Value::as_u64)
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(DEFAULT_AVATAR_SIZE);
    Ok(Value::String(gravatar_url(email, size)))
}
