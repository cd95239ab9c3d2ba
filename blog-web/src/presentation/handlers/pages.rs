use crate::domain::error::DomainError;
use crate::infrastructure::telegram::TelegramNotifier;
use crate::presentation::session::RequestContext;
use crate::presentation::views::Views;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::info;

use super::request_id;

const BOT_MESSAGE: &str = "Hello, myself!";

#[get("/about")]
pub async fn about(ctx: RequestContext, views: web::Data<Views>) -> Result<HttpResponse, DomainError> {
    views.render("about.html", &ctx.page())
}

#[get("/contact")]
pub async fn contact(
    ctx: RequestContext,
    views: web::Data<Views>,
) -> Result<HttpResponse, DomainError> {
    views.render("contact.html", &ctx.page())
}

#[get("/bot")]
pub async fn bot(
    req: HttpRequest,
    ctx: RequestContext,
    views: web::Data<Views>,
    notifier: web::Data<TelegramNotifier>,
) -> Result<HttpResponse, DomainError> {
    notifier.send(BOT_MESSAGE).await?;

    info!(request_id = %request_id(&req), "bot notification sent");

    let mut page = ctx.page();
    page.insert("message", BOT_MESSAGE);
    views.render("bot.html", &page)
}
