use crate::domain::error::DomainError;
use crate::presentation::forms::{self, FieldErrors, LoginForm, RegisterForm};
use crate::presentation::session::{
    RequestContext, redirect_clearing_session, redirect_with_session,
};
use crate::presentation::views::Views;
use crate::server::BlogAuthService;
use actix_web::{HttpResponse, get, post, web};
use tracing::info;

const ALREADY_REGISTERED: &str = "You've already signed up with that email, login instead!";
const NOT_REGISTERED: &str = "You are not registered yet, register first!";
const BAD_CREDENTIALS: &str = "The password or email address is incorrect!";

fn render_register(
    ctx: &RequestContext,
    views: &Views,
    form: &RegisterForm,
    errors: &FieldErrors,
) -> Result<HttpResponse, DomainError> {
    let mut page = ctx.page();
    page.insert("form", form);
    page.insert("errors", errors);
    views.render("register.html", &page)
}

fn render_login(
    ctx: &RequestContext,
    views: &Views,
    form: &LoginForm,
    errors: &FieldErrors,
) -> Result<HttpResponse, DomainError> {
    let mut page = ctx.page();
    page.insert("form", form);
    page.insert("errors", errors);
    views.render("login.html", &page)
}

#[get("/register")]
pub async fn register_page(
    ctx: RequestContext,
    views: web::Data<Views>,
) -> Result<HttpResponse, DomainError> {
    render_register(&ctx, &views, &RegisterForm::default(), &FieldErrors::new())
}

#[post("/register")]
pub async fn register(
    ctx: RequestContext,
    views: web::Data<Views>,
    auth: web::Data<BlogAuthService>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, DomainError> {
    let form = form.into_inner().trimmed();
    if let Err(errors) = forms::check(&form) {
        return render_register(&ctx, &views, &form, &errors);
    }

    match auth.register(form.name, form.email, form.password).await {
        Ok(user) => {
            info!(user_id = user.id, email = %user.email, "user registered");
            let token = auth.issue_session(&user)?;
            Ok(redirect_with_session("/", token))
        }
        Err(DomainError::UserAlreadyExists(email)) => {
            info!(email = %email, "registration attempted with a known email");
            ctx.redirect_with_flash("/login", ALREADY_REGISTERED)
        }
        Err(err) => Err(err),
    }
}

#[get("/login")]
pub async fn login_page(
    ctx: RequestContext,
    views: web::Data<Views>,
) -> Result<HttpResponse, DomainError> {
    render_login(&ctx, &views, &LoginForm::default(), &FieldErrors::new())
}

#[post("/login")]
pub async fn login(
    ctx: RequestContext,
    views: web::Data<Views>,
    auth: web::Data<BlogAuthService>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, DomainError> {
    let form = form.into_inner().trimmed();
    if let Err(errors) = forms::check(&form) {
        return render_login(&ctx, &views, &form, &errors);
    }

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            info!(user_id = user.id, "user logged in");
            let token = auth.issue_session(&user)?;
            Ok(redirect_with_session("/", token))
        }
        Err(DomainError::UserNotRegistered(_)) => ctx.redirect_with_flash("/register", NOT_REGISTERED),
        Err(DomainError::InvalidCredentials) => ctx.redirect_with_flash("/login", BAD_CREDENTIALS),
        Err(err) => Err(err),
    }
}

#[get("/logout")]
pub async fn logout(ctx: RequestContext) -> Result<HttpResponse, DomainError> {
    let user = ctx.require_user()?;
    info!(user_id = user.id, "user logged out");
    Ok(redirect_clearing_session("/"))
}
