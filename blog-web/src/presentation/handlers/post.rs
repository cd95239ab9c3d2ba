use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::presentation::forms::{self, CommentForm, FieldErrors, PostForm};
use crate::presentation::session::{RequestContext, redirect};
use crate::presentation::views::Views;
use crate::server::{BlogCommentService, BlogPostService};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use super::request_id;

const LOGIN_TO_COMMENT: &str = "You need to login or register to comment";
const TITLE_TAKEN: &str = "A post with this title already exists.";

#[get("/")]
pub async fn get_all_posts(
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
) -> Result<HttpResponse, DomainError> {
    let all_posts = posts.get_posts().await?;

    let mut page = ctx.page();
    page.insert("all_posts", &all_posts);
    views.render("index.html", &page)
}

async fn render_post(
    ctx: &RequestContext,
    views: &Views,
    comments: &BlogCommentService,
    post: &Post,
    form: &CommentForm,
    errors: &FieldErrors,
) -> Result<HttpResponse, DomainError> {
    let comments = comments.comments_for_post(post.id).await?;

    let mut page = ctx.page();
    page.insert("post", post);
    page.insert("comments", &comments);
    page.insert("form", form);
    page.insert("errors", errors);
    views.render("post.html", &page)
}

#[get("/post/{id}")]
pub async fn show_post(
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
    comments: web::Data<BlogCommentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    render_post(
        &ctx,
        &views,
        &comments,
        &post,
        &CommentForm::default(),
        &FieldErrors::new(),
    )
    .await
}

#[post("/post/{id}")]
pub async fn add_comment(
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
    comments: web::Data<BlogCommentService>,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;

    let form = form.into_inner().trimmed();
    if let Err(errors) = forms::check(&form) {
        return render_post(&ctx, &views, &comments, &post, &form, &errors).await;
    }

    let Some(user) = ctx.user.as_ref() else {
        return ctx.redirect_with_flash("/login", LOGIN_TO_COMMENT);
    };

    comments.add_comment(user.id, post.id, form.comment).await?;
    Ok(redirect(&format!("/post/{}", post.id)))
}

struct PostFormPage<'a> {
    action: String,
    is_edit: bool,
    form: &'a PostForm,
    errors: &'a FieldErrors,
}

fn render_post_form(
    ctx: &RequestContext,
    views: &Views,
    status: StatusCode,
    view: PostFormPage<'_>,
) -> Result<HttpResponse, DomainError> {
    let mut page = ctx.page();
    page.insert("action", &view.action);
    page.insert("is_edit", &view.is_edit);
    page.insert("form", view.form);
    page.insert("errors", view.errors);
    views.render_with_status(status, "make-post.html", &page)
}

/// Re-renders the form when the title collides with another post.
fn title_conflict(
    ctx: &RequestContext,
    views: &Views,
    action: String,
    is_edit: bool,
    form: &PostForm,
) -> Result<HttpResponse, DomainError> {
    let mut errors = FieldErrors::new();
    errors.insert("title".into(), TITLE_TAKEN.into());
    render_post_form(
        ctx,
        views,
        StatusCode::CONFLICT,
        PostFormPage {
            action,
            is_edit,
            form,
            errors: &errors,
        },
    )
}

#[get("/new-post")]
pub async fn new_post_page(
    ctx: RequestContext,
    views: web::Data<Views>,
) -> Result<HttpResponse, DomainError> {
    ctx.require_admin()?;
    render_post_form(
        &ctx,
        &views,
        StatusCode::OK,
        PostFormPage {
            action: "/new-post".into(),
            is_edit: false,
            form: &PostForm::default(),
            errors: &FieldErrors::new(),
        },
    )
}

#[post("/new-post")]
pub async fn add_new_post(
    req: HttpRequest,
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let admin = ctx.require_admin()?;

    let form = form.into_inner().trimmed();
    if let Err(errors) = forms::check(&form) {
        return render_post_form(
            &ctx,
            &views,
            StatusCode::OK,
            PostFormPage {
                action: "/new-post".into(),
                is_edit: false,
                form: &form,
                errors: &errors,
            },
        );
    }

    let created = match posts
        .create_post(admin.id, &admin.name, form.clone().into_draft())
        .await
    {
        Ok(post) => post,
        Err(DomainError::PostTitleTaken(_)) => {
            return title_conflict(&ctx, &views, "/new-post".into(), false, &form);
        }
        Err(err) => return Err(err),
    };

    info!(
        request_id = %request_id(&req),
        user_id = admin.id,
        post_id = created.id,
        "post created"
    );

    Ok(redirect("/"))
}

#[get("/edit-post/{id}")]
pub async fn edit_post_page(
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    ctx.require_admin()?;
    let post = posts.get_post(path.into_inner()).await?;

    render_post_form(
        &ctx,
        &views,
        StatusCode::OK,
        PostFormPage {
            action: format!("/edit-post/{}", post.id),
            is_edit: true,
            form: &PostForm::from(&post),
            errors: &FieldErrors::new(),
        },
    )
}

#[post("/edit-post/{id}")]
pub async fn edit_post(
    req: HttpRequest,
    ctx: RequestContext,
    views: web::Data<Views>,
    posts: web::Data<BlogPostService>,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let admin = ctx.require_admin()?;
    let post = posts.get_post(path.into_inner()).await?;
    let action = format!("/edit-post/{}", post.id);

    let form = form.into_inner().trimmed();
    if let Err(errors) = forms::check(&form) {
        return render_post_form(
            &ctx,
            &views,
            StatusCode::OK,
            PostFormPage {
                action,
                is_edit: true,
                form: &form,
                errors: &errors,
            },
        );
    }

    let updated = match posts.update_post(post.id, form.clone().into_draft()).await {
        Ok(post) => post,
        Err(DomainError::PostTitleTaken(_)) => {
            return title_conflict(&ctx, &views, action, true, &form);
        }
        Err(err) => return Err(err),
    };

    info!(
        request_id = %request_id(&req),
        user_id = admin.id,
        post_id = updated.id,
        "post updated"
    );

    Ok(redirect(&format!("/post/{}", updated.id)))
}

#[get("/delete/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    ctx: RequestContext,
    posts: web::Data<BlogPostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let admin = ctx.require_admin()?;
    let post_id = path.into_inner();

    posts.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = admin.id,
        post_id,
        "post deleted"
    );

    Ok(redirect("/"))
}
