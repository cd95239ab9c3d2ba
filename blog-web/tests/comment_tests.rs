#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use blog_web::infrastructure::gravatar::{DEFAULT_AVATAR_SIZE, gravatar_url};
use blog_web::presentation::session::FLASH_COOKIE;
use common::{cookie_named, count, create_post, create_user, location, session_for, setup};

fn comment_on(post_id: i64, text: &str) -> TestRequest {
    TestRequest::post()
        .uri(&format!("/post/{post_id}"))
        .set_form(vec![("comment", text)])
}

#[actix_web::test]
async fn anonymous_comment_redirects_to_login() {
    let (services, pool) = setup().await;
    let admin = create_user(&services, "Admin", "admin@x.com").await;
    let post_id = create_post(&services, &admin, "Open for comments").await;
    let app = blog_app!(services);

    let resp = test::call_service(&app, comment_on(post_id, "hi").to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp).as_deref(), Some("/login"));
    assert!(cookie_named(&resp, FLASH_COOKIE).is_some());
    assert_eq!(count(&pool, "comments").await, 0);
}

#[actix_web::test]
async fn logged_in_comment_is_shown_with_author_avatar() {
    let (services, pool) = setup().await;
    let admin = create_user(&services, "Admin", "admin@x.com").await;
    let reader = create_user(&services, "Reader", "Reader@X.com").await;
    let post_id = create_post(&services, &admin, "Open for comments").await;
    let session = session_for(&services, &reader);
    let app = blog_app!(services);

    let resp = test::call_service(
        &app,
        comment_on(post_id, "Nice <b>post</b>")
            .cookie(session)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), Some(format!("/post/{post_id}")));
    assert_eq!(count(&pool, "comments").await, 1);

    let page = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/post/{post_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = test::read_body(page).await;
    let body = String::from_utf8_lossy(&body);

    // Comment text is escaped, unlike the post body.
    assert!(body.contains("Nice &lt;b&gt;post&lt;&#x2F;b&gt;"));
    assert!(body.contains("<p>Some body text</p>"));
    assert!(body.contains("Reader"));
    assert!(body.contains(&gravatar_url("reader@x.com", DEFAULT_AVATAR_SIZE)));
}

#[actix_web::test]
async fn empty_comment_is_rejected_inline() {
    let (services, pool) = setup().await;
    let admin = create_user(&services, "Admin", "admin@x.com").await;
    let post_id = create_post(&services, &admin, "Open for comments").await;
    let session = session_for(&services, &admin);
    let app = blog_app!(services);

    let resp = test::call_service(
        &app,
        comment_on(post_id, "   ").cookie(session).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("write some comment"));
    assert_eq!(count(&pool, "comments").await, 0);
}

#[actix_web::test]
async fn commenting_on_a_missing_post_is_not_found() {
    let (services, pool) = setup().await;
    let reader = create_user(&services, "Reader", "reader@x.com").await;
    let session = session_for(&services, &reader);
    let app = blog_app!(services);

    let resp = test::call_service(&app, comment_on(42, "hello").cookie(session).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(count(&pool, "comments").await, 0);
}

#[actix_web::test]
async fn deleting_a_post_removes_its_comments() {
    let (services, pool) = setup().await;
    let admin = create_user(&services, "Admin", "admin@x.com").await;
    let post_id = create_post(&services, &admin, "Doomed").await;
    services
        .comments
        .add_comment(admin.id, post_id, "first".into())
        .await
        .unwrap();
    let session = session_for(&services, &admin);
    let app = blog_app!(services);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/delete/{post_id}"))
            .cookie(session)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(count(&pool, "comments").await, 0);
}
