use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("no account registered for {0}")]
    UserNotRegistered(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("post not found: {0}")]
    PostNotFound(i64),
    #[error("a post titled {0:?} already exists")]
    PostTitleTaken(String),
    #[error("forbidden")]
    Forbidden,
    #[error("unauthorized")]
    Unauthorized,
    #[error("notifications are not configured")]
    NotificationsDisabled,
    #[error("notification failed: {0}")]
    Notification(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized
            | DomainError::InvalidCredentials
            | DomainError::UserNotRegistered(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::UserAlreadyExists(_) | DomainError::PostTitleTaken(_) => {
                StatusCode::CONFLICT
            }
            DomainError::NotificationsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Notification(_) => StatusCode::BAD_GATEWAY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal details stay in the logs.
        let message = match self {
            DomainError::Internal(_) => "something went wrong".to_string(),
            DomainError::Forbidden => "you do not have permission to manage posts".to_string(),
            other => other.to_string(),
        };
        let body = format!(
            "<!DOCTYPE html><html><head><title>{code}</title></head>\
             <body><h1>{code} {reason}</h1><p>{message}</p><a href=\"/\">Back to all posts</a></body></html>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            message = tera::escape_html(&message),
        );
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body)
    }
}
