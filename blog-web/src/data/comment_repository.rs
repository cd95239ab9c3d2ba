use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError>;
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, DomainError>;
}

#[derive(Clone)]
pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (text, user_id, post_id)
            VALUES (?, ?, ?)
            RETURNING id, text, user_id, post_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.user_id)
        .bind(comment.post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(
            comment_id = comment.id,
            post_id = comment.post_id,
            user_id = comment.user_id,
            "comment created"
        );
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, DomainError> {
        sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.text, c.user_id, c.post_id,
                   u.name AS author_name, u.email AS author_email
            FROM comments c
            JOIN "user" u ON u.id = c.user_id
            WHERE c.post_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for post {}: {}", post_id, e);
            DomainError::Internal(e.to_string())
        })
    }
}
