use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub post_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user_id: i64,
    pub post_id: i64,
}

/// A comment joined with the name and email of whoever wrote it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub author_email: String,
}
