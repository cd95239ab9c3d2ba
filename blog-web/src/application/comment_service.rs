use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::error::DomainError;
use tracing::instrument;

#[derive(Clone)]
pub struct CommentService<C: CommentRepository + 'static, P: PostRepository + 'static> {
    comments: Arc<C>,
    posts: Arc<P>,
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository + 'static,
    P: PostRepository + 'static,
{
    pub fn new(comments: Arc<C>, posts: Arc<P>) -> Self {
        Self { comments, posts }
    }

    pub async fn comments_for_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        user_id: i64,
        post_id: i64,
        text: String,
    ) -> Result<Comment, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id));
        }
        self.comments
            .create(NewComment {
                text,
                user_id,
                post_id,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::comment_repository::SqliteCommentRepository;
    use crate::data::post_repository::SqlitePostRepository;
    use crate::data::user_repository::{SqliteUserRepository, UserRepository};
    use crate::domain::user::NewUser;
    use crate::infrastructure::database::{create_memory_pool, run_migrations};

    #[tokio::test]
    async fn refuses_comments_on_missing_posts() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let user = SqliteUserRepository::new(pool.clone())
            .create(NewUser::new("A".into(), "a@x.com".into(), "h".into()))
            .await
            .unwrap();
        let service = CommentService::new(
            Arc::new(SqliteCommentRepository::new(pool.clone())),
            Arc::new(SqlitePostRepository::new(pool)),
        );

        let err = service
            .add_comment(user.id, 7, "hello".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(7)));
        assert!(service.comments_for_post(7).await.unwrap().is_empty());
    }
}
