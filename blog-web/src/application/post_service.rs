use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostDraft};
use tracing::instrument;

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_all().await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_post(
        &self,
        user_id: i64,
        author: &str,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        self.repo.create(NewPost::new(user_id, author, draft)).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_post(&self, post_id: i64, draft: PostDraft) -> Result<Post, DomainError> {
        self.repo
            .update(post_id, draft)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: i64) -> Result<(), DomainError> {
        if self.repo.delete(post_id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }
}
