use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostDraft};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: i64, draft: PostDraft) -> Result<Option<Post>, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, title: &str) -> DomainError {
    let unique_violation = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique_violation {
        DomainError::PostTitleTaken(title.to_string())
    } else {
        error!("failed to write post {:?}: {}", title, e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO blog_posts (author, title, subtitle, date, body, img_url, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, author, title, subtitle, date, body, img_url, user_id
            "#,
        )
        .bind(&post.author)
        .bind(&post.title)
        .bind(&post.subtitle)
        .bind(&post.date)
        .bind(&post.body)
        .bind(&post.img_url)
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &post.title))?;

        info!(post_id = post.id, user_id = post.user_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, title, subtitle, date, body, img_url, user_id
            FROM blog_posts WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(&self, id: i64, draft: PostDraft) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE blog_posts
            SET
                title = ?,
                subtitle = ?,
                img_url = ?,
                body = ?
            WHERE id = ?
            RETURNING id, author, title, subtitle, date, body, img_url, user_id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.img_url)
        .bind(&draft.body)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &draft.title))?;

        if post.is_some() {
            info!(post_id = id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let found = deleted.rows_affected() > 0;
        if found {
            info!(post_id = id, "post deleted");
        }
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, title, subtitle, date, body, img_url, user_id
            FROM blog_posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::{SqliteUserRepository, UserRepository};
    use crate::domain::user::{NewUser, User};
    use crate::infrastructure::database::{create_memory_pool, run_migrations};

    async fn setup() -> (SqlitePostRepository, User) {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let owner = SqliteUserRepository::new(pool.clone())
            .create(NewUser::new("Admin".into(), "admin@x.com".into(), "hash".into()))
            .await
            .unwrap();
        (SqlitePostRepository::new(pool), owner)
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            subtitle: "subtitle".into(),
            img_url: "https://example.com/img.png".into(),
            body: "<p>body</p>".into(),
        }
    }

    #[tokio::test]
    async fn create_then_list_in_id_order() {
        let (repo, owner) = setup().await;
        repo.create(NewPost::new(owner.id, &owner.name, draft("First"))).await.unwrap();
        repo.create(NewPost::new(owner.id, &owner.name, draft("Second"))).await.unwrap();

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn duplicate_title_is_a_uniqueness_violation() {
        let (repo, owner) = setup().await;
        repo.create(NewPost::new(owner.id, &owner.name, draft("Same"))).await.unwrap();

        let err = repo
            .create(NewPost::new(owner.id, &owner.name, draft("Same")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PostTitleTaken(title) if title == "Same"));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_editable_fields_only() {
        let (repo, owner) = setup().await;
        let created = repo.create(NewPost::new(owner.id, &owner.name, draft("Before"))).await.unwrap();

        let mut changes = draft("After");
        changes.body = "<p>new</p>".into();
        let updated = repo.update(created.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.body, "<p>new</p>");
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.date, created.date);
        assert!(repo.update(999, draft("Nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let (repo, owner) = setup().await;
        let created = repo.create(NewPost::new(owner.id, &owner.name, draft("Doomed"))).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}
