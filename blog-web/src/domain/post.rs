use chrono::Local;
use serde::Serialize;

/// Display format of `Post::date`, e.g. "October 16, 2026".
pub const POST_DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub user_id: i64,
}

/// Editable fields of a post, as submitted through the post form.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub user_id: i64,
}

impl NewPost {
    /// Stamps a draft with its owner and today's date. The author name is
    /// copied so listings don't need to resolve the owner.
    pub fn new(user_id: i64, author: &str, draft: PostDraft) -> Self {
        Self {
            author: author.to_string(),
            title: draft.title,
            subtitle: draft.subtitle,
            date: Local::now().format(POST_DATE_FORMAT).to_string(),
            body: draft.body,
            img_url: draft.img_url,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_copies_owner_name_and_stamps_date() {
        let draft = PostDraft {
            title: "Title".into(),
            subtitle: "Sub".into(),
            img_url: "https://example.com/a.png".into(),
            body: "<p>Hi</p>".into(),
        };

        let post = NewPost::new(1, "Angela", draft);

        assert_eq!(post.author, "Angela");
        assert_eq!(post.user_id, 1);
        assert_eq!(post.date, Local::now().format(POST_DATE_FORMAT).to_string());
    }
}
