use serde::Serialize;

/// Id of the only account allowed to manage posts.
pub const ADMIN_USER_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Post management is reserved to the first registered account.
pub fn is_admin(user_id: i64) -> bool {
    user_id == ADMIN_USER_ID
}

/// A user that has not been stored yet; the database assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
        }
    }
}

/// Emails are compared after trimming and lower-casing.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
