use std::sync::Arc;

use tracing::{debug, instrument};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, User, normalize_email};
use crate::infrastructure::security::{SessionKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService<R: UserRepository + 'static> {
    repo: Arc<R>,
    keys: SessionKeys,
}

impl<R> AuthService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repo: Arc<R>, keys: SessionKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Creates an account unless one already exists for the email.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, DomainError> {
        let email = normalize_email(&email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::UserAlreadyExists(email));
        }

        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo.create(NewUser::new(name, email, hash)).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::UserNotRegistered(email))?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub fn issue_session(&self, user: &User) -> Result<String, DomainError> {
        self.keys
            .issue_session(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// Resolves a session cookie to its user. Invalid or expired tokens and
    /// tokens for users that no longer exist resolve to `None`.
    pub async fn session_user(&self, token: &str) -> Result<Option<User>, DomainError> {
        let user_id = match self.keys.verify_session(token) {
            Ok(claims) => claims.user_id(),
            Err(err) => {
                debug!("rejected session token: {}", err);
                None
            }
        };
        match user_id {
            Some(id) => self.repo.find_by_id(id).await,
            None => Ok(None),
        }
    }
}
