use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Flash messages only need to survive one redirect.
const FLASH_TTL_MINUTES: i64 = 5;

/// Signs and verifies the tokens stored in the session and flash cookies.
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    session_ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: String, session_ttl_hours: i64) -> Self {
        Self {
            secret,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    pub fn issue_session(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: (now + self.session_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        self.sign(&claims)
    }

    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        self.verify(token)
    }

    pub fn seal_flash(&self, messages: &[String]) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = FlashClaims {
            messages: messages.to_vec(),
            exp: (Utc::now() + Duration::minutes(FLASH_TTL_MINUTES)).timestamp() as usize,
        };
        self.sign(&claims)
    }

    /// Tampered or expired flash cookies are silently dropped.
    pub fn open_flash(&self, token: &str) -> Vec<String> {
        self.verify::<FlashClaims>(token)
            .map(|claims| claims.messages)
            .unwrap_or_default()
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, jsonwebtoken::errors::Error> {
        let data = decode::<T>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    messages: Vec<String>,
    exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}
