use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{self, SecurityConfig};

/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Decode and verify a token; expiry is checked by the default validation.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::Invalid(e.to_string()))
}

/// Sign a session token for `user_id` with the configured secret and expiry.
pub fn issue_token(user_id: Uuid) -> Result<String, JwtError> {
    let security = &config::config().security;
    generate_jwt(&Claims::new(user_id, security.jwt_expiry_hours), &security.jwt_secret)
}

pub fn verify_token(token: &str) -> Result<Claims, JwtError> {
    validate_jwt(token, &config::config().security.jwt_secret)
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, PasswordError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;
    Ok(matched)
}

pub fn session_cookie(token: String, security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(security.require_https)
        .max_age(time::Duration::hours(security.jwt_expiry_hours as i64))
        .build()
}

/// Expired, empty cookie with the same attributes so browsers drop the session.
pub fn cleared_session_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(security.require_https)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = generate_jwt(&Claims::new(user_id, 720), SECRET).unwrap();
        let claims = validate_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 720 * 3600);
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), 1), SECRET).unwrap();
        assert!(matches!(validate_jwt(&token, "other"), Err(JwtError::Invalid(_))));
        assert!(matches!(validate_jwt("not.a.jwt", SECRET), Err(JwtError::Invalid(_))));
        assert!(matches!(generate_jwt(&Claims::new(Uuid::new_v4(), 1), ""), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn rejects_expired_token() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = generate_jwt(&claims, SECRET).unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("secret1".into(), 4).await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
        assert!(!verify_password("secret1".into(), "not-a-hash".into()).await.unwrap());
    }

    #[test]
    fn session_cookie_attributes() {
        let security = config::config().security.clone();
        let cookie = session_cookie("abc".into(), &security);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(720)));

        let cleared = cleared_session_cookie(&security);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    }
}
