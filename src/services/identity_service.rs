use uuid::Uuid;

use super::{required_text, ServiceError};
use crate::api::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::auth;
use crate::config;
use crate::database::models::{NewUser, User};
use crate::database::SharedStore;
use crate::types::Role;

/// Result of a successful register/login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Registration, login and profile updates
pub struct IdentityService {
    store: SharedStore,
}

impl IdentityService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a student account and sign a session for it
    pub async fn register(&self, req: RegisterRequest) -> Result<Session, ServiceError> {
        let security = &config::config().security;

        let name = required_text(req.name, "name", "Name is required")?;
        let email = normalize_email(required_text(req.email, "email", "Email is required")?);
        let password = req.password.unwrap_or_default();
        if password.is_empty() {
            return Err(ServiceError::validation("password", "Password is required"));
        }
        if password.chars().count() < security.min_password_length {
            return Err(ServiceError::validation(
                "password",
                format!("Password must be at least {} characters long", security.min_password_length),
            ));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let password_hash = auth::hash_password(password, security.bcrypt_cost).await?;
        let user = self
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                role: Role::Student,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);
        let token = auth::issue_token(user.id)?;
        Ok(Session { token, user })
    }

    /// Unknown email and wrong password fail identically
    pub async fn login(&self, req: LoginRequest) -> Result<Session, ServiceError> {
        let email = normalize_email(required_text(req.email, "email", "Email is required")?);
        let password = req.password.unwrap_or_default();
        if password.is_empty() {
            return Err(ServiceError::validation("password", "Password is required"));
        }

        let user = match self.store.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login failed: no account for {}", email);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !auth::verify_password(password, user.password_hash.clone()).await? {
            tracing::debug!("Login failed: wrong password for {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = auth::issue_token(user.id)?;
        Ok(Session { token, user })
    }

    pub async fn update_profile(&self, user_id: Uuid, req: UpdateProfileRequest) -> Result<User, ServiceError> {
        let name = required_text(req.name, "name", "Name is required")?;
        self.store
            .update_user_name(user_id, &name)
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }
}

pub(crate) fn normalize_email(email: String) -> String {
    email.trim().to_lowercase()
}
