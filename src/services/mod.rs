pub mod catalog_service;
pub mod curriculum_service;
pub mod identity_service;
pub mod learning_service;

pub use catalog_service::CatalogService;
pub use curriculum_service::CurriculumService;
pub use identity_service::{IdentityService, Session};
pub use learning_service::{CourseProgress, LearningService};

use crate::auth::{JwtError, PasswordError};
use crate::database::DatabaseError;

/// Business-rule failures shared by every service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No valid session")]
    Unauthenticated,

    #[error("Not enrolled in this course")]
    NotEnrolled,

    /// Carries the entity name, e.g. `"Course"`
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Trimmed, non-empty text or a field error
pub(crate) fn required_text(value: Option<String>, field: &'static str, message: &str) -> Result<String, ServiceError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::validation(field, message)),
    }
}

/// Optional text, trimmed; blank becomes `None`
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text(Some("  Ana ".into()), "name", "Name is required").unwrap(), "Ana");
        assert!(matches!(
            required_text(Some("   ".into()), "name", "Name is required"),
            Err(ServiceError::Validation { field: "name", .. })
        ));
        assert!(required_text(None, "name", "Name is required").is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some(" ".into())), None);
        assert_eq!(optional_text(Some(" x ".into())).as_deref(), Some("x"));
    }
}
