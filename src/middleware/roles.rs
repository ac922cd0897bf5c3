use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Role gate for admin routes; must run after [`super::require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let AuthUser(user) = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

    if !user.role.is_admin() {
        tracing::warn!("User {} ({}) denied admin access", user.id, user.role.as_str());
        return Err(ApiError::forbidden("Not authorized as an admin"));
    }

    Ok(next.run(request).await)
}
