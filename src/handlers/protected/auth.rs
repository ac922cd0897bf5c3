// handlers/protected/auth.rs - GET /api/auth/me, POST /api/auth/logout

use axum::Extension;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::auth;
use crate::config;
use crate::database::models::UserView;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user: UserView,
}

/// GET /api/auth/me - the user resolved from the session
pub async fn me(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<CurrentUser> {
    Ok(ApiResponse::success(CurrentUser { user: UserView::from(user) }))
}

/// POST /api/auth/logout - clears the session cookie.
///
/// Tokens are not revoked server-side; a bearer token stays valid until it expires.
pub async fn logout(
    Extension(AuthUser(user)): Extension<AuthUser>,
    jar: CookieJar,
) -> (CookieJar, ApiResponse<()>) {
    tracing::debug!("User {} logged out", user.id);
    let jar = jar.add(auth::cleared_session_cookie(&config::config().security));
    (jar, ApiResponse::success(()).message("Logged out successfully"))
}
