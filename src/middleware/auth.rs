use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::AppState;
use crate::auth::{self, SESSION_COOKIE};
use crate::database::models::User;
use crate::error::ApiError;

/// Authenticated user resolved from the session token, inserted by [`require_session`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Session gate: resolves the token (cookie first, then `Authorization: Bearer`)
/// to a live user and injects [`AuthUser`] into the request.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, request.headers())
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

    let claims = auth::verify_token(&token).map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        ApiError::unauthorized("Not authorized, token failed")
    })?;

    let user = state.store.find_user_by_id(claims.sub).await?.ok_or_else(|| {
        tracing::debug!("Session token references missing user {}", claims.sub);
        ApiError::unauthorized("Not authorized, user not found")
    })?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let auth_str = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
