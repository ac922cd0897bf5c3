// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::api::requests::{LoginRequest, RegisterRequest};
use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::auth;
use crate::config;
use crate::database::models::UserView;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::{IdentityService, Session};

#[derive(Debug, Serialize)]
pub struct SessionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserView,
}

/// POST /api/auth/register - create a student account and start a session
///
/// Input: `{ "name", "email", "password" }` (password at least 6 characters)
/// Output: 201 `{ success, data: { token, user } }` plus the session cookie
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(CookieJar, ApiResponse<SessionBody>), ApiError> {
    let session = IdentityService::new(state.store.clone()).register(req).await?;
    let (jar, body) = deliver(jar, session);
    Ok((jar, ApiResponse::created(body)))
}

/// POST /api/auth/login - exchange credentials for a session
///
/// Unknown email and wrong password both answer 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<SessionBody>), ApiError> {
    let session = IdentityService::new(state.store.clone()).login(req).await?;
    let (jar, body) = deliver(jar, session);
    Ok((jar, ApiResponse::success(body)))
}

/// Places the token on the channels enabled by `security.token_delivery`.
fn deliver(jar: CookieJar, session: Session) -> (CookieJar, SessionBody) {
    let security = &config::config().security;
    let delivery = security.token_delivery;

    let jar = if delivery.cookie {
        jar.add(auth::session_cookie(session.token.clone(), security))
    } else {
        jar
    };

    let body = SessionBody {
        token: delivery.body.then_some(session.token),
        user: UserView::from(session.user),
    };
    (jar, body)
}
