// handlers/protected/users.rs - GET/PUT /api/users/me

use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::requests::UpdateProfileRequest;
use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::database::models::{User, UserView};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::IdentityService;
use crate::types::Role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

pub async fn get_profile(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<Profile> {
    Ok(ApiResponse::success(Profile::from(user)))
}

/// Only the display name is editable.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserView> {
    let updated = IdentityService::new(state.store.clone()).update_profile(user.id, req).await?;
    Ok(ApiResponse::success(UserView::from(updated)).message("Profile updated"))
}
