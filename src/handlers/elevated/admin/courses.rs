// handlers/elevated/admin/courses.rs - /api/admin/courses[/:id]
//
// Unlike the public catalog these see drafts too.

use axum::extract::{Query, State};
use axum_extra::extract::WithRejection;

use crate::api::requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest};
use crate::api::{IdPath, ValidatedJson};
use crate::app::AppState;
use crate::database::models::Course;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CatalogService;

pub async fn list_courses(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CourseListQuery>, ApiError>,
) -> ApiResult<Vec<Course>> {
    Ok(ApiResponse::success(CatalogService::new(state.store.clone()).list_all(query).await?))
}

pub async fn get_course(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Course> {
    Ok(ApiResponse::success(CatalogService::new(state.store.clone()).get(id).await?))
}

pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> ApiResult<Course> {
    let course = CatalogService::new(state.store.clone()).create(req).await?;
    Ok(ApiResponse::created(course))
}

pub async fn update_course(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateCourseRequest>,
) -> ApiResult<Course> {
    let course = CatalogService::new(state.store.clone()).update(id, req).await?;
    Ok(ApiResponse::success(course))
}

/// Deletes the course row only; see CatalogService::delete for orphaned modules
pub async fn delete_course(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<()> {
    CatalogService::new(state.store.clone()).delete(id).await?;
    Ok(ApiResponse::success(()).message("Course deleted"))
}
