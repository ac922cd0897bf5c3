// handlers/public/courses.rs - public catalog

use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;

use crate::api::requests::CourseListQuery;
use crate::app::AppState;
use crate::database::models::Course;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CatalogService;

/// GET /api/courses?category=&status= - published courses, newest first
pub async fn list_courses(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CourseListQuery>, ApiError>,
) -> ApiResult<Vec<Course>> {
    let courses = CatalogService::new(state.store.clone()).list_published(query).await?;
    Ok(ApiResponse::success(courses))
}

/// GET /api/courses/:slug - a single published course
pub async fn get_course(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Course> {
    let course = CatalogService::new(state.store.clone()).get_published_by_slug(&slug).await?;
    Ok(ApiResponse::success(course))
}
