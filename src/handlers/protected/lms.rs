// handlers/protected/lms.rs - learner endpoints under /api/lms (plus /api/enroll/:courseId)
//
// Curriculum reads and progress writes go through the enrollment gate in
// LearningService; only super_admin skips it.

use axum::{extract::State, Extension};
use uuid::Uuid;

use crate::api::requests::{EnrollRequest, ProgressRequest};
use crate::api::{IdPath, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{Assignment, CourseSummary, Enrollment, Lesson, Module, Note, Progress, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{CourseProgress, LearningService};

fn service(state: &AppState) -> LearningService {
    LearningService::new(state.store.clone())
}

/// POST /api/lms/enroll `{ courseId }` - 201 on first enrollment, 200 "Already enrolled" after
pub async fn enroll(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<EnrollRequest>,
) -> ApiResult<Enrollment> {
    let course_id = req
        .course_id
        .ok_or_else(|| ApiError::invalid_field("courseId", "Course id is required"))?;
    enroll_in(&state, &user, course_id).await
}

/// POST /api/enroll/:courseId - path form of [`enroll`]
pub async fn enroll_by_path(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(course_id): IdPath,
) -> ApiResult<Enrollment> {
    enroll_in(&state, &user, course_id).await
}

async fn enroll_in(state: &AppState, user: &User, course_id: Uuid) -> ApiResult<Enrollment> {
    let enrollment = service(state).enroll(user, course_id).await?;
    let response = ApiResponse::created_if(enrollment.record, enrollment.created);
    Ok(if enrollment.created {
        response
    } else {
        response.message("Already enrolled")
    })
}

/// DELETE /api/lms/enroll/:courseId - marks the enrollment inactive
pub async fn unenroll(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(course_id): IdPath,
) -> ApiResult<Enrollment> {
    let enrollment = service(&state).unenroll(&user, course_id).await?;
    Ok(ApiResponse::success(enrollment).message("Unenrolled"))
}

/// GET /api/lms/my-courses
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<CourseSummary>> {
    Ok(ApiResponse::success(service(&state).my_courses(&user).await?))
}

/// GET /api/lms/course/:courseId/modules
pub async fn course_modules(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(course_id): IdPath,
) -> ApiResult<Vec<Module>> {
    Ok(ApiResponse::success(service(&state).course_modules(&user, course_id).await?))
}

/// GET /api/lms/module/:moduleId/lessons
pub async fn module_lessons(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(module_id): IdPath,
) -> ApiResult<Vec<Lesson>> {
    Ok(ApiResponse::success(service(&state).module_lessons(&user, module_id).await?))
}

/// GET /api/lms/module/:moduleId/assignments
pub async fn module_assignments(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(module_id): IdPath,
) -> ApiResult<Vec<Assignment>> {
    Ok(ApiResponse::success(service(&state).module_assignments(&user, module_id).await?))
}

/// GET /api/lms/module/:moduleId/notes
pub async fn module_notes(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(module_id): IdPath,
) -> ApiResult<Vec<Note>> {
    Ok(ApiResponse::success(service(&state).module_notes(&user, module_id).await?))
}

/// POST /api/lms/progress `{ lessonId, completed }` - 201 on first record, 200 on update
pub async fn post_progress(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<ProgressRequest>,
) -> ApiResult<Progress> {
    let lesson_id = req
        .lesson_id
        .ok_or_else(|| ApiError::invalid_field("lessonId", "Lesson id is required"))?;
    let progress = service(&state)
        .post_progress(&user, lesson_id, req.completed.unwrap_or(false))
        .await?;
    Ok(ApiResponse::created_if(progress.record, progress.created))
}

/// GET /api/lms/progress/:courseId - `{ lessons, progresses }`
pub async fn course_progress(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    IdPath(course_id): IdPath,
) -> ApiResult<CourseProgress> {
    Ok(ApiResponse::success(service(&state).course_progress(&user, course_id).await?))
}
