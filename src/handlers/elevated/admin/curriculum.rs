// handlers/elevated/admin/curriculum.rs - /api/admin/{modules,lessons,assignments,notes}
//
// POST creates under the parent named in the body; GET /:parentId lists the
// children of a course (modules) or module (everything else). No enrollment gate.

use axum::extract::State;

use crate::api::requests::{CreateAssignmentRequest, CreateLessonRequest, CreateModuleRequest, CreateNoteRequest};
use crate::api::{IdPath, ValidatedJson};
use crate::app::AppState;
use crate::database::models::{Assignment, Lesson, Module, Note};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CurriculumService;

fn service(state: &AppState) -> CurriculumService {
    CurriculumService::new(state.store.clone())
}

pub async fn create_module(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateModuleRequest>,
) -> ApiResult<Module> {
    Ok(ApiResponse::created(service(&state).create_module(req).await?))
}

/// GET /api/admin/modules/:courseId
pub async fn list_modules(State(state): State<AppState>, IdPath(course_id): IdPath) -> ApiResult<Vec<Module>> {
    Ok(ApiResponse::success(service(&state).list_modules(course_id).await?))
}

pub async fn create_lesson(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateLessonRequest>,
) -> ApiResult<Lesson> {
    Ok(ApiResponse::created(service(&state).create_lesson(req).await?))
}

/// GET /api/admin/lessons/:moduleId
pub async fn list_lessons(State(state): State<AppState>, IdPath(module_id): IdPath) -> ApiResult<Vec<Lesson>> {
    Ok(ApiResponse::success(service(&state).list_lessons(module_id).await?))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAssignmentRequest>,
) -> ApiResult<Assignment> {
    Ok(ApiResponse::created(service(&state).create_assignment(req).await?))
}

/// GET /api/admin/assignments/:moduleId
pub async fn list_assignments(
    State(state): State<AppState>,
    IdPath(module_id): IdPath,
) -> ApiResult<Vec<Assignment>> {
    Ok(ApiResponse::success(service(&state).list_assignments(module_id).await?))
}

pub async fn create_note(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<Note> {
    Ok(ApiResponse::created(service(&state).create_note(req).await?))
}

/// GET /api/admin/notes/:moduleId
pub async fn list_notes(State(state): State<AppState>, IdPath(module_id): IdPath) -> ApiResult<Vec<Note>> {
    Ok(ApiResponse::success(service(&state).list_notes(module_id).await?))
}
