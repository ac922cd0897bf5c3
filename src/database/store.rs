use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::*;
use crate::types::{EnrollmentStatus, Role};

/// Result of an insert-or-update: the row as stored plus whether it was newly created.
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

/// Persistence boundary for every entity the service owns.
///
/// Implementations must honor the uniqueness invariants themselves: user email,
/// course slug, one enrollment per (user, course) and one progress row per
/// (user, lesson). Violations surface as [`DatabaseError::Conflict`].
/// Curriculum listings are ordered by `order` ascending, then creation time;
/// course listings newest first.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<Option<User>, DatabaseError>;
    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    // Catalog
    async fn insert_course(&self, course: NewCourse) -> Result<Course, DatabaseError>;
    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, DatabaseError>;
    async fn find_course_by_slug(&self, slug: &str) -> Result<Option<Course>, DatabaseError>;
    async fn list_courses(&self, filter: CourseFilter) -> Result<Vec<Course>, DatabaseError>;
    async fn list_courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, DatabaseError>;
    async fn update_course(&self, id: Uuid, changes: CourseChanges) -> Result<Option<Course>, DatabaseError>;
    /// Removes the course row only; curriculum rows are left in place.
    async fn delete_course(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Curriculum
    async fn insert_module(&self, module: NewModule) -> Result<Module, DatabaseError>;
    async fn find_module(&self, id: Uuid) -> Result<Option<Module>, DatabaseError>;
    async fn list_modules(&self, course_id: Uuid) -> Result<Vec<Module>, DatabaseError>;

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, DatabaseError>;
    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, DatabaseError>;
    async fn list_lessons(&self, module_ids: &[Uuid]) -> Result<Vec<Lesson>, DatabaseError>;

    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, DatabaseError>;
    async fn list_assignments(&self, module_id: Uuid) -> Result<Vec<Assignment>, DatabaseError>;

    async fn insert_note(&self, note: NewNote) -> Result<Note, DatabaseError>;
    async fn list_notes(&self, module_id: Uuid) -> Result<Vec<Note>, DatabaseError>;

    // Enrollment ledger
    async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>, DatabaseError>;
    /// Creates an active enrollment or reactivates the existing one.
    async fn activate_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Upserted<Enrollment>, DatabaseError>;
    async fn set_enrollment_status(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, DatabaseError>;
    async fn list_active_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, DatabaseError>;

    // Progress ledger
    async fn upsert_progress(&self, user_id: Uuid, lesson_id: Uuid, completed: bool) -> Result<Upserted<Progress>, DatabaseError>;
    async fn list_progress(&self, user_id: Uuid, lesson_ids: &[Uuid]) -> Result<Vec<Progress>, DatabaseError>;
}

pub type SharedStore = Arc<dyn Store>;
