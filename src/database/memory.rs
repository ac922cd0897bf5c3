use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::curriculum::curriculum_sort_key;
use super::models::*;
use super::store::{Store, Upserted};
use crate::types::{EnrollmentStatus, Role};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    courses: Vec<Course>,
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
    assignments: Vec<Assignment>,
    notes: Vec<Note>,
    enrollments: Vec<Enrollment>,
    progress: Vec<Progress>,
}

/// In-process store used with `DATABASE_BACKEND=memory` and by the test suites.
/// Rows are kept in insertion order; listings sort on read.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut courses: Vec<Course>) -> Vec<Course> {
    // reverse first so equal timestamps keep "last inserted first"
    courses.reverse();
    courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    courses
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("users_email_key".into()));
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.to_string();
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.role = role;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.courses.iter().any(|c| c.slug == course.slug) {
            return Err(DatabaseError::Conflict("courses_slug_key".into()));
        }
        let now = Utc::now();
        let row = Course {
            id: Uuid::new_v4(),
            title: course.title,
            slug: course.slug,
            category: course.category,
            description: course.description,
            short_description: course.short_description,
            thumbnail_image: course.thumbnail_image,
            preview_video_url: course.preview_video_url,
            price: course.price,
            status: course.status,
            created_at: now,
            updated_at: now,
        };
        tables.courses.push(row.clone());
        Ok(row)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn find_course_by_slug(&self, slug: &str) -> Result<Option<Course>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_courses(&self, filter: CourseFilter) -> Result<Vec<Course>, DatabaseError> {
        let tables = self.tables.read().await;
        let rows = tables.courses.iter().filter(|c| filter.matches(c)).cloned().collect();
        Ok(newest_first(rows))
    }

    async fn list_courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, DatabaseError> {
        let tables = self.tables.read().await;
        let rows = tables.courses.iter().filter(|c| ids.contains(&c.id)).cloned().collect();
        Ok(newest_first(rows))
    }

    async fn update_course(&self, id: Uuid, changes: CourseChanges) -> Result<Option<Course>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(slug) = &changes.slug {
            if tables.courses.iter().any(|c| c.id != id && &c.slug == slug) {
                return Err(DatabaseError::Conflict("courses_slug_key".into()));
            }
        }
        Ok(tables.courses.iter_mut().find(|c| c.id == id).map(|course| {
            changes.apply_to(course);
            course.updated_at = Utc::now();
            course.clone()
        }))
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.courses.len();
        tables.courses.retain(|c| c.id != id);
        Ok(tables.courses.len() != before)
    }

    async fn insert_module(&self, module: NewModule) -> Result<Module, DatabaseError> {
        let now = Utc::now();
        let row = Module {
            id: Uuid::new_v4(),
            title: module.title,
            course_id: module.course_id,
            order: module.order,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.modules.push(row.clone());
        Ok(row)
    }

    async fn find_module(&self, id: Uuid) -> Result<Option<Module>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.modules.iter().find(|m| m.id == id).cloned())
    }

    async fn list_modules(&self, course_id: Uuid) -> Result<Vec<Module>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Module> = tables.modules.iter().filter(|m| m.course_id == course_id).cloned().collect();
        rows.sort_by_key(|m| curriculum_sort_key(m.order, m.created_at));
        Ok(rows)
    }

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, DatabaseError> {
        let now = Utc::now();
        let row = Lesson {
            id: Uuid::new_v4(),
            title: lesson.title,
            module_id: lesson.module_id,
            lesson_type: lesson.lesson_type,
            video_url: lesson.video_url,
            assignment_description: lesson.assignment_description,
            order: lesson.order,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.lessons.push(row.clone());
        Ok(row)
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn list_lessons(&self, module_ids: &[Uuid]) -> Result<Vec<Lesson>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Lesson> = tables
            .lessons
            .iter()
            .filter(|l| module_ids.contains(&l.module_id))
            .cloned()
            .collect();
        rows.sort_by_key(|l| curriculum_sort_key(l.order, l.created_at));
        Ok(rows)
    }

    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, DatabaseError> {
        let now = Utc::now();
        let row = Assignment {
            id: Uuid::new_v4(),
            title: assignment.title,
            module_id: assignment.module_id,
            description: assignment.description,
            due_date: assignment.due_date,
            order: assignment.order,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.assignments.push(row.clone());
        Ok(row)
    }

    async fn list_assignments(&self, module_id: Uuid) -> Result<Vec<Assignment>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Assignment> = tables.assignments.iter().filter(|a| a.module_id == module_id).cloned().collect();
        rows.sort_by_key(|a| curriculum_sort_key(a.order, a.created_at));
        Ok(rows)
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let now = Utc::now();
        let row = Note {
            id: Uuid::new_v4(),
            title: note.title,
            module_id: note.module_id,
            content: note.content,
            order: note.order,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.notes.push(row.clone());
        Ok(row)
    }

    async fn list_notes(&self, module_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Note> = tables.notes.iter().filter(|n| n.module_id == module_id).cloned().collect();
        rows.sort_by_key(|n| curriculum_sort_key(n.order, n.created_at));
        Ok(rows)
    }

    async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn activate_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Upserted<Enrollment>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        if let Some(existing) = tables
            .enrollments
            .iter_mut()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
        {
            if !existing.is_active() {
                existing.status = EnrollmentStatus::Active;
                existing.updated_at = now;
            }
            return Ok(Upserted { record: existing.clone(), created: false });
        }
        let row = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            status: EnrollmentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.enrollments.push(row.clone());
        Ok(Upserted { record: row, created: true })
    }

    async fn set_enrollment_status(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .enrollments
            .iter_mut()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .map(|e| {
                e.status = status;
                e.updated_at = Utc::now();
                e.clone()
            }))
    }

    async fn list_active_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id && e.is_active())
            .cloned()
            .collect())
    }

    async fn upsert_progress(&self, user_id: Uuid, lesson_id: Uuid, completed: bool) -> Result<Upserted<Progress>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        if let Some(existing) = tables
            .progress
            .iter_mut()
            .find(|p| p.user_id == user_id && p.lesson_id == lesson_id)
        {
            existing.completed = completed;
            existing.updated_at = now;
            return Ok(Upserted { record: existing.clone(), created: false });
        }
        let row = Progress {
            id: Uuid::new_v4(),
            user_id,
            lesson_id,
            completed,
            created_at: now,
            updated_at: now,
        };
        tables.progress.push(row.clone());
        Ok(Upserted { record: row, created: true })
    }

    async fn list_progress(&self, user_id: Uuid, lesson_ids: &[Uuid]) -> Result<Vec<Progress>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .progress
            .iter()
            .filter(|p| p.user_id == user_id && lesson_ids.contains(&p.lesson_id))
            .cloned()
            .collect())
    }
}
