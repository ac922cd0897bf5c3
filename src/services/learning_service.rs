use serde::Serialize;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{Assignment, CourseSummary, Enrollment, Lesson, Module, Note, Progress, User};
use crate::database::{SharedStore, Upserted};
use crate::types::EnrollmentStatus;

/// Every lesson of a course next to the caller's progress rows for them
#[derive(Debug, Clone, Serialize)]
pub struct CourseProgress {
    pub lessons: Vec<Lesson>,
    pub progresses: Vec<Progress>,
}

/// Learner-facing enrollment, curriculum reads and progress tracking.
///
/// Every curriculum read resolves the owning course first and then requires an
/// active enrollment, unless the caller is a super admin.
pub struct LearningService {
    store: SharedStore,
}

impl LearningService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Creates an active enrollment or reactivates an inactive one
    pub async fn enroll(&self, user: &User, course_id: Uuid) -> Result<Upserted<Enrollment>, ServiceError> {
        if self.store.find_course(course_id).await?.is_none() {
            return Err(ServiceError::NotFound("Course"));
        }

        let enrollment = self.store.activate_enrollment(user.id, course_id).await?;
        if enrollment.created {
            tracing::info!("User {} enrolled in course {}", user.id, course_id);
        }
        Ok(enrollment)
    }

    pub async fn unenroll(&self, user: &User, course_id: Uuid) -> Result<Enrollment, ServiceError> {
        let enrollment = self
            .store
            .set_enrollment_status(user.id, course_id, EnrollmentStatus::Inactive)
            .await?
            .ok_or(ServiceError::NotFound("Enrollment"))?;
        tracing::info!("User {} unenrolled from course {}", user.id, course_id);
        Ok(enrollment)
    }

    pub async fn my_courses(&self, user: &User) -> Result<Vec<CourseSummary>, ServiceError> {
        let course_ids: Vec<Uuid> = self
            .store
            .list_active_enrollments(user.id)
            .await?
            .into_iter()
            .map(|e| e.course_id)
            .collect();
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let courses = self.store.list_courses_by_ids(&course_ids).await?;
        Ok(courses.into_iter().map(CourseSummary::from).collect())
    }

    pub async fn course_modules(&self, user: &User, course_id: Uuid) -> Result<Vec<Module>, ServiceError> {
        self.existing_course(course_id).await?;
        self.ensure_access(user, course_id).await?;
        Ok(self.store.list_modules(course_id).await?)
    }

    pub async fn module_lessons(&self, user: &User, module_id: Uuid) -> Result<Vec<Lesson>, ServiceError> {
        let module = self.accessible_module(user, module_id).await?;
        Ok(self.store.list_lessons(&[module.id]).await?)
    }

    pub async fn module_assignments(&self, user: &User, module_id: Uuid) -> Result<Vec<Assignment>, ServiceError> {
        let module = self.accessible_module(user, module_id).await?;
        Ok(self.store.list_assignments(module.id).await?)
    }

    pub async fn module_notes(&self, user: &User, module_id: Uuid) -> Result<Vec<Note>, ServiceError> {
        let module = self.accessible_module(user, module_id).await?;
        Ok(self.store.list_notes(module.id).await?)
    }

    /// Lesson -> module -> course, then the enrollment gate, then a single upsert
    pub async fn post_progress(
        &self,
        user: &User,
        lesson_id: Uuid,
        completed: bool,
    ) -> Result<Upserted<Progress>, ServiceError> {
        let lesson = self
            .store
            .find_lesson(lesson_id)
            .await?
            .ok_or(ServiceError::NotFound("Lesson"))?;
        self.accessible_module(user, lesson.module_id).await?;

        Ok(self.store.upsert_progress(user.id, lesson.id, completed).await?)
    }

    pub async fn course_progress(&self, user: &User, course_id: Uuid) -> Result<CourseProgress, ServiceError> {
        self.existing_course(course_id).await?;
        self.ensure_access(user, course_id).await?;

        let module_ids: Vec<Uuid> = self.store.list_modules(course_id).await?.into_iter().map(|m| m.id).collect();
        let lessons = if module_ids.is_empty() {
            Vec::new()
        } else {
            self.store.list_lessons(&module_ids).await?
        };
        let lesson_ids: Vec<Uuid> = lessons.iter().map(|l| l.id).collect();
        let progresses = if lesson_ids.is_empty() {
            Vec::new()
        } else {
            self.store.list_progress(user.id, &lesson_ids).await?
        };

        Ok(CourseProgress { lessons, progresses })
    }

    async fn existing_course(&self, course_id: Uuid) -> Result<(), ServiceError> {
        match self.store.find_course(course_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound("Course")),
        }
    }

    async fn accessible_module(&self, user: &User, module_id: Uuid) -> Result<Module, ServiceError> {
        let module = self
            .store
            .find_module(module_id)
            .await?
            .ok_or(ServiceError::NotFound("Module"))?;
        self.ensure_access(user, module.course_id).await?;
        Ok(module)
    }

    async fn ensure_access(&self, user: &User, course_id: Uuid) -> Result<(), ServiceError> {
        if user.role.bypasses_enrollment() {
            return Ok(());
        }

        match self.store.find_enrollment(user.id, course_id).await? {
            Some(enrollment) if enrollment.is_active() => Ok(()),
            _ => {
                tracing::warn!("User {} denied access to course {}: not enrolled", user.id, course_id);
                Err(ServiceError::NotEnrolled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewCourse, NewLesson, NewModule, NewUser};
    use crate::database::{MemoryStore, Store};
    use crate::types::{CourseCategory, CourseStatus, LessonType, Role};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        svc: LearningService,
        student: User,
        course_id: Uuid,
        module_id: Uuid,
        lesson_id: Uuid,
    }

    async fn user(store: &MemoryStore, email: &str, role: Role) -> User {
        store
            .insert_user(NewUser {
                name: "Test".into(),
                email: email.into(),
                password_hash: "hash".into(),
                role,
            })
            .await
            .unwrap()
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let student = user(&store, "student@x.com", Role::Student).await;
        let course = store
            .insert_course(NewCourse {
                title: "Intro to Python".into(),
                slug: "intro-py".into(),
                category: CourseCategory::Program,
                description: "d".into(),
                short_description: "s".into(),
                thumbnail_image: None,
                preview_video_url: None,
                price: Decimal::ZERO,
                status: CourseStatus::Published,
            })
            .await
            .unwrap();
        let module = store
            .insert_module(NewModule { title: "M1".into(), course_id: course.id, order: 0 })
            .await
            .unwrap();
        let lesson = store
            .insert_lesson(NewLesson {
                title: "L1".into(),
                module_id: module.id,
                lesson_type: LessonType::Video,
                video_url: Some("https://cdn.example.com/l1.mp4".into()),
                assignment_description: None,
                order: 0,
            })
            .await
            .unwrap();

        Fixture {
            svc: LearningService::new(store.clone()),
            store,
            student,
            course_id: course.id,
            module_id: module.id,
            lesson_id: lesson.id,
        }
    }

    #[tokio::test]
    async fn enroll_twice_keeps_one_active_enrollment() {
        let f = fixture().await;
        assert!(f.svc.enroll(&f.student, f.course_id).await.unwrap().created);
        assert!(!f.svc.enroll(&f.student, f.course_id).await.unwrap().created);

        let active = f.store.list_active_enrollments(f.student.id).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(f.svc.my_courses(&f.student).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn enroll_in_unknown_course_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.enroll(&f.student, Uuid::new_v4()).await,
            Err(ServiceError::NotFound("Course"))
        ));
    }

    #[tokio::test]
    async fn curriculum_reads_require_enrollment() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.course_modules(&f.student, f.course_id).await,
            Err(ServiceError::NotEnrolled)
        ));
        assert!(matches!(
            f.svc.module_lessons(&f.student, f.module_id).await,
            Err(ServiceError::NotEnrolled)
        ));
        assert!(matches!(
            f.svc.module_notes(&f.student, Uuid::new_v4()).await,
            Err(ServiceError::NotFound("Module"))
        ));

        f.svc.enroll(&f.student, f.course_id).await.unwrap();
        let lessons = f.svc.module_lessons(&f.student, f.module_id).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].id, f.lesson_id);
    }

    #[tokio::test]
    async fn unenroll_revokes_access_and_reenroll_restores_it() {
        let f = fixture().await;
        f.svc.enroll(&f.student, f.course_id).await.unwrap();
        f.svc.unenroll(&f.student, f.course_id).await.unwrap();
        assert!(f.svc.my_courses(&f.student).await.unwrap().is_empty());
        assert!(matches!(
            f.svc.module_assignments(&f.student, f.module_id).await,
            Err(ServiceError::NotEnrolled)
        ));

        let again = f.svc.enroll(&f.student, f.course_id).await.unwrap();
        assert!(!again.created);
        assert!(again.record.is_active());
        assert!(f.svc.module_assignments(&f.student, f.module_id).await.is_ok());
    }

    #[tokio::test]
    async fn super_admin_bypasses_gate_but_admin_does_not() {
        let f = fixture().await;
        let admin = user(&f.store, "admin@x.com", Role::Admin).await;
        let root = user(&f.store, "root@x.com", Role::SuperAdmin).await;

        assert!(matches!(
            f.svc.course_modules(&admin, f.course_id).await,
            Err(ServiceError::NotEnrolled)
        ));
        assert_eq!(f.svc.course_modules(&root, f.course_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn progress_upserts_in_place() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.post_progress(&f.student, f.lesson_id, true).await,
            Err(ServiceError::NotEnrolled)
        ));

        f.svc.enroll(&f.student, f.course_id).await.unwrap();
        assert!(f.svc.post_progress(&f.student, f.lesson_id, true).await.unwrap().created);
        assert!(!f.svc.post_progress(&f.student, f.lesson_id, false).await.unwrap().created);

        let progress = f.svc.course_progress(&f.student, f.course_id).await.unwrap();
        assert_eq!(progress.lessons.len(), 1);
        assert_eq!(progress.progresses.len(), 1);
        assert!(!progress.progresses[0].completed);
    }

    #[tokio::test]
    async fn unenroll_without_enrollment_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.unenroll(&f.student, f.course_id).await,
            Err(ServiceError::NotFound("Enrollment"))
        ));
    }
}
