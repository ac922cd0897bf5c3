use uuid::Uuid;

use super::{required_text, ServiceError};
use crate::api::requests::{CreateAssignmentRequest, CreateLessonRequest, CreateModuleRequest, CreateNoteRequest};
use crate::database::models::{
    Assignment, Lesson, Module, NewAssignment, NewLesson, NewModule, NewNote, Note,
};
use crate::database::SharedStore;
use crate::types::LessonType;

/// Admin authoring of modules, lessons, assignments and notes.
///
/// Listings here are not enrollment-gated; the learner-facing reads live in
/// [`super::LearningService`].
pub struct CurriculumService {
    store: SharedStore,
}

impl CurriculumService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create_module(&self, req: CreateModuleRequest) -> Result<Module, ServiceError> {
        let title = required_text(req.title, "title", "Title is required")?;
        let course_id = req
            .course_id
            .ok_or_else(|| ServiceError::validation("courseId", "Course id is required"))?;

        if self.store.find_course(course_id).await?.is_none() {
            return Err(ServiceError::NotFound("Course"));
        }

        let module = self
            .store
            .insert_module(NewModule {
                title,
                course_id,
                order: req.order.unwrap_or(0),
            })
            .await?;
        tracing::info!("Created module {} in course {}", module.id, course_id);
        Ok(module)
    }

    pub async fn list_modules(&self, course_id: Uuid) -> Result<Vec<Module>, ServiceError> {
        Ok(self.store.list_modules(course_id).await?)
    }

    /// Stores only the content field that matches the lesson type.
    pub async fn create_lesson(&self, req: CreateLessonRequest) -> Result<Lesson, ServiceError> {
        let title = required_text(req.title, "title", "Title is required")?;
        let module_id = self.existing_module(req.module_id).await?;
        let lesson_type = req.lesson_type.unwrap_or_default();

        let (video_url, assignment_description) = match lesson_type {
            LessonType::Video => (
                Some(required_text(req.video_url, "videoUrl", "Video URL is required for video lessons")?),
                None,
            ),
            LessonType::Assignment => (
                None,
                Some(required_text(
                    req.assignment_description,
                    "assignmentDescription",
                    "Assignment description is required for assignment lessons",
                )?),
            ),
        };

        Ok(self
            .store
            .insert_lesson(NewLesson {
                title,
                module_id,
                lesson_type,
                video_url,
                assignment_description,
                order: req.order.unwrap_or(0),
            })
            .await?)
    }

    pub async fn list_lessons(&self, module_id: Uuid) -> Result<Vec<Lesson>, ServiceError> {
        Ok(self.store.list_lessons(&[module_id]).await?)
    }

    pub async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment, ServiceError> {
        let title = required_text(req.title, "title", "Title is required")?;
        let module_id = self.existing_module(req.module_id).await?;
        let description = required_text(req.description, "description", "Description is required")?;

        Ok(self
            .store
            .insert_assignment(NewAssignment {
                title,
                module_id,
                description,
                due_date: req.due_date,
                order: req.order.unwrap_or(0),
            })
            .await?)
    }

    pub async fn list_assignments(&self, module_id: Uuid) -> Result<Vec<Assignment>, ServiceError> {
        Ok(self.store.list_assignments(module_id).await?)
    }

    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<Note, ServiceError> {
        let title = required_text(req.title, "title", "Title is required")?;
        let module_id = self.existing_module(req.module_id).await?;
        // content is stored verbatim; only blankness is checked
        let content = req
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ServiceError::validation("content", "Content is required"))?;

        Ok(self
            .store
            .insert_note(NewNote {
                title,
                module_id,
                content,
                order: req.order.unwrap_or(0),
            })
            .await?)
    }

    pub async fn list_notes(&self, module_id: Uuid) -> Result<Vec<Note>, ServiceError> {
        Ok(self.store.list_notes(module_id).await?)
    }

    async fn existing_module(&self, module_id: Option<Uuid>) -> Result<Uuid, ServiceError> {
        let module_id = module_id.ok_or_else(|| ServiceError::validation("moduleId", "Module id is required"))?;
        match self.store.find_module(module_id).await? {
            Some(module) => Ok(module.id),
            None => Err(ServiceError::NotFound("Module")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewCourse;
    use crate::database::{MemoryStore, Store};
    use crate::types::{CourseCategory, CourseStatus};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    async fn seeded() -> (CurriculumService, Uuid) {
        let store = Arc::new(MemoryStore::new());
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
        (CurriculumService::new(store), course.id)
    }

    fn module_req(title: &str, course_id: Uuid, order: Option<i32>) -> CreateModuleRequest {
        CreateModuleRequest {
            title: Some(title.into()),
            course_id: Some(course_id),
            order,
        }
    }

    #[tokio::test]
    async fn created_module_is_listed_under_its_course() {
        let (svc, course_id) = seeded().await;
        let module = svc.create_module(module_req("X", course_id, None)).await.unwrap();

        let listed = svc.list_modules(course_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "X");
        assert_eq!(listed[0].course_id, course_id);
        assert_eq!(listed[0].id, module.id);
    }

    #[tokio::test]
    async fn unknown_parents_are_not_found() {
        let (svc, _) = seeded().await;
        assert!(matches!(
            svc.create_module(module_req("X", Uuid::new_v4(), None)).await,
            Err(ServiceError::NotFound("Course"))
        ));
        let lesson = CreateLessonRequest {
            title: Some("L".into()),
            module_id: Some(Uuid::new_v4()),
            video_url: Some("https://cdn.example.com/l.mp4".into()),
            ..Default::default()
        };
        assert!(matches!(svc.create_lesson(lesson).await, Err(ServiceError::NotFound("Module"))));
    }

    #[tokio::test]
    async fn lesson_keeps_only_matching_content() {
        let (svc, course_id) = seeded().await;
        let module = svc.create_module(module_req("M", course_id, None)).await.unwrap();

        let lesson = svc
            .create_lesson(CreateLessonRequest {
                title: Some("Essay".into()),
                module_id: Some(module.id),
                lesson_type: Some(LessonType::Assignment),
                video_url: Some("https://cdn.example.com/ignored.mp4".into()),
                assignment_description: Some("Write 500 words".into()),
                order: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(lesson.video_url, None);
        assert_eq!(lesson.assignment_description.as_deref(), Some("Write 500 words"));

        let missing_url = svc
            .create_lesson(CreateLessonRequest {
                title: Some("Intro".into()),
                module_id: Some(module.id),
                lesson_type: Some(LessonType::Video),
                ..Default::default()
            })
            .await;
        assert!(matches!(missing_url, Err(ServiceError::Validation { field: "videoUrl", .. })));
    }

    #[tokio::test]
    async fn modules_follow_explicit_order() {
        let (svc, course_id) = seeded().await;
        svc.create_module(module_req("Second", course_id, Some(2))).await.unwrap();
        svc.create_module(module_req("First", course_id, Some(1))).await.unwrap();
        let titles: Vec<String> = svc.list_modules(course_id).await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn notes_and_assignments_round_trip() {
        let (svc, course_id) = seeded().await;
        let module = svc.create_module(module_req("M", course_id, None)).await.unwrap();
        svc.create_note(CreateNoteRequest {
            title: Some("Cheatsheet".into()),
            module_id: Some(module.id),
            content: Some("print('hi')".into()),
            order: None,
        })
        .await
        .unwrap();
        svc.create_assignment(CreateAssignmentRequest {
            title: Some("HW1".into()),
            module_id: Some(module.id),
            description: Some("Solve it".into()),
            due_date: None,
            order: None,
        })
        .await
        .unwrap();

        assert_eq!(svc.list_notes(module.id).await.unwrap().len(), 1);
        assert_eq!(svc.list_assignments(module.id).await.unwrap()[0].title, "HW1");
        assert!(svc.list_notes(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
