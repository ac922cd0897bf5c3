//! Request bodies accepted by the REST surface.
//!
//! Every field is optional at the serde level so a missing field is reported by
//! `validator` as a field error instead of a JSON rejection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{value::StringDeserializer, IntoDeserializer};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::types::{CourseCategory, CourseStatus, LessonType};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,
    #[validate(required(message = "Email is required"), custom(function = "email_after_trim"))]
    pub email: Option<String>,
    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,
    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "create_course_price"))]
pub struct CreateCourseRequest {
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "Slug is required"))]
    pub slug: Option<String>,
    #[validate(required(message = "Category is required"))]
    pub category: Option<CourseCategory>,
    #[validate(required(message = "Description is required"))]
    pub description: Option<String>,
    #[validate(
        required(message = "Short description is required"),
        length(max = 200, message = "Short description cannot exceed 200 characters")
    )]
    pub short_description: Option<String>,
    pub thumbnail_image: Option<String>,
    pub preview_video_url: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<CourseStatus>,
}

/// Partial course update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "update_course_price"))]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    pub slug: Option<String>,
    pub category: Option<CourseCategory>,
    pub description: Option<String>,
    #[validate(length(max = 200, message = "Short description cannot exceed 200 characters"))]
    pub short_description: Option<String>,
    pub thumbnail_image: Option<String>,
    pub preview_video_url: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "Course id is required"))]
    pub course_id: Option<Uuid>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "lesson_content_matches_type"))]
pub struct CreateLessonRequest {
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "Module id is required"))]
    pub module_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub lesson_type: Option<LessonType>,
    pub video_url: Option<String>,
    pub assignment_description: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "Module id is required"))]
    pub module_id: Option<Uuid>,
    #[validate(required(message = "Description is required"))]
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "Module id is required"))]
    pub module_id: Option<Uuid>,
    #[validate(required(message = "Content is required"))]
    pub content: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[validate(required(message = "Course id is required"))]
    pub course_id: Option<Uuid>,
}

/// A missing `completed` is stored as false.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[validate(required(message = "Lesson id is required"))]
    pub lesson_id: Option<Uuid>,
    pub completed: Option<bool>,
}

/// `?category=&status=`; empty parameters count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<CourseCategory>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<CourseStatus>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let de: StringDeserializer<D::Error> = value.to_string().into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Registration trims the address before storing it, so check it the same way
fn email_after_trim(email: &String) -> Result<(), ValidationError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(validation_error("email", "Please provide a valid email"))
    }
}

fn non_negative(price: Option<Decimal>) -> Result<(), ValidationError> {
    match price {
        Some(p) if p.is_sign_negative() && !p.is_zero() => Err(validation_error("price", "Price cannot be negative")),
        _ => Ok(()),
    }
}

fn create_course_price(req: &CreateCourseRequest) -> Result<(), ValidationError> {
    non_negative(req.price)
}

fn update_course_price(req: &UpdateCourseRequest) -> Result<(), ValidationError> {
    non_negative(req.price)
}

fn lesson_content_matches_type(req: &CreateLessonRequest) -> Result<(), ValidationError> {
    let present = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
    match req.lesson_type.unwrap_or_default() {
        LessonType::Video if !present(&req.video_url) => {
            Err(validation_error("videoUrl", "Video URL is required for video lessons"))
        }
        LessonType::Assignment if !present(&req.assignment_description) => Err(validation_error(
            "assignmentDescription",
            "Assignment description is required for assignment lessons",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_reports_each_missing_field() {
        let req: RegisterRequest = serde_json::from_value(json!({"email": "ana@x.com"})).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn register_rejects_bad_email() {
        let req: RegisterRequest =
            serde_json::from_value(json!({"name": "Ana", "email": "not-an-email", "password": "secret1"})).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn register_accepts_padded_email() {
        let req: RegisterRequest =
            serde_json::from_value(json!({"name": "Ana", "email": "  Ana@X.com ", "password": "secret1"})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn course_short_description_is_capped() {
        let req = CreateCourseRequest {
            title: Some("Intro".into()),
            slug: Some("intro".into()),
            category: Some(CourseCategory::Program),
            description: Some("d".into()),
            short_description: Some("x".repeat(201)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let req: UpdateCourseRequest = serde_json::from_value(json!({"price": -5})).unwrap();
        assert!(req.validate().is_err());
        let req: UpdateCourseRequest = serde_json::from_value(json!({"price": 0})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn lesson_content_must_match_type() {
        let module_id = Uuid::new_v4();
        let video_without_url: CreateLessonRequest =
            serde_json::from_value(json!({"title": "L1", "moduleId": module_id, "type": "video"})).unwrap();
        assert!(video_without_url.validate().is_err());

        let assignment: CreateLessonRequest = serde_json::from_value(json!({
            "title": "L2",
            "moduleId": module_id,
            "type": "assignment",
            "assignmentDescription": "Write a parser"
        }))
        .unwrap();
        assert!(assignment.validate().is_ok());
    }

    #[test]
    fn empty_query_parameters_are_absent() {
        let q: CourseListQuery = serde_json::from_value(json!({"category": "", "status": "draft"})).unwrap();
        assert_eq!(q.category, None);
        assert_eq!(q.status, Some(CourseStatus::Draft));
        let q: CourseListQuery = serde_json::from_value(json!({"category": "short-term"})).unwrap();
        assert_eq!(q.category, Some(CourseCategory::ShortTerm));
    }

    #[test]
    fn unknown_category_fails_to_deserialize() {
        let parsed = serde_json::from_value::<CreateCourseRequest>(json!({"category": "bootcamp"}));
        assert!(parsed.is_err());
    }
}
