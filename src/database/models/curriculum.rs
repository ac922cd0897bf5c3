use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::LessonType;

// `order` is a reserved word in SQL, so the column is `position`.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: Uuid,
    pub title: String,
    pub course_id: Uuid,
    #[sqlx(rename = "position")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub module_id: Uuid,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub video_url: Option<String>,
    pub assignment_description: Option<String>,
    #[sqlx(rename = "position")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub module_id: Uuid,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    #[sqlx(rename = "position")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub module_id: Uuid,
    pub content: String,
    #[sqlx(rename = "position")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewModule {
    pub title: String,
    pub course_id: Uuid,
    pub order: i32,
}

/// Exactly one of `video_url` / `assignment_description` is set, matching `lesson_type`.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub module_id: Uuid,
    pub lesson_type: LessonType,
    pub video_url: Option<String>,
    pub assignment_description: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub module_id: Uuid,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub module_id: Uuid,
    pub content: String,
    pub order: i32,
}

/// Sort key shared by every curriculum listing: `order` ascending, then creation time.
pub fn curriculum_sort_key(order: i32, created_at: DateTime<Utc>) -> (i32, DateTime<Utc>) {
    (order, created_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_serializes_type_and_order() {
        let now = Utc::now();
        let lesson = Lesson {
            id: Uuid::new_v4(),
            title: "Intro".into(),
            module_id: Uuid::new_v4(),
            lesson_type: LessonType::Video,
            video_url: Some("https://cdn.example.com/intro.mp4".into()),
            assignment_description: None,
            order: 2,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&lesson).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["order"], 2);
        assert!(json["assignmentDescription"].is_null());
    }
}
