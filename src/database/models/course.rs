use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{CourseCategory, CourseStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: CourseCategory,
    pub description: String,
    pub short_description: String,
    pub thumbnail_image: Option<String>,
    pub preview_video_url: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card-sized projection used by "my courses".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub thumbnail_image: Option<String>,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            slug: course.slug,
            short_description: course.short_description,
            thumbnail_image: course.thumbnail_image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub category: CourseCategory,
    pub description: String,
    pub short_description: String,
    pub thumbnail_image: Option<String>,
    pub preview_video_url: Option<String>,
    pub price: Decimal,
    pub status: CourseStatus,
}

/// Partial update; `None` leaves the column untouched.
/// For the nullable media columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<CourseCategory>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub thumbnail_image: Option<Option<String>>,
    pub preview_video_url: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub status: Option<CourseStatus>,
}

impl CourseChanges {
    pub fn apply_to(self, course: &mut Course) {
        if let Some(v) = self.title {
            course.title = v;
        }
        if let Some(v) = self.slug {
            course.slug = v;
        }
        if let Some(v) = self.category {
            course.category = v;
        }
        if let Some(v) = self.description {
            course.description = v;
        }
        if let Some(v) = self.short_description {
            course.short_description = v;
        }
        if let Some(v) = self.thumbnail_image {
            course.thumbnail_image = v;
        }
        if let Some(v) = self.preview_video_url {
            course.preview_video_url = v;
        }
        if let Some(v) = self.price {
            course.price = v;
        }
        if let Some(v) = self.status {
            course.status = v;
        }
    }
}

/// Listing filter. `status: None` means every status (admin listing).
#[derive(Debug, Clone, Copy, Default)]
pub struct CourseFilter {
    pub category: Option<CourseCategory>,
    pub status: Option<CourseStatus>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        self.category.map_or(true, |c| course.category == c) && self.status.map_or(true, |s| course.status == s)
    }
}
