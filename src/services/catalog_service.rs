use rust_decimal::Decimal;
use uuid::Uuid;

use super::{optional_text, required_text, ServiceError};
use crate::api::requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest};
use crate::database::models::{Course, CourseChanges, CourseFilter, NewCourse};
use crate::database::SharedStore;
use crate::types::CourseStatus;

/// Public catalog reads and admin course CRUD
pub struct CatalogService {
    store: SharedStore,
}

impl CatalogService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Public listing. Status is pinned to published, so asking for drafts yields nothing.
    pub async fn list_published(&self, query: CourseListQuery) -> Result<Vec<Course>, ServiceError> {
        if matches!(query.status, Some(status) if status != CourseStatus::Published) {
            return Ok(Vec::new());
        }
        let filter = CourseFilter {
            category: query.category,
            status: Some(CourseStatus::Published),
        };
        Ok(self.store.list_courses(filter).await?)
    }

    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Course, ServiceError> {
        let slug = normalize_slug(slug);
        match self.store.find_course_by_slug(&slug).await? {
            Some(course) if course.status == CourseStatus::Published => Ok(course),
            _ => Err(ServiceError::NotFound("Course")),
        }
    }

    /// Admin listing: every status, optional filters
    pub async fn list_all(&self, query: CourseListQuery) -> Result<Vec<Course>, ServiceError> {
        let filter = CourseFilter {
            category: query.category,
            status: query.status,
        };
        Ok(self.store.list_courses(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Course, ServiceError> {
        self.store.find_course(id).await?.ok_or(ServiceError::NotFound("Course"))
    }

    pub async fn create(&self, req: CreateCourseRequest) -> Result<Course, ServiceError> {
        let title = required_text(req.title, "title", "Title is required")?;
        let slug = normalize_slug(&required_text(req.slug, "slug", "Slug is required")?);
        let category = req
            .category
            .ok_or_else(|| ServiceError::validation("category", "Category is required"))?;
        let description = required_text(req.description, "description", "Description is required")?;
        let short_description =
            required_text(req.short_description, "shortDescription", "Short description is required")?;
        let price = req.price.unwrap_or(Decimal::ZERO);
        ensure_price(price)?;

        if self.store.find_course_by_slug(&slug).await?.is_some() {
            return Err(ServiceError::Conflict("A course with this slug already exists".to_string()));
        }

        let course = self
            .store
            .insert_course(NewCourse {
                title,
                slug,
                category,
                description,
                short_description,
                thumbnail_image: optional_text(req.thumbnail_image),
                preview_video_url: optional_text(req.preview_video_url),
                price,
                status: req.status.unwrap_or_default(),
            })
            .await?;

        tracing::info!("Created course {} ({})", course.id, course.slug);
        Ok(course)
    }

    pub async fn update(&self, id: Uuid, req: UpdateCourseRequest) -> Result<Course, ServiceError> {
        let changes = CourseChanges {
            title: non_blank(req.title, "title", "Title cannot be empty")?,
            slug: non_blank(req.slug, "slug", "Slug cannot be empty")?.map(|s| normalize_slug(&s)),
            category: req.category,
            description: non_blank(req.description, "description", "Description cannot be empty")?,
            short_description: non_blank(
                req.short_description,
                "shortDescription",
                "Short description cannot be empty",
            )?,
            thumbnail_image: clearable_text(req.thumbnail_image),
            preview_video_url: clearable_text(req.preview_video_url),
            price: req.price,
            status: req.status,
        };
        if let Some(price) = changes.price {
            ensure_price(price)?;
        }

        if let Some(slug) = &changes.slug {
            if let Some(existing) = self.store.find_course_by_slug(slug).await? {
                if existing.id != id {
                    return Err(ServiceError::Conflict("A course with this slug already exists".to_string()));
                }
            }
        }

        self.store
            .update_course(id, changes)
            .await?
            .ok_or(ServiceError::NotFound("Course"))
    }

    /// Removes the course row only; its modules stay behind unreachable.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.store.find_course(id).await?.is_none() {
            return Err(ServiceError::NotFound("Course"));
        }

        let orphaned = self.store.list_modules(id).await?.len();
        if !self.store.delete_course(id).await? {
            return Err(ServiceError::NotFound("Course"));
        }

        if orphaned > 0 {
            tracing::warn!("Deleted course {} leaving {} orphaned module(s)", id, orphaned);
        } else {
            tracing::info!("Deleted course {}", id);
        }
        Ok(())
    }
}

pub(crate) fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

fn ensure_price(price: Decimal) -> Result<(), ServiceError> {
    if price < Decimal::ZERO {
        return Err(ServiceError::validation("price", "Price cannot be negative"));
    }
    Ok(())
}

/// Absent stays absent; present-but-blank is an error
fn non_blank(value: Option<String>, field: &'static str, message: &str) -> Result<Option<String>, ServiceError> {
    value.map(|v| required_text(Some(v), field, message)).transpose()
}

/// Absent stays absent; present-but-blank clears the column
fn clearable_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| optional_text(Some(v)))
}
