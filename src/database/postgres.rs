use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::*;
use super::store::{Store, Upserted};
use crate::types::{EnrollmentStatus, Role};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, title, slug, category, description, short_description, thumbnail_image, \
     preview_video_url, price, status, created_at, updated_at";
const MODULE_COLUMNS: &str = "id, title, course_id, position, created_at, updated_at";
const LESSON_COLUMNS: &str = "id, title, module_id, lesson_type, video_url, assignment_description, position, \
     created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str = "id, title, module_id, description, due_date, position, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, title, module_id, content, position, created_at, updated_at";
const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, status, created_at, updated_at";
const PROGRESS_COLUMNS: &str = "id, user_id, lesson_id, completed, created_at, updated_at";

// `xmax = 0` only holds for a tuple written by an INSERT, so it tells an
// `ON CONFLICT DO UPDATE` apart from a fresh row.

#[derive(FromRow)]
struct EnrollmentUpsertRow {
    #[sqlx(flatten)]
    record: Enrollment,
    inserted: bool,
}

#[derive(FromRow)]
struct ProgressUpsertRow {
    #[sqlx(flatten)]
    record: Progress,
    inserted: bool,
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET name = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).bind(name).fetch_optional(&self.pool).await?)
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).bind(role).fetch_optional(&self.pool).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO courses (id, title, slug, category, description, short_description,
                                 thumbnail_image, preview_video_url, price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            COURSE_COLUMNS
        );
        let row = sqlx::query_as::<_, Course>(&sql)
            .bind(Uuid::new_v4())
            .bind(&course.title)
            .bind(&course.slug)
            .bind(course.category)
            .bind(&course.description)
            .bind(&course.short_description)
            .bind(&course.thumbnail_image)
            .bind(&course.preview_video_url)
            .bind(course.price)
            .bind(course.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, DatabaseError> {
        let sql = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);
        Ok(sqlx::query_as::<_, Course>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_course_by_slug(&self, slug: &str) -> Result<Option<Course>, DatabaseError> {
        let sql = format!("SELECT {} FROM courses WHERE slug = $1", COURSE_COLUMNS);
        Ok(sqlx::query_as::<_, Course>(&sql).bind(slug).fetch_optional(&self.pool).await?)
    }

    async fn list_courses(&self, filter: CourseFilter) -> Result<Vec<Course>, DatabaseError> {
        // NULL parameters disable the corresponding predicate
        let sql = format!(
            r#"
            SELECT {} FROM courses
            WHERE ($1::course_category IS NULL OR category = $1)
              AND ($2::course_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            COURSE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Course>(&sql)
            .bind(filter.category)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM courses WHERE id = ANY($1) ORDER BY created_at DESC",
            COURSE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Course>(&sql).bind(ids).fetch_all(&self.pool).await?)
    }

    async fn update_course(&self, id: Uuid, changes: CourseChanges) -> Result<Option<Course>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE courses SET
                title             = COALESCE($2, title),
                slug              = COALESCE($3, slug),
                category          = COALESCE($4, category),
                description       = COALESCE($5, description),
                short_description = COALESCE($6, short_description),
                thumbnail_image   = CASE WHEN $11 THEN $7 ELSE thumbnail_image END,
                preview_video_url = CASE WHEN $12 THEN $8 ELSE preview_video_url END,
                price             = COALESCE($9, price),
                status            = COALESCE($10, status),
                updated_at        = now()
            WHERE id = $1
            RETURNING {}
            "#,
            COURSE_COLUMNS
        );
        let set_thumbnail = changes.thumbnail_image.is_some();
        let set_preview = changes.preview_video_url.is_some();
        let row = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.slug)
            .bind(changes.category)
            .bind(changes.description)
            .bind(changes.short_description)
            .bind(changes.thumbnail_image.flatten())
            .bind(changes.preview_video_url.flatten())
            .bind(changes.price)
            .bind(changes.status)
            .bind(set_thumbnail)
            .bind(set_preview)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_module(&self, module: NewModule) -> Result<Module, DatabaseError> {
        let sql = format!(
            "INSERT INTO modules (id, title, course_id, position) VALUES ($1, $2, $3, $4) RETURNING {}",
            MODULE_COLUMNS
        );
        let row = sqlx::query_as::<_, Module>(&sql)
            .bind(Uuid::new_v4())
            .bind(&module.title)
            .bind(module.course_id)
            .bind(module.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_module(&self, id: Uuid) -> Result<Option<Module>, DatabaseError> {
        let sql = format!("SELECT {} FROM modules WHERE id = $1", MODULE_COLUMNS);
        Ok(sqlx::query_as::<_, Module>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_modules(&self, course_id: Uuid) -> Result<Vec<Module>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM modules WHERE course_id = $1 ORDER BY position ASC, created_at ASC",
            MODULE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Module>(&sql).bind(course_id).fetch_all(&self.pool).await?)
    }

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO lessons (id, title, module_id, lesson_type, video_url, assignment_description, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            LESSON_COLUMNS
        );
        let row = sqlx::query_as::<_, Lesson>(&sql)
            .bind(Uuid::new_v4())
            .bind(&lesson.title)
            .bind(lesson.module_id)
            .bind(lesson.lesson_type)
            .bind(&lesson.video_url)
            .bind(&lesson.assignment_description)
            .bind(lesson.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, DatabaseError> {
        let sql = format!("SELECT {} FROM lessons WHERE id = $1", LESSON_COLUMNS);
        Ok(sqlx::query_as::<_, Lesson>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_lessons(&self, module_ids: &[Uuid]) -> Result<Vec<Lesson>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM lessons WHERE module_id = ANY($1) ORDER BY position ASC, created_at ASC",
            LESSON_COLUMNS
        );
        Ok(sqlx::query_as::<_, Lesson>(&sql).bind(module_ids).fetch_all(&self.pool).await?)
    }

    async fn insert_assignment(&self, assignment: NewAssignment) -> Result<Assignment, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO assignments (id, title, module_id, description, due_date, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, Assignment>(&sql)
            .bind(Uuid::new_v4())
            .bind(&assignment.title)
            .bind(assignment.module_id)
            .bind(&assignment.description)
            .bind(assignment.due_date)
            .bind(assignment.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_assignments(&self, module_id: Uuid) -> Result<Vec<Assignment>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM assignments WHERE module_id = $1 ORDER BY position ASC, created_at ASC",
            ASSIGNMENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Assignment>(&sql).bind(module_id).fetch_all(&self.pool).await?)
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let sql = format!(
            "INSERT INTO notes (id, title, module_id, content, position) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query_as::<_, Note>(&sql)
            .bind(Uuid::new_v4())
            .bind(&note.title)
            .bind(note.module_id)
            .bind(&note.content)
            .bind(note.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_notes(&self, module_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM notes WHERE module_id = $1 ORDER BY position ASC, created_at ASC",
            NOTE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Note>(&sql).bind(module_id).fetch_all(&self.pool).await?)
    }

    async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM enrollments WHERE user_id = $1 AND course_id = $2",
            ENROLLMENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Enrollment>(&sql)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn activate_enrollment(&self, user_id: Uuid, course_id: Uuid) -> Result<Upserted<Enrollment>, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO enrollments (id, user_id, course_id, status)
            VALUES ($1, $2, $3, 'active')
            ON CONFLICT (user_id, course_id) DO UPDATE
                SET status = 'active',
                    updated_at = CASE WHEN enrollments.status = 'active'
                                      THEN enrollments.updated_at ELSE now() END
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            ENROLLMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, EnrollmentUpsertRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(Upserted { record: row.record, created: row.inserted })
    }

    async fn set_enrollment_status(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE enrollments SET status = $3, updated_at = now()
            WHERE user_id = $1 AND course_id = $2
            RETURNING {}
            "#,
            ENROLLMENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Enrollment>(&sql)
            .bind(user_id)
            .bind(course_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_active_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM enrollments WHERE user_id = $1 AND status = 'active' ORDER BY created_at ASC",
            ENROLLMENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Enrollment>(&sql).bind(user_id).fetch_all(&self.pool).await?)
    }

    async fn upsert_progress(&self, user_id: Uuid, lesson_id: Uuid, completed: bool) -> Result<Upserted<Progress>, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO progress (id, user_id, lesson_id, completed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, lesson_id) DO UPDATE
                SET completed = EXCLUDED.completed, updated_at = now()
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            PROGRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, ProgressUpsertRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(lesson_id)
            .bind(completed)
            .fetch_one(&self.pool)
            .await?;
        Ok(Upserted { record: row.record, created: row.inserted })
    }

    async fn list_progress(&self, user_id: Uuid, lesson_ids: &[Uuid]) -> Result<Vec<Progress>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM progress WHERE user_id = $1 AND lesson_id = ANY($2) ORDER BY created_at ASC",
            PROGRESS_COLUMNS
        );
        Ok(sqlx::query_as::<_, Progress>(&sql)
            .bind(user_id)
            .bind(lesson_ids)
            .fetch_all(&self.pool)
            .await?)
    }
}
