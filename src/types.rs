/// Shared enumerations used by models, requests and the store layer

use serde::{Deserialize, Serialize};

/// Account role. Admin CRUD requires `Admin` or `SuperAdmin`;
/// only `SuperAdmin` bypasses the enrollment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn bypasses_enrollment(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "super_admin" | "super-admin" => Ok(Role::SuperAdmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CourseCategory {
    Program,
    ShortTerm,
}

/// Only `Published` courses are visible through the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Published,
    Draft,
}

impl Default for CourseStatus {
    fn default() -> Self {
        CourseStatus::Published
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lesson_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Video,
    Assignment,
}

impl Default for LessonType {
    fn default() -> Self {
        LessonType::Video
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Inactive,
}
