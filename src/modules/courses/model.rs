use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::UserSummary;
use crate::utils::pagination::PaginationMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "course_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CourseCategory {
    Programming,
    Design,
    Business,
    Marketing,
    Science,
    Language,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "course_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CourseCategory,
    pub level: CourseLevel,
    pub duration: Option<i32>,
    pub price: f64,
    pub instructor_id: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lesson fields surfaced on a course detail; the full lesson body lives
/// behind the lessons endpoints.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseLessonSummary {
    pub id: Uuid,
    pub title: String,
    pub duration: i32,
    pub position: i32,
    pub is_published: bool,
}

/// Course detail with its read-time joins: instructor summary, ordered
/// lesson summaries and the enrollment count. Each piece is fetched
/// explicitly by the service; there is no implicit populate-on-find.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: UserSummary,
    pub lessons: Vec<CourseLessonSummary>,
    pub enrollment_count: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub enrollment_date: DateTime<Utc>,
    pub progress: f64,
    pub completed: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCourseDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "A course title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "A course must have a description"))]
    pub description: String,
    pub category: CourseCategory,
    pub level: Option<CourseLevel>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration: Option<i32>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub published: Option<bool>,
}

/// Allow-list of client-mutable course fields. Anything else in the body
/// is rejected; the instructor is never reassignable.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCourseDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "A course title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "A course must have a description"))]
    pub description: Option<String>,
    pub category: Option<CourseCategory>,
    pub level: Option<CourseLevel>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration: Option<i32>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CourseFilterParams {
    pub category: Option<CourseCategory>,
    pub level: Option<CourseLevel>,
    #[serde(default, deserialize_with = "crate::utils::serde::deserialize_optional_bool")]
    pub published: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::serde::deserialize_optional_uuid")]
    pub instructor_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}
