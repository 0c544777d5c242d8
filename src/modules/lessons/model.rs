use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    /// 1-based slot within the course; dense across all lessons of the
    /// course, published or not.
    pub position: i32,
    pub duration: i32,
    pub video_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, message = "A lesson must have a title"))]
    pub title: String,
    #[validate(length(min = 1, message = "A lesson must have content"))]
    pub content: String,
    /// Desired slot; omitted means append at the end. Existing lessons at
    /// or after the slot shift down by one.
    pub position: Option<i32>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration: Option<i32>,
    #[validate(url(message = "Video URL must be a valid URL"))]
    pub video_url: Option<String>,
    pub is_published: Option<bool>,
}

/// Client-mutable lesson fields. `position` is deliberately absent:
/// reordering goes through create/delete renumbering, never a direct
/// write, so the sequence stays dense.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, message = "A lesson must have a title"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "A lesson must have content"))]
    pub content: Option<String>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration: Option<i32>,
    #[validate(url(message = "Video URL must be a valid URL"))]
    pub video_url: Option<String>,
    pub is_published: Option<bool>,
}
