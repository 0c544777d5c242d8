use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub total_points: f64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File reference carried on a submission. Upload handling lives
/// elsewhere; this service stores the metadata as given.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub name: String,
    pub file_url: String,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: String,
    #[schema(value_type = Vec<Attachment>)]
    pub attachments: Json<Vec<Attachment>>,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub is_graded: bool,
}

/// Submission row plus whether the upsert inserted (first submit) or
/// updated (resubmission).
#[derive(Debug, FromRow)]
pub struct SubmissionUpsert {
    #[sqlx(flatten)]
    pub submission: Submission,
    pub inserted: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, message = "An assignment must have a title"))]
    pub title: String,
    #[validate(length(min = 1, message = "An assignment must have a description"))]
    pub description: String,
    /// Must reference a lesson of the same course when present.
    pub lesson_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(exclusive_min = 0.0, message = "Total points must be positive"))]
    pub total_points: Option<f64>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1, message = "An assignment must have a title"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "An assignment must have a description"))]
    pub description: Option<String>,
    pub lesson_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(exclusive_min = 0.0, message = "Total points must be positive"))]
    pub total_points: Option<f64>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmitAssignmentDto {
    #[validate(length(min = 1, message = "A submission must have content"))]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Bounds against the assignment's `total_points` are checked by the
/// service; only the static lower bound lives here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GradeSubmissionDto {
    #[validate(range(min = 0.0, message = "Grade cannot be negative"))]
    pub grade: f64,
    pub feedback: Option<String>,
}
