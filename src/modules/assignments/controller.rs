use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, RequireInstructor};
use crate::modules::assignments::model::{
    Assignment, CreateAssignmentDto, GradeSubmissionDto, Submission, SubmitAssignmentDto,
    UpdateAssignmentDto,
};
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/assignments",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Assignments for the course", body = Vec<Assignment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Course not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Assignment>>>, AppError> {
    let principal = auth_user.principal()?;
    let assignments = AssignmentService::list_by_course(&state.db, course_id, &principal).await?;

    Ok(Json(ApiResponse::list(assignments)))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{lesson_id}/assignments",
    params(
        ("lesson_id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 200, description = "Assignments attached to the lesson", body = Vec<Assignment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lesson_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Assignment>>>, AppError> {
    let principal = auth_user.principal()?;
    let assignments = AssignmentService::list_by_lesson(&state.db, lesson_id, &principal).await?;

    Ok(Json(ApiResponse::list(assignments)))
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/assignments",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created successfully", body = Assignment),
        (status = 400, description = "Lesson does not belong to this course"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Assignment>>), AppError> {
    let principal = auth_user.principal()?;
    let assignment =
        AssignmentService::create_assignment(&state.db, course_id, &principal, dto).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(assignment))))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment details", body = Assignment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled or assignment not published"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assignment_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let principal = auth_user.principal()?;
    let assignment = AssignmentService::get_assignment(&state.db, id, &principal).await?;

    Ok(Json(ApiResponse::success(assignment)))
}

#[utoipa::path(
    patch,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated successfully", body = Assignment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Assignment not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let principal = auth_user.principal()?;
    let assignment = AssignmentService::update_assignment(&state.db, id, &principal, dto).await?;

    Ok(Json(ApiResponse::success(assignment)))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 204, description = "Assignment deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let principal = auth_user.principal()?;
    AssignmentService::delete_assignment(&state.db, id, &principal).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = SubmitAssignmentDto,
    responses(
        (status = 200, description = "Assignment submitted or resubmitted", body = Submission),
        (status = 400, description = "Due date has passed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled or assignment not published"),
        (status = 404, description = "Assignment not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn submit_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SubmitAssignmentDto>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let principal = auth_user.principal()?;
    let upsert = AssignmentService::submit(&state.db, id, &principal, dto).await?;

    let message = if upsert.inserted {
        "Assignment submitted"
    } else {
        "Assignment resubmitted"
    };

    Ok(Json(ApiResponse::with_message(upsert.submission, message)))
}

#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submissions/{submission_id}/grade",
    params(
        ("id" = Uuid, Path, description = "Assignment ID"),
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 400, description = "Grade out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Assignment or submission not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path((id, submission_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let principal = auth_user.principal()?;
    let submission =
        AssignmentService::grade(&state.db, id, submission_id, &principal, dto).await?;

    Ok(Json(ApiResponse::with_message(
        submission,
        "Assignment graded successfully",
    )))
}
