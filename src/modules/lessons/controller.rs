use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, RequireInstructor};
use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/lessons",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Lessons in course order", body = Vec<Lesson>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Course not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lessons(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, AppError> {
    let principal = auth_user.principal()?;
    let lessons = LessonService::list_lessons(&state.db, course_id, &principal).await?;

    Ok(Json(ApiResponse::list(lessons)))
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/lessons",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created successfully", body = Lesson),
        (status = 400, description = "Position out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<ApiResponse<Lesson>>), AppError> {
    let principal = auth_user.principal()?;
    let lesson = LessonService::create_lesson(&state.db, course_id, &principal, dto).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(lesson))))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 200, description = "Lesson details", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled or lesson not published"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lesson_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    let principal = auth_user.principal()?;
    let lesson = LessonService::get_lesson(&state.db, id, &principal).await?;

    Ok(Json(ApiResponse::success(lesson)))
}

#[utoipa::path(
    patch,
    path = "/api/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated successfully", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Lesson not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    let principal = auth_user.principal()?;
    let lesson = LessonService::update_lesson(&state.db, id, &principal, dto).await?;

    Ok(Json(ApiResponse::success(lesson)))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 204, description = "Lesson deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let principal = auth_user.principal()?;
    LessonService::delete_lesson(&state.db, id, &principal).await?;

    Ok(StatusCode::NO_CONTENT)
}
