use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, RequireInstructor};
use crate::modules::courses::model::{
    Course, CourseDetail, CourseFilterParams, CreateCourseDto, Enrollment,
    PaginatedCoursesResponse, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "List of courses", body = PaginatedCoursesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<ApiResponse<PaginatedCoursesResponse>>, AppError> {
    let principal = auth_user.principal()?;
    let courses = CourseService::list_courses(&state.db, &principal, filters).await?;

    Ok(Json(ApiResponse::success(courses)))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created successfully", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - instructors and admins only"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), AppError> {
    let course = CourseService::create_course(&state.db, auth_user.user_id()?, dto).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = CourseDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Course not published"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CourseDetail>>, AppError> {
    let principal = auth_user.principal()?;
    let course = CourseService::get_course(&state.db, id, &principal).await?;

    Ok(Json(ApiResponse::success(course)))
}

#[utoipa::path(
    patch,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated successfully", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let principal = auth_user.principal()?;
    let course = CourseService::update_course(&state.db, id, &principal, dto).await?;

    Ok(Json(ApiResponse::success(course)))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - owner or admin only"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireInstructor(auth_user): RequireInstructor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let principal = auth_user.principal()?;
    CourseService::delete_course(&state.db, id, &principal).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Enrolled successfully", body = Enrollment),
        (status = 400, description = "Already enrolled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Course not published or instructor tried to enroll"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn enroll_in_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Enrollment>>, AppError> {
    let principal = auth_user.principal()?;
    let enrollment = CourseService::enroll(&state.db, id, &principal).await?;

    Ok(Json(ApiResponse::with_message(
        enrollment,
        "Successfully enrolled in course",
    )))
}
