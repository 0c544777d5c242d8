use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::assignments::model::{
    Assignment, Attachment, CreateAssignmentDto, GradeSubmissionDto, Submission,
    SubmitAssignmentDto, UpdateAssignmentDto,
};
use crate::modules::courses::model::{
    Course, CourseCategory, CourseDetail, CourseFilterParams, CourseLessonSummary, CourseLevel,
    CreateCourseDto, Enrollment, PaginatedCoursesResponse, UpdateCourseDto,
};
use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};
use crate::modules::users::model::{UserRole, UserSummary};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::enroll_in_course,
        crate::modules::lessons::controller::get_lessons,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lesson_by_id,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::assignments::controller::get_course_assignments,
        crate::modules::assignments::controller::get_lesson_assignments,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::get_assignment_by_id,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::assignments::controller::submit_assignment,
        crate::modules::assignments::controller::grade_submission,
    ),
    components(
        schemas(
            UserRole,
            UserSummary,
            Course,
            CourseCategory,
            CourseLevel,
            CourseDetail,
            CourseLessonSummary,
            CreateCourseDto,
            UpdateCourseDto,
            CourseFilterParams,
            PaginatedCoursesResponse,
            Enrollment,
            Lesson,
            CreateLessonDto,
            UpdateLessonDto,
            Assignment,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            Attachment,
            Submission,
            SubmitAssignmentDto,
            GradeSubmissionDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Courses", description = "Course catalog and enrollment endpoints"),
        (name = "Lessons", description = "Lesson content and ordering endpoints"),
        (name = "Assignments", description = "Assignments, submissions and grading endpoints")
    ),
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "A REST API built with Rust, Axum, and PostgreSQL for managing courses, lessons, assignments, submissions, and grades.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
