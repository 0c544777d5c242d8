use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_assignment, delete_assignment, get_assignment_by_id, get_course_assignments,
    get_lesson_assignments, grade_submission, submit_assignment, update_assignment,
};

/// Routes nested under `/api/courses/{course_id}/assignments`.
pub fn init_course_assignments_router() -> Router<AppState> {
    Router::new().route("/", post(create_assignment).get(get_course_assignments))
}

/// Routes nested under `/api/lessons/{lesson_id}/assignments`.
pub fn init_lesson_assignments_router() -> Router<AppState> {
    Router::new().route("/", get(get_lesson_assignments))
}

/// Routes addressing an assignment directly, nested under `/api/assignments`.
pub fn init_assignments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(get_assignment_by_id)
                .patch(update_assignment)
                .delete(delete_assignment),
        )
        .route("/{id}/submit", post(submit_assignment))
        .route(
            "/{id}/submissions/{submission_id}/grade",
            post(grade_submission),
        )
}
