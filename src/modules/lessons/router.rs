use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_lesson, delete_lesson, get_lesson_by_id, get_lessons, update_lesson,
};

/// Routes nested under `/api/courses/{course_id}/lessons`.
pub fn init_course_lessons_router() -> Router<AppState> {
    Router::new().route("/", post(create_lesson).get(get_lessons))
}

/// Routes addressing a lesson directly, nested under `/api/lessons`.
pub fn init_lessons_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(get_lesson_by_id)
            .patch(update_lesson)
            .delete(delete_lesson),
    )
}
