use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::assignments::router::{
    init_assignments_router, init_course_assignments_router, init_lesson_assignments_router,
};
use crate::modules::courses::router::init_courses_router;
use crate::modules::lessons::router::{init_course_lessons_router, init_lessons_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/courses",
                    init_courses_router()
                        .nest("/{id}/lessons", init_course_lessons_router())
                        .nest("/{id}/assignments", init_course_assignments_router()),
                )
                .nest(
                    "/lessons",
                    init_lessons_router()
                        .nest("/{id}/assignments", init_lesson_assignments_router()),
                )
                .nest("/assignments", init_assignments_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
