#[allow(unused_imports)]
use sqlx::PgPool;
use uuid::Uuid;

use learnhub::config::cors::CorsConfig;
use learnhub::config::jwt::JwtConfig;
use learnhub::modules::users::model::UserRole;
use learnhub::router::init_router;
use learnhub::state::AppState;
use learnhub::utils::jwt::create_access_token;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    };
    init_router(state)
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Inserts a user and mints a bearer token for them with the test secret,
/// standing in for the external identity provider.
pub async fn create_test_user(pool: &PgPool, role: UserRole) -> TestUser {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (first_name, last_name, email, role)
           VALUES ('Test', 'User', $1, $2) RETURNING id"#,
    )
    .bind(format!("test-{}@test.com", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id, role, &test_jwt_config()).unwrap();

    TestUser { id, token }
}

#[allow(dead_code)]
pub async fn create_test_course(pool: &PgPool, instructor_id: Uuid, published: bool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO courses (title, description, category, instructor_id, published)
           VALUES ('Test Course', 'A test course', 'programming', $1, $2)
           RETURNING id"#,
    )
    .bind(instructor_id)
    .bind(published)
    .fetch_one(pool)
    .await
    .unwrap()
}
