use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::access::Principal;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{Claims, verify_token};

/// Extractor that validates the bearer token and exposes the verified
/// claims. The token itself is issued by the external identity provider;
/// this service only checks the signature and expiry.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// The principal handed to the access-control evaluator.
    pub fn principal(&self) -> Result<Principal, AppError> {
        Ok(Principal {
            id: self.user_id()?,
            role: self.role(),
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor for routes reserved to instructors and admins (course,
/// lesson and assignment management). Ownership of the specific course is
/// still checked against the database by the service layer; this only
/// rejects principals whose role could never pass.
#[derive(Debug)]
pub struct RequireInstructor(pub AuthUser);

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        match auth_user.role() {
            UserRole::Instructor | UserRole::Admin => Ok(RequireInstructor(auth_user)),
            UserRole::Student => Err(AppError::forbidden(anyhow::anyhow!(
                "You do not have permission to perform this action"
            ))),
        }
    }
}
