use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use slate_models::ids::UserId;
use slate_models::roles::Role;
use slate_models::scope::Identity;

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::jwt::verify_token;
use slate_core::errors::AppError;

/// Extractor that validates the JWT and provides the caller's claims.
///
/// Extraction is the identity-resolution step: a missing or undecodable
/// token rejects the request with 401 before any handler code runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID from the token subject.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    /// Resolve the claims into a typed identity.
    ///
    /// An unrecognized role value in the token is a 400, not a 401: the
    /// caller authenticated fine but no predicate can be planned for it.
    pub fn identity(&self) -> Result<Identity, AppError> {
        let user_id = self.user_id()?;
        let role = self
            .0
            .role
            .parse::<Role>()
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("{}", e)))?;

        Ok(Identity::new(user_id, role))
    }

    /// Get the user's email.
    pub fn email(&self) -> &str {
        &self.0.email
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
