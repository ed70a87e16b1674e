use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::jwt::{self, VerifyError};
use crate::error::AppError;
use crate::state::SharedState;

/// The authenticated principal: identity decoded from a verified,
/// non-revoked bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Pull the raw token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthenticated("Missing or malformed authorization header".to_string())
        })?;

        let claims = jwt::verify_token(token, &state.config.jwt_secret).map_err(|e| {
            match e {
                VerifyError::Expired => tracing::debug!("Rejected expired session token"),
                VerifyError::Invalid => tracing::debug!("Rejected token with invalid signature"),
            }
            AppError::Unauthenticated("Invalid or expired token".to_string())
        })?;

        // Revocation is the strong override: a signature-valid, unexpired
        // token is still rejected once blacklisted.
        if state.store.is_token_revoked(token).await? {
            return Err(AppError::Unauthenticated(
                "Invalid or expired token".to_string(),
            ));
        }

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}
