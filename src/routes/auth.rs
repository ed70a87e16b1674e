use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::credentials;
use crate::auth::extractor::{bearer_token, AuthUser};
use crate::auth::jwt::{self, Claims};
use crate::auth::password;
use crate::error::AppError;
use crate::models::UserView;
use crate::state::SharedState;

/// Returned verbatim whether or not the email exists, so the endpoint
/// cannot be used to enumerate accounts.
pub const RESET_INITIATED_MSG: &str =
    "If an account with that email exists, a reset link has been sent";

const RESET_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserView,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = match credentials::validate(state.store.as_ref(), &req.email, &req.password).await
    {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, AppError::InvalidCredentials) {
                state.login_limiter.record_failure(&req.email);
            }
            return Err(err);
        }
    };

    let claims = Claims::new(&user, state.config.session_ttl_mins);
    let access_token =
        jwt::encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: user.into(),
    }))
}

/// Requires a valid, non-revoked token (the guard), then blacklists it
/// until its own expiry. The unverified decode is only trusted for the
/// embedded `exp` claim.
pub async fn logout(
    State(state): State<SharedState>,
    auth: AuthUser,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        AppError::Unauthenticated("Missing or malformed authorization header".to_string())
    })?;

    let expires_at = jwt::decode_expiry(token).map_err(AppError::BadRequest)?;
    state.store.revoke_token(token, expires_at).await?;

    tracing::info!(user_id = %auth.id, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let Some(user) = state.store.find_user_by_email(&req.email).await? else {
        return Ok(Json(MessageResponse {
            message: RESET_INITIATED_MSG.to_string(),
        }));
    };

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    state.store.set_reset_token(user.id, &token, expires_at).await?;

    // Delivery is out of band; the plaintext token lives only on the user
    // row and in the outgoing message.
    if let Some(mailer) = state.mailer.clone() {
        let reset_url = format!(
            "{}/auth/reset-password?token={token}",
            state.config.base_url
        );
        let email = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&email, &reset_url).await {
                tracing::error!("Failed to send password reset email: {e}");
            }
        });
    } else {
        tracing::warn!(
            "System SMTP not configured. Password reset token for {}: {token}",
            user.email
        );
    }

    Ok(Json(MessageResponse {
        message: RESET_INITIATED_MSG.to_string(),
    }))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let new_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;

    let user = state
        .store
        .redeem_reset_token(&req.token, &new_hash)
        .await?
        .ok_or(AppError::InvalidResetToken)?;

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
