use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::{bearer_token, AuthUser};
use crate::auth::jwt;
use crate::auth::password;
use crate::error::AppError;
use crate::models::UserView;
use crate::state::SharedState;
use crate::store::UserChanges;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;
    let user = state.store.create_user(&req.email, &pw_hash, &req.name).await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn list(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<UserView>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

pub async fn get(
    State(state): State<SharedState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, AppError> {
    let user = state
        .store
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<SharedState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, AppError> {
    let password_hash = match &req.password {
        Some(pw) if pw.len() < 8 => {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Some(pw) => Some(password::hash(pw).map_err(AppError::Internal)?),
        None => None,
    };

    let user = state
        .store
        .update_user(
            id,
            UserChanges {
                name: req.name,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Deletes the account and revokes the caller's own session token. The
/// blacklist row uses the token's real expiry when the claim decodes,
/// with a 1-hour fallback otherwise.
pub async fn remove(
    State(state): State<SharedState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if state.store.find_user_by_id(id).await?.is_none() {
        return Ok(Json(DeleteResponse {
            success: false,
            message: "User not found".to_string(),
        }));
    }

    if let Some(token) = bearer_token(&headers) {
        let expires_at =
            jwt::decode_expiry(token).unwrap_or_else(|_| Utc::now() + Duration::hours(1));
        state.store.revoke_token(token, expires_at).await?;
    }

    state.store.delete_user(id).await?;

    tracing::info!(user_id = %id, deleted_by = %auth.id, "User deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}
