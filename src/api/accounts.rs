use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::auth;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if repository::find_user_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    let user = repository::insert_user(&state.db, &req).await?;
    info!("registered user {} ({}) as {}", user.username, user.id, user.role);

    Ok(Json(MessageResponse::new("Registration successful")))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = repository::find_user_by_credentials(&state.db, &req.username, &req.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let token = auth::issue_token(&state.config.secret_key, &user)?;
    info!("user {} logged in", user.username);

    Ok(Json(LoginResponse { token }))
}
