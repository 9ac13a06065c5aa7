use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::info;

use crate::auth;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{EnrollRequest, MessageResponse};
use crate::state::AppState;

/// Inserts a new enrollment on every call, even for a course the student is
/// already enrolled in.
pub async fn enroll(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .filter(|u| u.is_student())
        .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

    let enrollment = repository::insert_enrollment(&state.db, user.id, req.course_id).await?;
    info!(
        "student {} enrolled in course {} (enrollment {})",
        user.id, enrollment.course_id, enrollment.id
    );

    Ok(Json(MessageResponse::new("Enrolled successfully")))
}
