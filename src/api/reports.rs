use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::error::AppError;
use crate::models::{ExportRequest, MessageResponse};
use crate::state::AppState;

/// Always answers "Export completed"; exporter failures are only logged.
pub async fn export_grades(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if let Err(e) = state.exporter.export(&req.course_arg(), &req.format).await {
        warn!("grade export failed: {}", e);
    }

    Ok(Json(MessageResponse::new("Export completed")))
}
