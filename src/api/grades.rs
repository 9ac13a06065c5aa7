use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use tracing::{error, info};

use crate::auth;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{GradeStudentRequest, GradeSubmissionRequest, MessageResponse, StudentGrade};
use crate::state::AppState;

/// Appends a grade to any submission. No token is required.
pub async fn grade_submission(
    State(state): State<AppState>,
    Json(req): Json<GradeSubmissionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let submission = repository::find_submission_by_id(&state.db, req.submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    repository::insert_grade(
        &state.db,
        submission.id,
        submission.course_id,
        req.grade,
        req.feedback,
    )
    .await?;

    Ok(Json(MessageResponse::new("Grade submitted successfully")))
}

pub async fn student_course_grades(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<Vec<StudentGrade>>, AppError> {
    // An unknown user is a server fault here rather than a 404.
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .ok_or_else(|| AppError::Internal("token refers to an unknown user".to_string()))?;

    if user.is_teacher() && !repository::is_course_teacher(&state.db, course_id, user.id).await? {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    } else if user.is_student() && user.id != student_id {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    let grades = repository::fetch_student_course_grades(&state.db, student_id, course_id).await?;
    Ok(Json(grades.into_iter().map(Into::into).collect()))
}

/// Records a grade for an enrolled student. Authorization refusals and the
/// enrollment check pass through; every other failure, token errors and
/// unreadable bodies included, is reported as a generic 500.
pub async fn grade_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GradeStudentRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = match body {
        Ok(Json(req)) => record_grade(&state, &headers, &req).await,
        Err(rejection) => Err(AppError::Internal(rejection.body_text())),
    };

    match result {
        Ok(()) => Ok(Json(MessageResponse::new("Grade submitted successfully"))),
        Err(e @ (AppError::Forbidden(_) | AppError::BadRequest(_))) => Err(e),
        Err(e) => {
            error!("Error submitting grade: {}", e);
            Err(AppError::Internal("Error submitting grade".to_string()))
        }
    }
}

async fn record_grade(
    state: &AppState,
    headers: &HeaderMap,
    req: &GradeStudentRequest,
) -> Result<(), AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, headers)
        .await?
        .filter(|u| u.is_teacher())
        .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

    if !repository::is_course_teacher(&state.db, req.course_id, user.id).await? {
        return Err(AppError::Forbidden(
            "Unauthorized to grade in this course".to_string(),
        ));
    }

    if repository::find_enrollment(&state.db, req.student_id, req.course_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(
            "Student is not enrolled in this course".to_string(),
        ));
    }

    let grade = repository::record_student_grade(&state.db, req).await?;
    info!(
        "teacher {} graded student {} in course {}: {}",
        user.id, req.student_id, req.course_id, grade.value
    );
    Ok(())
}
