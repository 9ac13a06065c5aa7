use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{MessageResponse, NewSubmission, StudentSubmission, SubmissionDetail};
use crate::state::AppState;
use crate::storage;

/// Lists any student's submissions; the caller is not checked.
pub async fn student_submissions(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<StudentSubmission>>, AppError> {
    let submissions = repository::fetch_submissions_by_student(&state.db, student_id).await?;

    let mut rows = Vec::with_capacity(submissions.len());
    for sub in submissions {
        let grade = repository::find_latest_grade(&state.db, sub.id).await?;
        rows.push(StudentSubmission {
            id: sub.id,
            file_path: sub.file_path,
            submitted_at: sub.submitted_at,
            grade: grade.map(Into::into),
        });
    }

    Ok(Json(rows))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> Result<Json<SubmissionDetail>, AppError> {
    let submission = repository::find_submission_by_id(&state.db, submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    Ok(Json(submission.into()))
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    assignment_id: Option<String>,
    student_id: Option<String>,
    course_id: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some((filename, bytes.to_vec()));
            }
            "assignment_id" | "student_id" | "course_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let slot = match name.as_str() {
                    "assignment_id" => &mut form.assignment_id,
                    "student_id" => &mut form.student_id,
                    _ => &mut form.course_id,
                };
                *slot = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn parse_id(field: &str, value: Option<&str>) -> Result<Option<i64>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be an integer", field))),
        None => Ok(None),
    }
}

/// Stores the uploaded file under its sanitized name, overwriting any
/// earlier file of that name, and records a submission. The student id
/// is taken from the form, not from a token. Without an assignment the
/// form must carry a course id.
pub async fn submit_assignment(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let (original_name, bytes) = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let student_id = parse_id("student_id", form.student_id.as_deref())?
        .ok_or_else(|| AppError::BadRequest("student_id is required".to_string()))?;
    let assignment_id = parse_id("assignment_id", form.assignment_id.as_deref())?;

    let course_id = match assignment_id {
        Some(id) => {
            repository::find_assignment_by_id(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?
                .course_id
        }
        None => parse_id("course_id", form.course_id.as_deref())?
            .ok_or_else(|| AppError::BadRequest("course_id or assignment_id is required".to_string()))?,
    };

    let filename = storage::secure_filename(&original_name);
    if filename.is_empty() {
        return Err(AppError::BadRequest("Invalid filename".to_string()));
    }
    storage::save_upload(&state.config.upload_folder, &filename, &bytes).await?;

    let submission = repository::insert_submission(
        &state.db,
        NewSubmission {
            student_id,
            course_id,
            assignment_id,
            grade: None,
            file_path: Some(filename),
        },
    )
    .await?;
    tracing::info!("submission {} stored for student {}", submission.id, student_id);

    Ok(Json(MessageResponse::new("Assignment submitted successfully")))
}

/// Serves a file from the upload folder. The requested path is joined
/// without validation and no token is required.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = storage::read_upload(&state.config.upload_folder, &filename).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.essence_str().to_string())], bytes))
}
