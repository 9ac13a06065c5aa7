mod accounts;
mod courses;
mod enrollments;
mod grades;
mod reports;
mod submissions;

use axum::Json;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::MessageResponse;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api", get(api_index))
        .route("/api/register", post(accounts::register))
        .route("/api/login", post(accounts::login))
        .route("/api/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/api/courses/{course_id}/assignments",
            get(courses::list_assignments).post(courses::create_assignment),
        )
        .route("/api/courses/{course_id}/students", get(courses::list_course_students))
        .route(
            "/api/courses/{course_id}/student-grades/{student_id}",
            get(grades::student_course_grades),
        )
        .route("/api/enroll", post(enrollments::enroll))
        .route("/api/grade-submission", post(grades::grade_submission))
        .route("/api/grade/student", post(grades::grade_student))
        .route(
            "/api/student-submissions/{student_id}",
            get(submissions::student_submissions),
        )
        .route("/api/submissions/{submission_id}", get(submissions::get_submission))
        .route(
            "/api/submit-assignment",
            post(submissions::submit_assignment).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/download/{*filename}", get(submissions::download))
        .route("/api/export-grades", post(reports::export_grades))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Backend service running"))
}

async fn api_index() -> Json<MessageResponse> {
    Json(MessageResponse::new("/API endpoint called !"))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
