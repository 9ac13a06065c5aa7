use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use crate::auth;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Assignment, CourseCreatedResponse, CourseListing, EnrolledStudent, NewAssignmentRequest,
    NewCourseRequest,
};
use crate::state::AppState;

pub async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<CourseCreatedResponse>, AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .filter(|u| u.is_teacher())
        .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

    let course = repository::insert_course(&state.db, user.id, req).await?;
    tracing::info!("teacher {} created course {}", user.id, course.id);

    Ok(Json(CourseCreatedResponse {
        message: "Course created successfully".to_string(),
        course,
    }))
}

/// Teachers see their own courses; everyone else sees every course with an
/// `enrolled` flag.
pub async fn list_courses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CourseListing>>, AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_teacher() {
        let courses = repository::fetch_courses_by_teacher(&state.db, user.id).await?;
        let listings = courses
            .into_iter()
            .map(|c| CourseListing {
                id: c.id,
                title: c.title,
                description: c.description,
                teacher_id: c.teacher_id,
                teacher_name: user.username.clone(),
                enrolled: None,
            })
            .collect();
        return Ok(Json(listings));
    }

    let courses = repository::fetch_courses(&state.db).await?;
    let enrolled_ids: Vec<i64> = repository::fetch_enrollments_by_student(&state.db, user.id)
        .await?
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    let teachers = repository::fetch_teacher_names(&state.db).await?;

    let listings = courses
        .into_iter()
        .map(|c| CourseListing {
            enrolled: Some(enrolled_ids.contains(&c.id)),
            teacher_name: teachers
                .get(&c.teacher_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Teacher".to_string()),
            id: c.id,
            title: c.title,
            description: c.description,
            teacher_id: c.teacher_id,
        })
        .collect();

    Ok(Json(listings))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let assignments = repository::fetch_assignments_by_course(&state.db, course_id).await?;
    Ok(Json(assignments))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<NewAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .filter(|u| u.is_teacher())
        .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

    if !repository::is_course_teacher(&state.db, course_id, user.id).await? {
        return Err(AppError::Forbidden(
            "You are not authorized to add assignments to this course".to_string(),
        ));
    }

    let assignment = repository::insert_assignment(&state.db, course_id, req).await?;
    Ok(Json(assignment))
}

/// One row per enrollment, so a student enrolled twice is listed twice.
pub async fn list_course_students(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<EnrolledStudent>>, AppError> {
    let user = auth::authenticate(&state.db, &state.config.secret_key, &headers)
        .await?
        .filter(|u| u.is_teacher())
        .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

    if !repository::is_course_teacher(&state.db, course_id, user.id).await? {
        return Err(AppError::Forbidden(
            "You are not authorized to view students in this course".to_string(),
        ));
    }

    let enrollments = repository::fetch_enrollments_by_course(&state.db, course_id).await?;
    let mut students = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let student = repository::find_user_by_id(&state.db, enrollment.student_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("enrolled student {} is missing", enrollment.student_id))
            })?;
        let grades =
            repository::fetch_grades_for_course_submissions(&state.db, student.id, course_id)
                .await?;

        students.push(EnrolledStudent {
            id: student.id,
            username: student.username,
            grades: grades.into_iter().map(Into::into).collect(),
        });
    }

    Ok(Json(students))
}
