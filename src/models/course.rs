use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    /// Rendered unescaped by clients.
    pub description: Option<String>,
    pub teacher_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseCreatedResponse {
    pub message: String,
    pub course: Course,
}

/// Row of `GET /api/courses`. `enrolled` is only present for students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListing {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub teacher_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<bool>,
}
