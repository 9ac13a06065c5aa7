use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub course_id: i64,
    pub value: i64,
    pub feedback: Option<String>,
    pub graded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSubmissionRequest {
    #[serde(rename = "submissionId")]
    pub submission_id: i64,
    pub grade: i64,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeStudentRequest {
    pub course_id: i64,
    pub student_id: i64,
    pub grade: i64,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSummary {
    pub value: i64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeEntry {
    pub value: i64,
    pub feedback: Option<String>,
    pub graded_at: String,
}

/// Row of `GET /api/courses/{id}/student-grades/{student_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGrade {
    pub id: i64,
    pub value: i64,
    pub feedback: Option<String>,
    pub graded_at: String,
}

/// Row of `GET /api/courses/{id}/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledStudent {
    pub id: i64,
    pub username: String,
    pub grades: Vec<GradeEntry>,
}

impl From<Grade> for GradeSummary {
    fn from(g: Grade) -> Self {
        Self { value: g.value, feedback: g.feedback }
    }
}

impl From<Grade> for GradeEntry {
    fn from(g: Grade) -> Self {
        Self { value: g.value, feedback: g.feedback, graded_at: g.graded_at }
    }
}

impl From<Grade> for StudentGrade {
    fn from(g: Grade) -> Self {
        Self { id: g.id, value: g.value, feedback: g.feedback, graded_at: g.graded_at }
    }
}
