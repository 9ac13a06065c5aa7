use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::grade::GradeSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub assignment_id: Option<i64>,
    pub grade: Option<i64>,
    pub feedback: Option<String>,
    pub file_path: Option<String>,
    pub submitted_at: String,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub student_id: i64,
    pub course_id: i64,
    pub assignment_id: Option<i64>,
    pub grade: Option<i64>,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub id: i64,
    pub student_id: i64,
    pub grade: Option<i64>,
    pub feedback: Option<String>,
}

impl From<Submission> for SubmissionDetail {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            student_id: s.student_id,
            grade: s.grade,
            feedback: s.feedback,
        }
    }
}

/// Row of `GET /api/student-submissions/{student_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSubmission {
    pub id: i64,
    pub file_path: Option<String>,
    pub submitted_at: String,
    pub grade: Option<GradeSummary>,
}
