use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{
    Assignment, Course, Enrollment, Grade, GradeStudentRequest, NewAssignmentRequest,
    NewCourseRequest, NewSubmission, RegisterRequest, Submission, User, ROLE_TEACHER,
};

const USER_COLUMNS: &str = "id, username, password, role";
const SUBMISSION_COLUMNS: &str =
    "id, student_id, course_id, assignment_id, grade, feedback, file_path, submitted_at";

// ---- users ----

pub async fn find_user_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_user_by_username(
    db: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(db)
        .await
}

/// Credential lookup built by string concatenation. Input is not escaped,
/// so a crafted username or password rewrites the WHERE clause.
pub async fn find_user_by_credentials(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username='{}' AND password='{}'",
        username, password
    );
    tracing::debug!("login query: {}", sql);

    sqlx::query_as::<_, User>(&sql).fetch_optional(db).await
}

pub async fn insert_user(db: &SqlitePool, req: &RegisterRequest) -> Result<User, sqlx::Error> {
    let id = sqlx::query("INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)")
        .bind(&req.username)
        .bind(&req.password)
        .bind(&req.role)
        .execute(db)
        .await?
        .last_insert_rowid();

    Ok(User {
        id,
        username: req.username.clone(),
        password: req.password.clone(),
        role: req.role.clone(),
    })
}

pub async fn fetch_teacher_names(db: &SqlitePool) -> Result<HashMap<i64, String>, sqlx::Error> {
    let teachers = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = ?"
    ))
    .bind(ROLE_TEACHER)
    .fetch_all(db)
    .await?;

    Ok(teachers.into_iter().map(|u| (u.id, u.username)).collect())
}

// ---- courses ----

pub async fn insert_course(
    db: &SqlitePool,
    teacher_id: i64,
    req: NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let id = sqlx::query("INSERT INTO courses (title, description, teacher_id) VALUES (?1, ?2, ?3)")
        .bind(&req.title)
        .bind(&req.description)
        .bind(teacher_id)
        .execute(db)
        .await?
        .last_insert_rowid();

    Ok(Course {
        id,
        title: req.title,
        description: req.description,
        teacher_id,
    })
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, title, description, teacher_id FROM courses ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn fetch_courses_by_teacher(
    db: &SqlitePool,
    teacher_id: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, title, description, teacher_id FROM courses WHERE teacher_id = ? ORDER BY id",
    )
    .bind(teacher_id)
    .fetch_all(db)
    .await
}

/// True iff a course with this id is owned by this teacher.
pub async fn is_course_teacher(
    db: &SqlitePool,
    course_id: i64,
    teacher_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM courses WHERE id = ? AND teacher_id = ? LIMIT 1")
            .bind(course_id)
            .bind(teacher_id)
            .fetch_optional(db)
            .await?;

    Ok(row.is_some())
}

// ---- assignments ----

pub async fn insert_assignment(
    db: &SqlitePool,
    course_id: i64,
    req: NewAssignmentRequest,
) -> Result<Assignment, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO assignments (title, description, course_id, due_date) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(course_id)
    .bind(&req.due_date)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Assignment {
        id,
        title: req.title,
        description: req.description,
        course_id,
        due_date: req.due_date,
    })
}

pub async fn fetch_assignments_by_course(
    db: &SqlitePool,
    course_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        "SELECT id, title, description, course_id, due_date FROM assignments WHERE course_id = ? ORDER BY id",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn find_assignment_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        "SELECT id, title, description, course_id, due_date FROM assignments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

// ---- enrollments ----

/// Always inserts; an existing enrollment for the same pair is not checked.
pub async fn insert_enrollment(
    db: &SqlitePool,
    student_id: i64,
    course_id: i64,
) -> Result<Enrollment, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let id = sqlx::query(
        "INSERT INTO enrollments (student_id, course_id, enrolled_at) VALUES (?1, ?2, ?3)",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(&now)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Enrollment {
        id,
        student_id,
        course_id,
        enrolled_at: now,
    })
}

pub async fn fetch_enrollments_by_student(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "SELECT id, student_id, course_id, enrolled_at FROM enrollments WHERE student_id = ? ORDER BY id",
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_enrollments_by_course(
    db: &SqlitePool,
    course_id: i64,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "SELECT id, student_id, course_id, enrolled_at FROM enrollments WHERE course_id = ? ORDER BY id",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn find_enrollment(
    db: &SqlitePool,
    student_id: i64,
    course_id: i64,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "SELECT id, student_id, course_id, enrolled_at FROM enrollments WHERE student_id = ? AND course_id = ? LIMIT 1",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

// ---- submissions ----

pub async fn insert_submission(
    db: &SqlitePool,
    new: NewSubmission,
) -> Result<Submission, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let id = sqlx::query(
        r#"
        INSERT INTO submissions
            (student_id, course_id, assignment_id, grade, feedback, file_path, submitted_at)
        VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6)
        "#,
    )
    .bind(new.student_id)
    .bind(new.course_id)
    .bind(new.assignment_id)
    .bind(new.grade)
    .bind(&new.file_path)
    .bind(&now)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Submission {
        id,
        student_id: new.student_id,
        course_id: new.course_id,
        assignment_id: new.assignment_id,
        grade: new.grade,
        feedback: None,
        file_path: new.file_path,
        submitted_at: now,
    })
}

pub async fn find_submission_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_submissions_by_student(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE student_id = ? ORDER BY id"
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

// ---- grades ----

pub async fn insert_grade(
    db: &SqlitePool,
    submission_id: i64,
    course_id: i64,
    value: i64,
    feedback: Option<String>,
) -> Result<Grade, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let id = sqlx::query(
        "INSERT INTO grades (submission_id, course_id, value, feedback, graded_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(submission_id)
    .bind(course_id)
    .bind(value)
    .bind(&feedback)
    .bind(&now)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(Grade {
        id,
        submission_id,
        course_id,
        value,
        feedback,
        graded_at: now,
    })
}

/// Most recently appended grade for a submission.
pub async fn find_latest_grade(
    db: &SqlitePool,
    submission_id: i64,
) -> Result<Option<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(
        r#"
        SELECT id, submission_id, course_id, value, feedback, graded_at
        FROM grades
        WHERE submission_id = ?
        ORDER BY graded_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(submission_id)
    .fetch_optional(db)
    .await
}

/// Grades on the student's submissions to the course, oldest first.
pub async fn fetch_grades_for_course_submissions(
    db: &SqlitePool,
    student_id: i64,
    course_id: i64,
) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(
        r#"
        SELECT g.id, g.submission_id, g.course_id, g.value, g.feedback, g.graded_at
        FROM grades g
        JOIN submissions s ON s.id = g.submission_id
        WHERE s.student_id = ? AND s.course_id = ?
        ORDER BY g.id
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_all(db)
    .await
}

/// Grades recorded against the course for the student, newest first.
pub async fn fetch_student_course_grades(
    db: &SqlitePool,
    student_id: i64,
    course_id: i64,
) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(
        r#"
        SELECT g.id, g.submission_id, g.course_id, g.value, g.feedback, g.graded_at
        FROM grades g
        JOIN submissions s ON s.id = g.submission_id
        WHERE s.student_id = ? AND g.course_id = ?
        ORDER BY g.graded_at DESC, g.id DESC
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_all(db)
    .await
}

/// Writes a submission and its grade in one transaction.
pub async fn record_student_grade(
    db: &SqlitePool,
    req: &GradeStudentRequest,
) -> Result<Grade, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;

    let submission_id = sqlx::query(
        r#"
        INSERT INTO submissions
            (student_id, course_id, assignment_id, grade, feedback, file_path, submitted_at)
        VALUES (?1, ?2, NULL, ?3, NULL, NULL, ?4)
        "#,
    )
    .bind(req.student_id)
    .bind(req.course_id)
    .bind(req.grade)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let grade_id = sqlx::query(
        "INSERT INTO grades (submission_id, course_id, value, feedback, graded_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(submission_id)
    .bind(req.course_id)
    .bind(req.grade)
    .bind(&req.feedback)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    Ok(Grade {
        id: grade_id,
        submission_id,
        course_id: req.course_id,
        value: req.grade,
        feedback: req.feedback.clone(),
        graded_at: now,
    })
}
