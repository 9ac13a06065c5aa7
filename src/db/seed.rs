use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::models::{NewCourseRequest, RegisterRequest, ROLE_TEACHER};

pub const DEFAULT_TEACHER_USERNAME: &str = "john.smith";
pub const DEFAULT_TEACHER_PASSWORD: &str = "teacher123";

const SAMPLE_COURSES: [(&str, &str); 3] = [
    ("Web Security Basics", "Learn about XSS, CSRF, and SQL Injection"),
    ("Network Security", "Understanding network protocols and security measures"),
    ("Machine Learning & AI", "Understanding Supervised and unsupervised learning. "),
];

/// Creates the default teacher and sample courses. Does nothing when the
/// default teacher already exists. Returns whether anything was written.
pub async fn seed_demo_data(db: &SqlitePool) -> Result<bool, sqlx::Error> {
    if repository::find_user_by_username(db, DEFAULT_TEACHER_USERNAME)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let teacher = repository::insert_user(
        db,
        &RegisterRequest {
            username: DEFAULT_TEACHER_USERNAME.to_string(),
            password: DEFAULT_TEACHER_PASSWORD.to_string(),
            role: ROLE_TEACHER.to_string(),
        },
    )
    .await?;
    info!(
        "Default teacher created - username: {}, password: {}",
        DEFAULT_TEACHER_USERNAME, DEFAULT_TEACHER_PASSWORD
    );

    for (title, description) in SAMPLE_COURSES {
        repository::insert_course(
            db,
            teacher.id,
            NewCourseRequest {
                title: title.to_string(),
                description: Some(description.to_string()),
            },
        )
        .await?;
    }
    info!("Sample courses created and assigned to {}", teacher.username);

    Ok(true)
}
