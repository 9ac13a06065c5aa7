#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lms_backend::api::router;
use lms_backend::config::Config;
use lms_backend::db;
use lms_backend::error::AppError;
use lms_backend::services::ReportExporter;
use lms_backend::state::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "X-LMS-TEST-BOUNDARY";

#[derive(Default)]
pub struct RecordingExporter {
    pub calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ReportExporter for RecordingExporter {
    async fn export(&self, course_id: &str, format: &str) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((course_id.to_string(), format.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub config: Config,
    pub exporter: Arc<RecordingExporter>,
    /// Holds `uploads/` plus room for files outside it.
    pub root: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let upload_folder = root.path().join("uploads");
    std::fs::create_dir_all(&upload_folder).expect("Failed to create upload folder");

    let config = Config {
        upload_folder,
        seed_demo_data: false,
        ..Config::default()
    };

    let pool = db::open_in_memory()
        .await
        .expect("Failed to create database");
    let exporter = Arc::new(RecordingExporter::default());

    let state = AppState {
        db: pool.clone(),
        config: Arc::new(config.clone()),
        exporter: exporter.clone(),
    };

    TestApp {
        router: router(state),
        db: pool,
        config,
        exporter,
        root,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) {
        let (status, _) = self
            .post_json(
                "/api/register",
                None,
                serde_json::json!({ "username": username, "password": password, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register {} failed", username);
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {} failed", username);
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in, returning the token.
    pub async fn signup(&self, username: &str, role: &str) -> String {
        self.register(username, "pass123", role).await;
        self.login(username, "pass123").await
    }

    pub async fn user_id(&self, username: &str) -> i64 {
        let row: (i64,) = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.db)
            .await
            .unwrap();
        row.0
    }

    pub async fn create_course(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .post_json(
                "/api/courses",
                Some(token),
                serde_json::json!({ "title": title, "description": "desc" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["course"]["id"].as_i64().unwrap()
    }

    pub async fn enroll(&self, token: &str, course_id: i64) -> StatusCode {
        self.post_json(
            "/api/enroll",
            Some(token),
            serde_json::json!({ "course_id": course_id }),
        )
        .await
        .0
    }
}

/// Builds a multipart/form-data body from text fields and an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Body {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    Body::from(body)
}

pub fn multipart_request(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(body)
        .unwrap()
}
