mod common;

use axum::http::StatusCode;
use lms_backend::auth;
use lms_backend::config::DEFAULT_SECRET_KEY;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn root_and_api_index_respond() {
    let app = spawn_app().await;

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Backend service running");

    let (status, body) = app.get("/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "/API endpoint called !");

    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_persists_role_as_given() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json(
            "/api/register",
            None,
            json!({ "username": "newuser", "password": "newpass", "role": "student" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");

    let (role, password): (String, String) =
        sqlx::query_as("SELECT role, password FROM users WHERE username = 'newuser'")
            .fetch_one(&app.db)
            .await
            .unwrap();
    assert_eq!(role, "student");
    assert_eq!(password, "newpass");
}

#[tokio::test]
async fn register_accepts_arbitrary_role() {
    let app = spawn_app().await;
    app.register("mallory", "pw", "admin").await;

    let (role,): (String,) = sqlx::query_as("SELECT role FROM users WHERE username = 'mallory'")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(role, "admin");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = spawn_app().await;
    app.register("dup", "pw", "student").await;

    let (status, body) = app
        .post_json(
            "/api/register",
            None,
            json!({ "username": "dup", "password": "other", "role": "teacher" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn login_returns_token_with_identity() {
    let app = spawn_app().await;
    app.register("testuser", "testpass", "student").await;
    let id = app.user_id("testuser").await;

    let token = app.login("testuser", "testpass").await;
    let claims = auth::decode_token(DEFAULT_SECRET_KEY, &token).unwrap();

    assert_eq!(claims.user_id, id);
    assert_eq!(claims.username, "testuser");
    assert_eq!(claims.role, "student");
}

#[tokio::test]
async fn login_with_wrong_credentials_is_401() {
    let app = spawn_app().await;
    app.register("testuser", "testpass", "student").await;

    let (status, body) = app
        .post_json(
            "/api/login",
            None,
            json!({ "username": "testuser", "password": "wrongpass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_query_is_injectable() {
    let app = spawn_app().await;
    app.register("victim", "s3cret", "teacher").await;

    let (status, body) = app
        .post_json(
            "/api/login",
            None,
            json!({ "username": "victim' --", "password": "anything" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let claims = auth::decode_token(DEFAULT_SECRET_KEY, body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.username, "victim");
    assert_eq!(claims.role, "teacher");
}
