use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::User;

pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub exp: i64,
}

pub fn issue_token(secret: &str, user: &User) -> Result<String, AppError> {
    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Text after the last `Bearer ` in the Authorization header. A header
/// without the prefix is returned whole; a missing header yields "".
pub fn bearer_token(headers: &HeaderMap) -> String {
    let value = headers
        .get(AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    match value.rsplit_once("Bearer ") {
        Some((_, token)) => token.to_string(),
        None => value,
    }
}

/// Decodes the request's token and loads the user it names. The user may
/// have been removed since the token was issued, hence the Option.
pub async fn authenticate(
    db: &SqlitePool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<Option<User>, AppError> {
    let claims = decode_token(secret, &bearer_token(headers))?;
    Ok(repository::find_user_by_id(db, claims.user_id).await?)
}
