// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    db,
    error::AppError,
    models::user::{LoginRequest, Role, SignupRequest},
    utils::jwt::sign_jwt,
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. New signups always
/// start as students; only an admin can change a role afterwards.
/// Returns 201 Created with the new user's id.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = db::users::create_user(
        &pool,
        &payload.username,
        &payload.password,
        &payload.email,
        Role::Student,
    )
    .await?;

    tracing::info!("Registered user '{}' (id {})", payload.username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user_id": user_id,
            "username": payload.username,
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// A failed login is always the same 401, regardless of whether the
/// username or the password was wrong.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let is_valid = db::users::authenticate(&pool, &payload.username, &payload.password).await?;

    if !is_valid {
        return Err(AppError::AuthError(
            "Invalid username or password".to_string(),
        ));
    }

    let user = db::users::find_by_username(&pool, &payload.username).await?;

    let token = sign_jwt(
        user.user_id,
        user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": user.role,
    })))
}
