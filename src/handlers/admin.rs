// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{db, error::AppError, models::user::Role};

/// Lists all users with their lifetime exam totals.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = db::users::list_with_progress(&pool).await?;

    Ok(Json(users))
}

/// Promotes a user to admin.
/// Admin only. Promoting an existing admin succeeds trivially.
pub async fn promote_user(
    State(pool): State<SqlitePool>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    db::users::set_role(&pool, &username, Role::Admin).await?;

    tracing::info!("Promoted '{}' to admin", username);

    Ok(Json(json!({
        "username": username,
        "role": Role::Admin,
    })))
}

/// Demotes a user back to student.
/// Admin only.
pub async fn demote_user(
    State(pool): State<SqlitePool>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    db::users::set_role(&pool, &username, Role::Student).await?;

    tracing::info!("Demoted '{}' to student", username);

    Ok(Json(json!({
        "username": username,
        "role": Role::Student,
    })))
}
