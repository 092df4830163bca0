// src/handlers/progress.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::progress::ProgressResponse,
    utils::jwt::Claims,
};

/// Get the current user's identity and lifetime exam totals.
pub async fn get_my_progress(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let user = db::users::find_by_id(&pool, user_id).await?;
    let summary = db::progress::summary(&pool, user_id).await?;

    Ok(Json(ProgressResponse {
        user_id: user.user_id,
        username: user.username,
        email: user.email,
        role: user.role,
        total_attempted: summary.total_attempted,
        total_correct: summary.total_correct,
        total_score_percent: summary.total_score_percent,
    }))
}
