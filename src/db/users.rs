// src/db/users.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{Role, User, UserOverview},
    utils::hash::{hash_password, verify_password},
};

/// Maps a SQLite UNIQUE violation to the typed conflict error for the
/// column that collided. Anything else propagates as a storage error.
fn map_unique_violation(e: sqlx::Error, username: &str, email: &str) -> AppError {
    let msg = e.to_string();
    if msg.contains("Users.username") {
        AppError::DuplicateUsername(format!("Username '{}' already exists", username))
    } else if msg.contains("Users.email") {
        AppError::DuplicateEmail(format!("Email '{}' is already in use", email))
    } else {
        AppError::from(e)
    }
}

/// Creates a new user with a freshly salted Argon2 hash.
/// Returns the new user's id.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    email: &str,
    role: Role,
) -> Result<i64, AppError> {
    let hashed_password = hash_password(password)?;

    let result = sqlx::query(
        "INSERT INTO Users (username, password, email, user_type) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(&hashed_password)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, username, email))?;

    Ok(result.last_insert_rowid())
}

/// Verifies a username/password pair against the stored hash.
///
/// Returns `Ok(false)` for an unknown user as well as a wrong password, so
/// callers cannot tell which check failed.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT password FROM Users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    match stored {
        Some(hash) => verify_password(password, &hash),
        None => Ok(false),
    }
}

/// Fetches a user by username, failing with `UserNotFound` if absent.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT user_id, username, password, email, user_type FROM Users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::UserNotFound(format!("User '{}' not found", username)))
}

/// Fetches a user by id, failing with `UserNotFound` if absent.
pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT user_id, username, password, email, user_type FROM Users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::UserNotFound(format!("User id {} not found", user_id)))
}

/// Sets a user's role. Re-applying the current role succeeds trivially.
pub async fn set_role(pool: &SqlitePool, username: &str, role: Role) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE Users SET user_type = ? WHERE username = ?")
        .bind(role)
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::UserNotFound(format!(
            "User '{}' not found",
            username
        )));
    }

    Ok(())
}

/// Lists every user together with their lifetime exam totals.
/// Users with no attempts report zeroes.
pub async fn list_with_progress(pool: &SqlitePool) -> Result<Vec<UserOverview>, AppError> {
    let users = sqlx::query_as::<_, UserOverview>(
        r#"
        SELECT
            u.user_id, u.username, u.email, u.user_type,
            COALESCE(SUM(p.questions_attempted), 0) AS total_attempted,
            COALESCE(SUM(p.correct_answers), 0) AS total_correct,
            COALESCE(SUM(p.score), 0) AS total_score
        FROM Users u
        LEFT JOIN UserProgress p ON u.user_id = p.user_id
        GROUP BY u.user_id
        ORDER BY u.user_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
