// src/db/progress.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::progress::{AnswerInput, AnswerRecord, ExamAttempt, ProgressSummary},
};

/// Percent score rounded to the nearest integer, 0 when nothing attempted.
fn percent(correct: i64, attempted: i64) -> i64 {
    if attempted == 0 {
        return 0;
    }
    ((correct as f64 / attempted as f64) * 100.0).round() as i64
}

/// Persists a completed exam session: one UserProgress row with the derived
/// totals plus one UserAnswers row per answer, in a single transaction.
/// Either everything commits or nothing does.
pub async fn record_attempt(
    pool: &SqlitePool,
    user_id: i64,
    answers: &[AnswerInput],
) -> Result<ExamAttempt, AppError> {
    let questions_attempted = answers.len() as i64;
    let correct_answers = answers.iter().filter(|a| a.is_correct).count() as i64;
    let score = percent(correct_answers, questions_attempted);

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO UserProgress (user_id, questions_attempted, correct_answers, score)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(questions_attempted)
    .bind(correct_answers)
    .bind(score)
    .execute(&mut *tx)
    .await?;

    for answer in answers {
        sqlx::query(
            "INSERT INTO UserAnswers (user_id, question_id, selected_answer, is_correct)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(answer.question_id)
        .bind(&answer.selected_answer)
        .bind(answer.is_correct)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(ExamAttempt {
        user_id,
        questions_attempted,
        correct_answers,
        score,
    })
}

/// Sums attempted and correct counts across all of the user's sessions.
///
/// The percent is derived from the raw sums, not averaged across sessions.
/// Read-only and idempotent; a user with no attempts reports zeroes.
pub async fn summary(pool: &SqlitePool, user_id: i64) -> Result<ProgressSummary, AppError> {
    let (total_attempted, total_correct): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(questions_attempted), 0),
            COALESCE(SUM(correct_answers), 0)
        FROM UserProgress
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ProgressSummary {
        total_attempted,
        total_correct,
        total_score_percent: percent(total_correct, total_attempted),
    })
}

/// Returns every answer the user has recorded, in insertion order.
pub async fn answers_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<AnswerRecord>, AppError> {
    let answers = sqlx::query_as::<_, AnswerRecord>(
        "SELECT user_id, question_id, selected_answer, is_correct
         FROM UserAnswers
         WHERE user_id = ?
         ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(10, 10), 100);
    }

    #[test]
    fn percent_zero_attempted_is_zero() {
        assert_eq!(percent(0, 0), 0);
    }
}
