// src/handlers/exam.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    config::EXAM_QUESTION_COUNT,
    db,
    error::AppError,
    models::{
        progress::{AnswerInput, SubmittedAnswer, SubmitExamRequest},
        question::{GenerateExamParams, PublicQuestion},
        user::Role,
    },
    utils::jwt::Claims,
};

/// Grades submitted answers against the answer key, preserving submission
/// order. An answer referencing an unknown question id is rejected.
fn grade(
    answers: &[SubmittedAnswer],
    key: &HashMap<i64, String>,
) -> Result<Vec<AnswerInput>, AppError> {
    answers
        .iter()
        .map(|a| {
            let correct = key.get(&a.question_id).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown question id {}", a.question_id))
            })?;

            Ok(AnswerInput {
                question_id: a.question_id,
                selected_answer: a.selected_answer.clone(),
                // Strict option-letter matching
                is_correct: &a.selected_answer == correct,
            })
        })
        .collect()
}

/// Generates a random exam paper for the given category.
///
/// Returns up to ten questions with the correct answers stripped out.
/// An empty list means the category has no questions; the client is
/// expected to handle that rather than treat it as a failure.
pub async fn generate_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<GenerateExamParams>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role == Role::Admin {
        return Err(AppError::BadRequest("Admins cannot take exams".to_string()));
    }

    let questions = db::questions::sample(&pool, &params.category, EXAM_QUESTION_COUNT).await?;

    if questions.is_empty() {
        tracing::warn!("No questions available for category '{}'", params.category);
    }

    let paper: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();

    Ok(Json(paper))
}

/// Submits a completed exam session.
///
/// * Grades the ordered answers against the question bank.
/// * Persists the attempt and every answer atomically.
/// * Returns the derived totals and score.
pub async fn submit_exam(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role == Role::Admin {
        return Err(AppError::BadRequest("Admins cannot take exams".to_string()));
    }

    if req.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let question_ids: Vec<i64> = req.answers.iter().map(|a| a.question_id).collect();
    let key = db::questions::answer_key(&pool, &question_ids).await?;

    let graded = grade(&req.answers, &key)?;

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    let attempt = db::progress::record_attempt(&pool, user_id, &graded).await?;

    Ok(Json(serde_json::json!({
        "questions_attempted": attempt.questions_attempted,
        "correct_answers": attempt.correct_answers,
        "score": attempt.score,
        "message": "Exam submitted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(pairs: &[(i64, &str)]) -> HashMap<i64, String> {
        pairs.iter().map(|(id, a)| (*id, a.to_string())).collect()
    }

    fn answer(question_id: i64, selected: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            selected_answer: selected.to_string(),
        }
    }

    #[test]
    fn grade_all_correct() {
        let key = key_of(&[(1, "A"), (2, "B")]);
        let graded = grade(&[answer(1, "A"), answer(2, "B")], &key).unwrap();

        assert_eq!(graded.len(), 2);
        assert!(graded.iter().all(|a| a.is_correct));
    }

    #[test]
    fn grade_half_correct() {
        let key = key_of(&[(1, "A"), (2, "B")]);
        let graded = grade(&[answer(1, "A"), answer(2, "C")], &key).unwrap();

        assert!(graded[0].is_correct);
        assert!(!graded[1].is_correct);
    }

    #[test]
    fn grade_preserves_order() {
        let key = key_of(&[(7, "A"), (3, "B"), (5, "C")]);
        let graded = grade(&[answer(5, "C"), answer(7, "D"), answer(3, "B")], &key).unwrap();

        let ids: Vec<i64> = graded.iter().map(|a| a.question_id).collect();
        assert_eq!(ids, vec![5, 7, 3]);
    }

    #[test]
    fn grade_rejects_unknown_question() {
        let key = key_of(&[(1, "A")]);
        let result = grade(&[answer(99, "A")], &key);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
