// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::Role;

/// Represents one row of the 'UserProgress' table: a completed exam session.
/// Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamAttempt {
    pub user_id: i64,
    pub questions_attempted: i64,
    pub correct_answers: i64,
    /// Percent score for this session, rounded to the nearest integer.
    pub score: i64,
}

/// Represents one row of the 'UserAnswers' table: a single answered question
/// within a session. Append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub user_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// A graded answer, ready to be persisted as part of an exam attempt.
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// Lifetime totals summed across all of a user's exam attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total_attempted: i64,
    pub total_correct: i64,
    /// Recomputed from the raw sums rather than averaging per-session
    /// scores, which would bias toward short sessions.
    pub total_score_percent: i64,
}

/// One answer as submitted by the client, in presentation order.
#[derive(Debug, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_answer: String,
}

/// DTO for submitting a completed exam session.
#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    /// Ordered list of the user's answers.
    pub answers: Vec<SubmittedAnswer>,
}

/// Aggregated progress data for the current user.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub total_attempted: i64,
    pub total_correct: i64,
    pub total_score_percent: i64,
}
