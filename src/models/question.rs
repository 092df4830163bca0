// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'Questions' table in the database.
/// Static reference data, never mutated by the application.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,

    /// The text content of the question.
    pub question_text: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// The correct option letter ('A'..'D').
    pub correct_answer: String,

    /// The exam section this question belongs to (e.g., verbal, quantitative).
    /// Mapped from the database column 'question_type'.
    #[sqlx(rename = "question_type")]
    pub category: String,
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub category: String,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            question_id: q.question_id,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            category: q.category,
        }
    }
}

/// Query parameters for generating an exam paper.
#[derive(Debug, Deserialize)]
pub struct GenerateExamParams {
    pub category: String,
}
