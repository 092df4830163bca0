// src/db/questions.rs

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{error::AppError, models::question::Question};

/// Samples up to `count` questions of the given category uniformly at
/// random, without replacement.
///
/// Returns fewer than `count` rows (possibly none) when the category has
/// fewer available. An empty result is normal, not an error.
pub async fn sample(
    pool: &SqlitePool,
    category: &str,
    count: i64,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT question_id, question_text, option_a, option_b, option_c, option_d,
               correct_answer, question_type
        FROM Questions
        WHERE question_type = ?
        ORDER BY RANDOM()
        LIMIT ?
        "#,
    )
    .bind(category)
    .bind(count)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// Fetches the correct option letter for each of the given question ids.
/// Unknown ids are simply absent from the returned map.
pub async fn answer_key(
    pool: &SqlitePool,
    question_ids: &[i64],
) -> Result<HashMap<i64, String>, AppError> {
    if question_ids.is_empty() {
        return Ok(HashMap::new());
    }

    // Dynamic IN clause
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT question_id, correct_answer FROM Questions WHERE question_id IN (",
    );

    let mut separated = query_builder.separated(",");
    for id in question_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows: Vec<(i64, String)> = query_builder.build_query_as().fetch_all(pool).await?;

    Ok(rows.into_iter().collect())
}
