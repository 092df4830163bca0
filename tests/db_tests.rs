// tests/db_tests.rs
//
// Exercises the data layer directly against an in-memory SQLite database,
// without going through the HTTP surface.

use prepfox::db;
use prepfox::error::AppError;
use prepfox::models::progress::AnswerInput;
use prepfox::models::user::Role;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

async fn seed_question(pool: &SqlitePool, category: &str, correct: &str) -> i64 {
    sqlx::query(
        "INSERT INTO Questions
         (question_text, option_a, option_b, option_c, option_d, correct_answer, question_type)
         VALUES (?, 'first', 'second', 'third', 'fourth', ?, ?)",
    )
    .bind(format!("A {} question", category))
    .bind(correct)
    .bind(category)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

fn answer(question_id: i64, selected: &str, is_correct: bool) -> AnswerInput {
    AnswerInput {
        question_id,
        selected_answer: selected.to_string(),
        is_correct,
    }
}

#[tokio::test]
async fn create_user_then_authenticate() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
        .await
        .unwrap();

    assert!(
        db::users::authenticate(&pool, "alice", "password123")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn authenticate_wrong_password_is_false() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
        .await
        .unwrap();

    // False, not an error
    assert!(
        !db::users::authenticate(&pool, "alice", "wrong")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn authenticate_unknown_user_is_false() {
    let pool = test_pool().await;

    assert!(
        !db::users::authenticate(&pool, "nobody", "password123")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
        .await
        .unwrap();

    let err = db::users::create_user(&pool, "alice", "hunter2", "other@example.com", Role::Student)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateUsername(_)));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
        .await
        .unwrap();

    let err = db::users::create_user(&pool, "bob", "hunter2", "alice@example.com", Role::Student)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateEmail(_)));
}

#[tokio::test]
async fn record_then_summary() {
    let pool = test_pool().await;

    let user_id =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();
    let q1 = seed_question(&pool, "VERBAL ABILITY", "A").await;
    let q2 = seed_question(&pool, "VERBAL ABILITY", "B").await;

    let attempt = db::progress::record_attempt(
        &pool,
        user_id,
        &[answer(q1, "A", true), answer(q2, "C", false)],
    )
    .await
    .unwrap();

    assert_eq!(attempt.questions_attempted, 2);
    assert_eq!(attempt.correct_answers, 1);
    assert_eq!(attempt.score, 50);

    let summary = db::progress::summary(&pool, user_id).await.unwrap();
    assert_eq!(summary.total_attempted, 2);
    assert_eq!(summary.total_correct, 1);
    assert_eq!(summary.total_score_percent, 50);
}

#[tokio::test]
async fn summary_recomputes_from_raw_counts() {
    let pool = test_pool().await;

    let user_id =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();
    let q1 = seed_question(&pool, "VERBAL ABILITY", "A").await;
    let q2 = seed_question(&pool, "VERBAL ABILITY", "B").await;
    let q3 = seed_question(&pool, "VERBAL ABILITY", "C").await;

    // Session 1: 1/2 correct (50%). Session 2: 3/3 correct (100%).
    db::progress::record_attempt(&pool, user_id, &[answer(q1, "A", true), answer(q2, "A", false)])
        .await
        .unwrap();
    db::progress::record_attempt(
        &pool,
        user_id,
        &[answer(q1, "A", true), answer(q2, "B", true), answer(q3, "C", true)],
    )
    .await
    .unwrap();

    // 4/5 = 80%, not the per-session average of 75%.
    let summary = db::progress::summary(&pool, user_id).await.unwrap();
    assert_eq!(summary.total_attempted, 5);
    assert_eq!(summary.total_correct, 4);
    assert_eq!(summary.total_score_percent, 80);
}

#[tokio::test]
async fn summary_is_idempotent() {
    let pool = test_pool().await;

    let user_id =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();
    let q1 = seed_question(&pool, "VERBAL ABILITY", "A").await;

    db::progress::record_attempt(&pool, user_id, &[answer(q1, "A", true)])
        .await
        .unwrap();

    let first = db::progress::summary(&pool, user_id).await.unwrap();
    let second = db::progress::summary(&pool, user_id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn summary_without_attempts_is_zero() {
    let pool = test_pool().await;

    let user_id =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();

    let summary = db::progress::summary(&pool, user_id).await.unwrap();
    assert_eq!(summary.total_attempted, 0);
    assert_eq!(summary.total_correct, 0);
    assert_eq!(summary.total_score_percent, 0);
}

#[tokio::test]
async fn answers_roundtrip_and_reference_questions() {
    let pool = test_pool().await;

    let user_id =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();
    let q1 = seed_question(&pool, "VERBAL ABILITY", "A").await;
    let q2 = seed_question(&pool, "VERBAL ABILITY", "B").await;

    db::progress::record_attempt(&pool, user_id, &[answer(q1, "A", true), answer(q2, "D", false)])
        .await
        .unwrap();

    let records = db::progress::answers_for_user(&pool, user_id).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question_id, q1);
    assert_eq!(records[0].selected_answer, "A");
    assert!(records[0].is_correct);
    assert_eq!(records[1].question_id, q2);
    assert_eq!(records[1].selected_answer, "D");
    assert!(!records[1].is_correct);

    // Every recorded answer points at a real question.
    for record in &records {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT question_id FROM Questions WHERE question_id = ?")
                .bind(record.question_id)
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(exists.is_some());
    }
}

#[tokio::test]
async fn sample_returns_whole_category_when_small() {
    let pool = test_pool().await;

    for _ in 0..3 {
        seed_question(&pool, "VERBAL ABILITY", "A").await;
    }
    for _ in 0..5 {
        seed_question(&pool, "QUANTITATIVE REASONING", "B").await;
    }

    let questions = db::questions::sample(&pool, "VERBAL ABILITY", 10).await.unwrap();

    assert_eq!(questions.len(), 3);
    assert!(questions.iter().all(|q| q.category == "VERBAL ABILITY"));

    let mut ids: Vec<i64> = questions.iter().map(|q| q.question_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "sample must not repeat questions");
}

#[tokio::test]
async fn sample_caps_at_requested_count() {
    let pool = test_pool().await;

    for _ in 0..12 {
        seed_question(&pool, "SUBJECT KNOWLEDGE", "C").await;
    }

    let questions = db::questions::sample(&pool, "SUBJECT KNOWLEDGE", 10).await.unwrap();
    assert_eq!(questions.len(), 10);
}

#[tokio::test]
async fn sample_empty_category_is_empty_not_error() {
    let pool = test_pool().await;

    let questions = db::questions::sample(&pool, "NO SUCH CATEGORY", 10).await.unwrap();
    assert!(questions.is_empty());
}

#[tokio::test]
async fn promote_then_demote() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
        .await
        .unwrap();

    db::users::set_role(&pool, "alice", Role::Admin).await.unwrap();
    let user = db::users::find_by_username(&pool, "alice").await.unwrap();
    assert_eq!(user.role, Role::Admin);

    db::users::set_role(&pool, "alice", Role::Student).await.unwrap();
    let user = db::users::find_by_username(&pool, "alice").await.unwrap();
    assert_eq!(user.role, Role::Student);
}

#[tokio::test]
async fn promote_existing_admin_succeeds() {
    let pool = test_pool().await;

    db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Admin)
        .await
        .unwrap();

    db::users::set_role(&pool, "alice", Role::Admin).await.unwrap();
}

#[tokio::test]
async fn set_role_unknown_user_fails() {
    let pool = test_pool().await;

    let err = db::users::set_role(&pool, "nobody", Role::Admin).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

#[tokio::test]
async fn roster_aggregates_per_user() {
    let pool = test_pool().await;

    let alice =
        db::users::create_user(&pool, "alice", "password123", "alice@example.com", Role::Student)
            .await
            .unwrap();
    db::users::create_user(&pool, "bob", "password123", "bob@example.com", Role::Student)
        .await
        .unwrap();

    let q1 = seed_question(&pool, "VERBAL ABILITY", "A").await;
    db::progress::record_attempt(&pool, alice, &[answer(q1, "A", true)])
        .await
        .unwrap();

    let roster = db::users::list_with_progress(&pool).await.unwrap();
    assert_eq!(roster.len(), 2);

    let alice_row = roster.iter().find(|u| u.username == "alice").unwrap();
    assert_eq!(alice_row.total_attempted, 1);
    assert_eq!(alice_row.total_correct, 1);

    // No attempts yet: totals are zero, not NULL.
    let bob_row = roster.iter().find(|u| u.username == "bob").unwrap();
    assert_eq!(bob_row.total_attempted, 0);
    assert_eq!(bob_row.total_correct, 0);
    assert_eq!(bob_row.total_score, 0);
}
