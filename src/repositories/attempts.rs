use sqlx::{PgExecutor, PgPool};

use crate::db::models::{QuizAttempt, StudentAnswer};

const ATTEMPT_COLUMNS: &str = "\
    id, quiz_id, student_id, attempt_number, status, score, total_points, earned_points, \
    passed, started_at, completed_at, time_spent_minutes";

const ANSWER_COLUMNS: &str = "\
    id, attempt_id, question_id, selected_option_id, is_correct, points_earned, answered_at";

pub(crate) async fn find_in_progress<'e, E: PgExecutor<'e>>(
    executor: E,
    quiz_id: &str,
    student_id: &str,
) -> Result<Option<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts
         WHERE quiz_id = $1 AND student_id = $2 AND status = 'in_progress'"
    ))
    .bind(quiz_id)
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn count_for_student<'e, E: PgExecutor<'e>>(
    executor: E,
    quiz_id: &str,
    student_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM quiz_attempts WHERE quiz_id = $1 AND student_id = $2",
    )
    .bind(quiz_id)
    .bind(student_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    id: &str,
    quiz_id: &str,
    student_id: &str,
    attempt_number: i32,
    started_at: time::PrimitiveDateTime,
) -> Result<QuizAttempt, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "INSERT INTO quiz_attempts (id, quiz_id, student_id, attempt_number, status, started_at)
         VALUES ($1, $2, $3, $4, 'in_progress', $5)
         RETURNING {ATTEMPT_COLUMNS}",
    ))
    .bind(id)
    .bind(quiz_id)
    .bind(student_id)
    .bind(attempt_number)
    .bind(started_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Option<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE id = $1"
    ))
    .bind(attempt_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    quiz_id: &str,
    student_id: &str,
) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts
         WHERE quiz_id = $1 AND student_id = $2
         ORDER BY started_at DESC",
    ))
    .bind(quiz_id)
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Resubmitting the same question replaces the previous answer.
pub(crate) async fn upsert_answer(
    pool: &PgPool,
    id: &str,
    attempt_id: &str,
    question_id: &str,
    selected_option_id: &str,
    is_correct: bool,
    points_earned: i32,
    answered_at: time::PrimitiveDateTime,
) -> Result<StudentAnswer, sqlx::Error> {
    sqlx::query_as::<_, StudentAnswer>(&format!(
        "INSERT INTO student_answers (
            id, attempt_id, question_id, selected_option_id, is_correct,
            points_earned, answered_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         ON CONFLICT (attempt_id, question_id)
         DO UPDATE SET selected_option_id = EXCLUDED.selected_option_id,
                       is_correct = EXCLUDED.is_correct,
                       points_earned = EXCLUDED.points_earned,
                       answered_at = EXCLUDED.answered_at
         RETURNING {ANSWER_COLUMNS}",
    ))
    .bind(id)
    .bind(attempt_id)
    .bind(question_id)
    .bind(selected_option_id)
    .bind(is_correct)
    .bind(points_earned)
    .bind(answered_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_answers(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Vec<StudentAnswer>, sqlx::Error> {
    sqlx::query_as::<_, StudentAnswer>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM student_answers WHERE attempt_id = $1"
    ))
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn earned_points(pool: &PgPool, attempt_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points_earned), 0) FROM student_answers WHERE attempt_id = $1",
    )
    .bind(attempt_id)
    .fetch_one(pool)
    .await
}

pub(crate) struct CompleteAttempt {
    pub(crate) score: i32,
    pub(crate) total_points: i32,
    pub(crate) earned_points: i32,
    pub(crate) passed: bool,
    pub(crate) completed_at: time::PrimitiveDateTime,
    pub(crate) time_spent_minutes: i32,
}

pub(crate) async fn complete(
    pool: &PgPool,
    attempt_id: &str,
    params: CompleteAttempt,
) -> Result<QuizAttempt, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "UPDATE quiz_attempts SET
            status = 'completed',
            score = $1,
            total_points = $2,
            earned_points = $3,
            passed = $4,
            completed_at = $5,
            time_spent_minutes = $6
         WHERE id = $7
         RETURNING {ATTEMPT_COLUMNS}",
    ))
    .bind(params.score)
    .bind(params.total_points)
    .bind(params.earned_points)
    .bind(params.passed)
    .bind(params.completed_at)
    .bind(params.time_spent_minutes)
    .bind(attempt_id)
    .fetch_one(pool)
    .await
}
