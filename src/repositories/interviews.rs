use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::db::models::{Interview, InterviewAnswer, InterviewAttempt, InterviewQuestion};

const INTERVIEW_COLUMNS: &str = "\
    id, course_id, title, description, job_role, difficulty, time_limit_minutes, \
    is_published, ai_generated, created_at, updated_at";

const QUESTION_COLUMNS: &str = "\
    id, interview_id, question_text, sample_answer, key_points, difficulty, \
    question_order, created_at";

const ATTEMPT_COLUMNS: &str = "\
    id, interview_id, student_id, status, total_questions, overall_score, \
    started_at, completed_at";

const ANSWER_COLUMNS: &str = "\
    id, attempt_id, question_id, answer_text, ai_score, ai_feedback, strengths, \
    improvements, answered_at";

pub(crate) struct CreateInterview<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) job_role: &'a str,
    pub(crate) difficulty: &'a str,
    pub(crate) time_limit_minutes: i32,
    pub(crate) ai_generated: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create<'e, E: PgExecutor<'e>>(
    executor: E,
    params: CreateInterview<'_>,
) -> Result<Interview, sqlx::Error> {
    sqlx::query_as::<_, Interview>(&format!(
        "INSERT INTO interviews (
            id, course_id, title, description, job_role, difficulty,
            time_limit_minutes, is_published, ai_generated, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,FALSE,$8,$9,$9)
         RETURNING {INTERVIEW_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.job_role)
    .bind(params.difficulty)
    .bind(params.time_limit_minutes)
    .bind(params.ai_generated)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) interview_id: &'a str,
    pub(crate) question_text: &'a str,
    pub(crate) sample_answer: &'a str,
    pub(crate) key_points: &'a [String],
    pub(crate) difficulty: &'a str,
    pub(crate) question_order: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create_question<'e, E: PgExecutor<'e>>(
    executor: E,
    params: CreateQuestion<'_>,
) -> Result<InterviewQuestion, sqlx::Error> {
    sqlx::query_as::<_, InterviewQuestion>(&format!(
        "INSERT INTO interview_questions (
            id, interview_id, question_text, sample_answer, key_points,
            difficulty, question_order, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.interview_id)
    .bind(params.question_text)
    .bind(params.sample_answer)
    .bind(Json(params.key_points))
    .bind(params.difficulty)
    .bind(params.question_order)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    interview_id: &str,
) -> Result<Option<Interview>, sqlx::Error> {
    sqlx::query_as::<_, Interview>(&format!(
        "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1"
    ))
    .bind(interview_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
    published_only: bool,
) -> Result<Vec<Interview>, sqlx::Error> {
    let mut sql = format!(
        "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE course_id = $1"
    );
    if published_only {
        sql.push_str(" AND is_published = TRUE");
    }
    sql.push_str(" ORDER BY created_at DESC");
    sqlx::query_as::<_, Interview>(&sql)
        .bind(course_id)
        .fetch_all(pool)
        .await
}

pub(crate) async fn set_published(
    pool: &PgPool,
    interview_id: &str,
    is_published: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<Option<Interview>, sqlx::Error> {
    sqlx::query_as::<_, Interview>(&format!(
        "UPDATE interviews SET is_published = $1, updated_at = $2 WHERE id = $3
         RETURNING {INTERVIEW_COLUMNS}",
    ))
    .bind(is_published)
    .bind(updated_at)
    .bind(interview_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, interview_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM interviews WHERE id = $1")
        .bind(interview_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_questions(
    pool: &PgPool,
    interview_id: &str,
) -> Result<Vec<InterviewQuestion>, sqlx::Error> {
    sqlx::query_as::<_, InterviewQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM interview_questions
         WHERE interview_id = $1 ORDER BY question_order",
    ))
    .bind(interview_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_questions(
    pool: &PgPool,
    interview_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM interview_questions WHERE interview_id = $1",
    )
    .bind(interview_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_question(
    pool: &PgPool,
    question_id: &str,
) -> Result<Option<InterviewQuestion>, sqlx::Error> {
    sqlx::query_as::<_, InterviewQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM interview_questions WHERE id = $1"
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn create_attempt(
    pool: &PgPool,
    id: &str,
    interview_id: &str,
    student_id: &str,
    total_questions: i32,
    started_at: time::PrimitiveDateTime,
) -> Result<InterviewAttempt, sqlx::Error> {
    sqlx::query_as::<_, InterviewAttempt>(&format!(
        "INSERT INTO interview_attempts (
            id, interview_id, student_id, status, total_questions, started_at
         ) VALUES ($1,$2,$3,'in_progress',$4,$5)
         RETURNING {ATTEMPT_COLUMNS}",
    ))
    .bind(id)
    .bind(interview_id)
    .bind(student_id)
    .bind(total_questions)
    .bind(started_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_attempt(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Option<InterviewAttempt>, sqlx::Error> {
    sqlx::query_as::<_, InterviewAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM interview_attempts WHERE id = $1"
    ))
    .bind(attempt_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_attempts_for_student(
    pool: &PgPool,
    interview_id: &str,
    student_id: &str,
) -> Result<Vec<InterviewAttempt>, sqlx::Error> {
    sqlx::query_as::<_, InterviewAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM interview_attempts
         WHERE interview_id = $1 AND student_id = $2
         ORDER BY started_at DESC",
    ))
    .bind(interview_id)
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct UpsertAnswer<'a> {
    pub(crate) id: &'a str,
    pub(crate) attempt_id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) answer_text: &'a str,
    pub(crate) ai_score: i32,
    pub(crate) ai_feedback: &'a str,
    pub(crate) strengths: &'a [String],
    pub(crate) improvements: &'a [String],
    pub(crate) answered_at: time::PrimitiveDateTime,
}

/// Answering the same question again replaces the previous evaluation.
pub(crate) async fn upsert_answer(
    pool: &PgPool,
    params: UpsertAnswer<'_>,
) -> Result<InterviewAnswer, sqlx::Error> {
    sqlx::query_as::<_, InterviewAnswer>(&format!(
        "INSERT INTO interview_answers (
            id, attempt_id, question_id, answer_text, ai_score, ai_feedback,
            strengths, improvements, answered_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         ON CONFLICT (attempt_id, question_id)
         DO UPDATE SET answer_text = EXCLUDED.answer_text,
                       ai_score = EXCLUDED.ai_score,
                       ai_feedback = EXCLUDED.ai_feedback,
                       strengths = EXCLUDED.strengths,
                       improvements = EXCLUDED.improvements,
                       answered_at = EXCLUDED.answered_at
         RETURNING {ANSWER_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.attempt_id)
    .bind(params.question_id)
    .bind(params.answer_text)
    .bind(params.ai_score)
    .bind(params.ai_feedback)
    .bind(Json(params.strengths))
    .bind(Json(params.improvements))
    .bind(params.answered_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_answers(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Vec<InterviewAnswer>, sqlx::Error> {
    sqlx::query_as::<_, InterviewAnswer>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM interview_answers
         WHERE attempt_id = $1 ORDER BY answered_at",
    ))
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn complete_attempt(
    pool: &PgPool,
    attempt_id: &str,
    overall_score: Option<i32>,
    completed_at: time::PrimitiveDateTime,
) -> Result<InterviewAttempt, sqlx::Error> {
    sqlx::query_as::<_, InterviewAttempt>(&format!(
        "UPDATE interview_attempts SET
            status = 'completed', overall_score = $1, completed_at = $2
         WHERE id = $3
         RETURNING {ATTEMPT_COLUMNS}",
    ))
    .bind(overall_score)
    .bind(completed_at)
    .bind(attempt_id)
    .fetch_one(pool)
    .await
}

/// Used by the ownership guard for every interview mutation.
pub(crate) async fn find_course_id(
    pool: &PgPool,
    interview_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT course_id FROM interviews WHERE id = $1")
        .bind(interview_id)
        .fetch_optional(pool)
        .await
}
