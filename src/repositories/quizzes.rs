use sqlx::PgPool;

use crate::db::models::{QuestionOption, Quiz, QuizQuestion};
use crate::db::types::QuestionType;

const QUIZ_COLUMNS: &str = "\
    id, content_id, title, description, passing_score, time_limit_minutes, max_attempts, \
    is_published, show_results_immediately, created_at, updated_at";

const QUESTION_COLUMNS: &str = "\
    id, quiz_id, question_text, question_type, question_order, points, explanation, created_at";

const OPTION_COLUMNS: &str =
    "id, question_id, option_text, option_order, is_correct, created_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) id: &'a str,
    pub(crate) content_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) passing_score: i32,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) max_attempts: i32,
    pub(crate) show_results_immediately: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateQuiz {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) passing_score: Option<i32>,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) max_attempts: Option<i32>,
    pub(crate) show_results_immediately: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (
            id, content_id, title, description, passing_score, time_limit_minutes,
            max_attempts, is_published, show_results_immediately, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,FALSE,$8,$9,$10)
         RETURNING {QUIZ_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.content_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.passing_score)
    .bind(params.time_limit_minutes)
    .bind(params.max_attempts)
    .bind(params.show_results_immediately)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, quiz_id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(quiz_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_content(
    pool: &PgPool,
    content_id: &str,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE content_id = $1"))
        .bind(content_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    quiz_id: &str,
    params: UpdateQuiz,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE quizzes SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            passing_score = COALESCE($3, passing_score),
            time_limit_minutes = COALESCE($4, time_limit_minutes),
            max_attempts = COALESCE($5, max_attempts),
            show_results_immediately = COALESCE($6, show_results_immediately),
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.passing_score)
    .bind(params.time_limit_minutes)
    .bind(params.max_attempts)
    .bind(params.show_results_immediately)
    .bind(params.updated_at)
    .bind(quiz_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_published(
    pool: &PgPool,
    quiz_id: &str,
    is_published: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET is_published = $1, updated_at = $2 WHERE id = $3")
        .bind(is_published)
        .bind(updated_at)
        .bind(quiz_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, quiz_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(quiz_id).execute(pool).await?;
    Ok(())
}

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) quiz_id: &'a str,
    pub(crate) question_text: &'a str,
    pub(crate) question_type: QuestionType,
    pub(crate) points: i32,
    pub(crate) explanation: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create_question(
    pool: &PgPool,
    params: CreateQuestion<'_>,
) -> Result<QuizQuestion, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "INSERT INTO quiz_questions (
            id, quiz_id, question_text, question_type, question_order, points,
            explanation, created_at
         ) VALUES (
            $1, $2, $3, $4,
            (SELECT COALESCE(MAX(question_order), 0) + 1 FROM quiz_questions WHERE quiz_id = $2),
            $5, $6, $7
         )
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.question_text)
    .bind(params.question_type)
    .bind(params.points)
    .bind(params.explanation)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_question(
    pool: &PgPool,
    question_id: &str,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE id = $1"
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct UpdateQuestion {
    pub(crate) question_text: Option<String>,
    pub(crate) points: Option<i32>,
    pub(crate) explanation: Option<String>,
}

pub(crate) async fn update_question(
    pool: &PgPool,
    question_id: &str,
    params: UpdateQuestion,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE quiz_questions SET
            question_text = COALESCE($1, question_text),
            points = COALESCE($2, points),
            explanation = COALESCE($3, explanation)
         WHERE id = $4",
    )
    .bind(params.question_text)
    .bind(params.points)
    .bind(params.explanation)
    .bind(question_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_question(pool: &PgPool, question_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quiz_questions WHERE id = $1")
        .bind(question_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn list_questions(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE quiz_id = $1 ORDER BY question_order"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateOption<'a> {
    pub(crate) id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) option_text: &'a str,
    pub(crate) is_correct: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create_option(
    pool: &PgPool,
    params: CreateOption<'_>,
) -> Result<QuestionOption, sqlx::Error> {
    sqlx::query_as::<_, QuestionOption>(&format!(
        "INSERT INTO question_options (
            id, question_id, option_text, option_order, is_correct, created_at
         ) VALUES (
            $1, $2, $3,
            (SELECT COALESCE(MAX(option_order), 0) + 1 FROM question_options WHERE question_id = $2),
            $4, $5
         )
         RETURNING {OPTION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.question_id)
    .bind(params.option_text)
    .bind(params.is_correct)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_option(
    pool: &PgPool,
    option_id: &str,
) -> Result<Option<QuestionOption>, sqlx::Error> {
    sqlx::query_as::<_, QuestionOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM question_options WHERE id = $1"
    ))
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct UpdateOption {
    pub(crate) option_text: Option<String>,
    pub(crate) is_correct: Option<bool>,
}

pub(crate) async fn update_option(
    pool: &PgPool,
    option_id: &str,
    params: UpdateOption,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE question_options SET
            option_text = COALESCE($1, option_text),
            is_correct = COALESCE($2, is_correct)
         WHERE id = $3",
    )
    .bind(params.option_text)
    .bind(params.is_correct)
    .bind(option_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_option(pool: &PgPool, option_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM question_options WHERE id = $1")
        .bind(option_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn list_options_for_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuestionOption>, sqlx::Error> {
    sqlx::query_as::<_, QuestionOption>(&format!(
        "SELECT o.{} FROM question_options o
         JOIN quiz_questions q ON q.id = o.question_id
         WHERE q.quiz_id = $1
         ORDER BY o.option_order",
        OPTION_COLUMNS.replace(", ", ", o."),
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Course owning a quiz, through content and module. Used by the ownership
/// guard for every quiz mutation.
pub(crate) async fn find_course_id(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT m.course_id FROM quizzes q
         JOIN module_contents mc ON mc.id = q.content_id
         JOIN course_modules m ON m.id = mc.module_id
         WHERE q.id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_course_id_for_question(
    pool: &PgPool,
    question_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT m.course_id FROM quiz_questions qq
         JOIN quizzes q ON q.id = qq.quiz_id
         JOIN module_contents mc ON mc.id = q.content_id
         JOIN course_modules m ON m.id = mc.module_id
         WHERE qq.id = $1",
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_course_id_for_option(
    pool: &PgPool,
    option_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT m.course_id FROM question_options o
         JOIN quiz_questions qq ON qq.id = o.question_id
         JOIN quizzes q ON q.id = qq.quiz_id
         JOIN module_contents mc ON mc.id = q.content_id
         JOIN course_modules m ON m.id = mc.module_id
         WHERE o.id = $1",
    )
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn total_points(pool: &PgPool, quiz_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0) FROM quiz_questions WHERE quiz_id = $1",
    )
    .bind(quiz_id)
    .fetch_one(pool)
    .await
}
