use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, whole_minutes_between};
use crate::db::models::{QuizAttempt, User};
use crate::db::types::{AttemptStatus, UserRole};
use crate::repositories;
use crate::schemas::quiz::{
    AnswerSubmit, AttemptResponse, AttemptResultResponse, StudentAnswerResponse,
};
use crate::services::access::{self, Viewer};

use crate::api::guards::CurrentUser;

use super::helpers;

/// Resume-or-insert. A partial unique index on open attempts makes the
/// concurrent double-start collapse onto one row.
pub(super) async fn start_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<(StatusCode, Json<AttemptResponse>), ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;
    if !quiz.is_published {
        return Err(ApiError::NotFound(format!("Quiz {quiz_id} not found")));
    }
    require_quiz_access(&state, &user, &quiz.content_id).await?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    if let Some(open) =
        repositories::attempts::find_in_progress(&mut *tx, &quiz_id, &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to look up open attempt"))?
    {
        tx.rollback().await.ok();
        return Ok((StatusCode::OK, Json(AttemptResponse::from_db(open))));
    }

    let used = repositories::attempts::count_for_student(&mut *tx, &quiz_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count attempts"))?;
    if used >= quiz.max_attempts as i64 {
        tx.rollback().await.ok();
        return Err(ApiError::Conflict(format!(
            "Maximum of {} attempts reached",
            quiz.max_attempts
        )));
    }

    let attempt = repositories::attempts::insert(
        &mut *tx,
        &Uuid::new_v4().to_string(),
        &quiz_id,
        &user.id,
        (used + 1) as i32,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create attempt"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit attempt"))?;

    Ok((StatusCode::CREATED, Json(AttemptResponse::from_db(attempt))))
}

pub(super) async fn list_my_attempts(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<AttemptResponse>>, ApiError> {
    let attempts = repositories::attempts::list_for_student(state.db(), &quiz_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list attempts"))?;

    Ok(Json(attempts.into_iter().map(AttemptResponse::from_db).collect()))
}

pub(super) async fn get_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
) -> Result<Json<AttemptResultResponse>, ApiError> {
    let attempt = fetch_attempt(&state, &attempt_id).await?;
    require_attempt_access(&state, &user, &attempt).await?;

    let answers = repositories::attempts::list_answers(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;

    Ok(Json(AttemptResultResponse {
        attempt: AttemptResponse::from_db(attempt),
        answers: answers.into_iter().map(StudentAnswerResponse::from_db).collect(),
    }))
}

pub(super) async fn submit_answer(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
    Json(payload): Json<AnswerSubmit>,
) -> Result<Json<StudentAnswerResponse>, ApiError> {
    let attempt = fetch_attempt(&state, &attempt_id).await?;
    if attempt.student_id != user.id {
        return Err(ApiError::Forbidden("Not your attempt"));
    }
    if attempt.status != AttemptStatus::InProgress {
        return Err(ApiError::Conflict("Attempt is already completed".to_string()));
    }

    let question = repositories::quizzes::find_question(state.db(), &payload.question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound(format!("Question {} not found", payload.question_id)))?;
    if question.quiz_id != attempt.quiz_id {
        return Err(ApiError::BadRequest("Question does not belong to this quiz".to_string()));
    }

    let option = repositories::quizzes::find_option(state.db(), &payload.selected_option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch option"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Option {} not found", payload.selected_option_id))
        })?;
    if option.question_id != question.id {
        return Err(ApiError::BadRequest("Option does not belong to this question".to_string()));
    }

    let points_earned = if option.is_correct { question.points } else { 0 };
    let answer = repositories::attempts::upsert_answer(
        state.db(),
        &Uuid::new_v4().to_string(),
        &attempt_id,
        &question.id,
        &option.id,
        option.is_correct,
        points_earned,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save answer"))?;

    Ok(Json(StudentAnswerResponse::from_db(answer)))
}

pub(super) async fn complete_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
) -> Result<Json<AttemptResultResponse>, ApiError> {
    let attempt = fetch_attempt(&state, &attempt_id).await?;
    if attempt.student_id != user.id {
        return Err(ApiError::Forbidden("Not your attempt"));
    }
    if attempt.status != AttemptStatus::InProgress {
        return Err(ApiError::Conflict("Attempt is already completed".to_string()));
    }

    let quiz = helpers::fetch_quiz(&state, &attempt.quiz_id).await?;

    let total = repositories::quizzes::total_points(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to sum quiz points"))? as i32;
    let earned = repositories::attempts::earned_points(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to sum earned points"))? as i32;

    let score = helpers::compute_score(earned, total);
    let now = primitive_now_utc();

    let completed = repositories::attempts::complete(
        state.db(),
        &attempt_id,
        repositories::attempts::CompleteAttempt {
            score,
            total_points: total,
            earned_points: earned,
            passed: helpers::is_passing(score, quiz.passing_score),
            completed_at: now,
            time_spent_minutes: whole_minutes_between(attempt.started_at, now),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to complete attempt"))?;

    let answers = repositories::attempts::list_answers(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;

    Ok(Json(AttemptResultResponse {
        attempt: AttemptResponse::from_db(completed),
        answers: answers.into_iter().map(StudentAnswerResponse::from_db).collect(),
    }))
}

async fn fetch_attempt(state: &AppState, attempt_id: &str) -> Result<QuizAttempt, ApiError> {
    repositories::attempts::find_by_id(state.db(), attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt"))?
        .ok_or_else(|| ApiError::NotFound(format!("Attempt {attempt_id} not found")))
}

/// The attempt owner and the course owner may read an attempt.
async fn require_attempt_access(
    state: &AppState,
    user: &User,
    attempt: &QuizAttempt,
) -> Result<(), ApiError> {
    if attempt.student_id == user.id || user.role == UserRole::Admin {
        return Ok(());
    }

    let course_id = repositories::quizzes::find_course_id(state.db(), &attempt.quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz {} not found", attempt.quiz_id)))?;

    crate::api::guards::require_course_owner(state, user, &course_id).await?;
    Ok(())
}

/// Paid-content gate for taking a quiz.
async fn require_quiz_access(
    state: &AppState,
    user: &User,
    content_id: &str,
) -> Result<(), ApiError> {
    let content = repositories::contents::find_by_id(state.db(), content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch content"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    let course_id = repositories::contents::find_course_id(state.db(), content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let has_paid =
        repositories::enrollments::has_completed_payment(state.db(), &user.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    let allowed = access::can_view_content(
        Viewer::User { id: &user.id, role: user.role },
        &course.instructor_id,
        has_paid,
        content.is_published,
        content.is_free,
    );
    if !allowed {
        return Err(ApiError::Forbidden("Payment required for this quiz"));
    }

    Ok(())
}
