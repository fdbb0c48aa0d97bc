use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{InterviewAttempt, User};
use crate::db::types::{AttemptStatus, UserRole};
use crate::repositories;
use crate::schemas::interview::{
    InterviewAnswerResponse, InterviewAnswerSubmit, InterviewAttemptResponse,
    InterviewResultResponse,
};

use super::handlers::{fetch_interview, map_ai_error};

pub(super) async fn start_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<(StatusCode, Json<InterviewAttemptResponse>), ApiError> {
    let interview = fetch_interview(&state, &interview_id).await?;
    if !interview.is_published {
        return Err(ApiError::NotFound(format!("Interview {interview_id} not found")));
    }
    require_interview_access(&state, &user, &interview.course_id).await?;

    let total_questions = repositories::interviews::count_questions(state.db(), &interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

    let attempt = repositories::interviews::create_attempt(
        state.db(),
        &Uuid::new_v4().to_string(),
        &interview_id,
        &user.id,
        total_questions as i32,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create attempt"))?;

    Ok((StatusCode::CREATED, Json(InterviewAttemptResponse::from_db(attempt))))
}

pub(super) async fn list_my_attempts(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<Json<Vec<InterviewAttemptResponse>>, ApiError> {
    let attempts =
        repositories::interviews::list_attempts_for_student(state.db(), &interview_id, &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list attempts"))?;

    Ok(Json(attempts.into_iter().map(InterviewAttemptResponse::from_db).collect()))
}

pub(super) async fn get_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
) -> Result<Json<InterviewResultResponse>, ApiError> {
    let attempt = fetch_attempt(&state, &attempt_id).await?;
    require_attempt_access(&state, &user, &attempt).await?;

    let answers = repositories::interviews::list_answers(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;

    Ok(Json(InterviewResultResponse {
        attempt: InterviewAttemptResponse::from_db(attempt),
        answers: answers.into_iter().map(InterviewAnswerResponse::from_db).collect(),
    }))
}

/// Evaluates through the AI provider first; nothing is stored when the
/// provider fails or returns garbage.
pub(super) async fn submit_answer(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
    Json(payload): Json<InterviewAnswerSubmit>,
) -> Result<Json<InterviewAnswerResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let attempt = fetch_attempt(&state, &attempt_id).await?;
    if attempt.student_id != user.id {
        return Err(ApiError::Forbidden("Not your attempt"));
    }
    if attempt.status != AttemptStatus::InProgress {
        return Err(ApiError::Conflict("Attempt is already completed".to_string()));
    }

    let question = repositories::interviews::find_question(state.db(), &payload.question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound(format!("Question {} not found", payload.question_id)))?;
    if question.interview_id != attempt.interview_id {
        return Err(ApiError::BadRequest(
            "Question does not belong to this interview".to_string(),
        ));
    }

    let evaluation = state
        .ai()
        .evaluate_answer(
            &question.question_text,
            &question.sample_answer,
            &question.key_points.0,
            &payload.answer_text,
        )
        .await
        .map_err(map_ai_error)?;

    let answer = repositories::interviews::upsert_answer(
        state.db(),
        repositories::interviews::UpsertAnswer {
            id: &Uuid::new_v4().to_string(),
            attempt_id: &attempt_id,
            question_id: &question.id,
            answer_text: &payload.answer_text,
            ai_score: evaluation.score,
            ai_feedback: &evaluation.feedback,
            strengths: &evaluation.strengths,
            improvements: &evaluation.improvements,
            answered_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save answer"))?;

    Ok(Json(InterviewAnswerResponse::from_db(answer)))
}

pub(super) async fn complete_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
) -> Result<Json<InterviewResultResponse>, ApiError> {
    let attempt = fetch_attempt(&state, &attempt_id).await?;
    if attempt.student_id != user.id {
        return Err(ApiError::Forbidden("Not your attempt"));
    }
    if attempt.status != AttemptStatus::InProgress {
        return Err(ApiError::Conflict("Attempt is already completed".to_string()));
    }

    let answers = repositories::interviews::list_answers(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;

    let overall_score = overall_score(answers.iter().filter_map(|answer| answer.ai_score));

    let completed = repositories::interviews::complete_attempt(
        state.db(),
        &attempt_id,
        overall_score,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to complete attempt"))?;

    Ok(Json(InterviewResultResponse {
        attempt: InterviewAttemptResponse::from_db(completed),
        answers: answers.into_iter().map(InterviewAnswerResponse::from_db).collect(),
    }))
}

/// Truncated mean of the per-answer scores; `None` when nothing was answered.
fn overall_score(scores: impl Iterator<Item = i32>) -> Option<i32> {
    let collected: Vec<i32> = scores.collect();
    if collected.is_empty() {
        return None;
    }
    let sum: i64 = collected.iter().map(|score| *score as i64).sum();
    Some((sum / collected.len() as i64) as i32)
}

async fn fetch_attempt(state: &AppState, attempt_id: &str) -> Result<InterviewAttempt, ApiError> {
    repositories::interviews::find_attempt(state.db(), attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt"))?
        .ok_or_else(|| ApiError::NotFound(format!("Attempt {attempt_id} not found")))
}

async fn require_attempt_access(
    state: &AppState,
    user: &User,
    attempt: &InterviewAttempt,
) -> Result<(), ApiError> {
    if attempt.student_id == user.id || user.role == UserRole::Admin {
        return Ok(());
    }

    let course_id = repositories::interviews::find_course_id(state.db(), &attempt.interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Interview {} not found", attempt.interview_id))
        })?;

    crate::api::guards::require_course_owner(state, user, &course_id).await?;
    Ok(())
}

/// Mock interviews live behind the paid course, same as any other content.
async fn require_interview_access(
    state: &AppState,
    user: &User,
    course_id: &str,
) -> Result<(), ApiError> {
    if user.role == UserRole::Admin {
        return Ok(());
    }

    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    if course.instructor_id == user.id {
        return Ok(());
    }

    let has_paid =
        repositories::enrollments::has_completed_payment(state.db(), &user.id, course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if !has_paid {
        return Err(ApiError::Forbidden("Payment required for this interview"));
    }

    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::overall_score;

    #[test]
    fn overall_score_is_truncated_mean() {
        assert_eq!(overall_score([80, 85].into_iter()), Some(82));
        assert_eq!(overall_score([70].into_iter()), Some(70));
    }

    #[test]
    fn overall_score_is_none_without_answers() {
        assert_eq!(overall_score(std::iter::empty()), None);
    }
}
