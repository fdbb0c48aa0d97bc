use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentInstructor, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Interview, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::interview::{
    InterviewGenerateRequest, InterviewQuestionManageResponse, InterviewQuestionPublicResponse,
    InterviewResponse,
};
use crate::services::ai::AiError;

/// Generates the question set first and only then opens a transaction:
/// a malformed AI response never leaves a half-written interview behind.
pub(super) async fn generate_interview(
    CurrentInstructor(instructor): CurrentInstructor,
    State(state): State<AppState>,
    Json(payload): Json<InterviewGenerateRequest>,
) -> Result<(StatusCode, Json<InterviewResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_course_owner(&state, &instructor, &payload.course_id).await?;

    let questions = state
        .ai()
        .generate_interview_questions(&payload.job_role, &payload.difficulty, payload.question_count)
        .await
        .map_err(map_ai_error)?;

    let now = primitive_now_utc();
    let interview_id = Uuid::new_v4().to_string();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let interview = repositories::interviews::create(
        &mut *tx,
        repositories::interviews::CreateInterview {
            id: &interview_id,
            course_id: &payload.course_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            job_role: &payload.job_role,
            difficulty: &payload.difficulty,
            time_limit_minutes: payload.time_limit_minutes,
            ai_generated: true,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create interview"))?;

    let question_count = questions.len() as i64;
    for (index, question) in questions.into_iter().enumerate() {
        repositories::interviews::create_question(
            &mut *tx,
            repositories::interviews::CreateQuestion {
                id: &Uuid::new_v4().to_string(),
                interview_id: &interview_id,
                question_text: &question.question,
                sample_answer: &question.sample_answer,
                key_points: &question.key_points,
                difficulty: question.difficulty.as_deref().unwrap_or(&payload.difficulty),
                question_order: (index + 1) as i32,
                created_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create interview question"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit interview"))?;

    Ok((StatusCode::CREATED, Json(InterviewResponse::from_db(interview, question_count))))
}

pub(super) async fn list_for_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<InterviewResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let is_owner = user.role == UserRole::Admin || user.id == course.instructor_id;
    let interviews = repositories::interviews::list_by_course(state.db(), &course_id, !is_owner)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list interviews"))?;

    let mut responses = Vec::with_capacity(interviews.len());
    for interview in interviews {
        let count = repositories::interviews::count_questions(state.db(), &interview.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;
        responses.push(InterviewResponse::from_db(interview, count));
    }

    Ok(Json(responses))
}

#[derive(Debug, serde::Serialize)]
pub(super) struct InterviewDetail {
    #[serde(flatten)]
    interview: InterviewResponse,
    questions: Vec<InterviewQuestionPublicResponse>,
}

pub(super) async fn get_interview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<Json<InterviewDetail>, ApiError> {
    let interview = fetch_interview(&state, &interview_id).await?;

    if !interview.is_published && !is_owner(&state, &user, &interview).await? {
        return Err(ApiError::NotFound(format!("Interview {interview_id} not found")));
    }

    let questions = repositories::interviews::list_questions(state.db(), &interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let count = questions.len() as i64;

    Ok(Json(InterviewDetail {
        interview: InterviewResponse::from_db(interview, count),
        questions: questions
            .into_iter()
            .map(InterviewQuestionPublicResponse::from_db)
            .collect(),
    }))
}

#[derive(Debug, serde::Serialize)]
pub(super) struct InterviewManageDetail {
    #[serde(flatten)]
    interview: InterviewResponse,
    questions: Vec<InterviewQuestionManageResponse>,
}

pub(super) async fn get_interview_manage(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<Json<InterviewManageDetail>, ApiError> {
    let interview = fetch_interview(&state, &interview_id).await?;
    require_course_owner(&state, &user, &interview.course_id).await?;

    let questions = repositories::interviews::list_questions(state.db(), &interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let count = questions.len() as i64;

    Ok(Json(InterviewManageDetail {
        interview: InterviewResponse::from_db(interview, count),
        questions: questions
            .into_iter()
            .map(InterviewQuestionManageResponse::from_db)
            .collect(),
    }))
}

pub(super) async fn publish_interview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_published(&state, &user, &interview_id, true).await
}

pub(super) async fn unpublish_interview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_published(&state, &user, &interview_id, false).await
}

async fn set_published(
    state: &AppState,
    user: &User,
    interview_id: &str,
    is_published: bool,
) -> Result<StatusCode, ApiError> {
    let interview = fetch_interview(state, interview_id).await?;
    require_course_owner(state, user, &interview.course_id).await?;

    repositories::interviews::set_published(
        state.db(),
        interview_id,
        is_published,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update interview"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete_interview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let interview = fetch_interview(&state, &interview_id).await?;
    require_course_owner(&state, &user, &interview.course_id).await?;

    repositories::interviews::delete(state.db(), &interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete interview"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn fetch_interview(
    state: &AppState,
    interview_id: &str,
) -> Result<Interview, ApiError> {
    repositories::interviews::find_by_id(state.db(), interview_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch interview"))?
        .ok_or_else(|| ApiError::NotFound(format!("Interview {interview_id} not found")))
}

async fn is_owner(
    state: &AppState,
    user: &User,
    interview: &Interview,
) -> Result<bool, ApiError> {
    match require_course_owner(state, user, &interview.course_id).await {
        Ok(_) => Ok(true),
        Err(ApiError::Forbidden(_)) => Ok(false),
        Err(other) => Err(other),
    }
}

pub(super) fn map_ai_error(err: AiError) -> ApiError {
    match err {
        AiError::NotConfigured => {
            ApiError::ServiceUnavailable("AI provider is not configured".to_string())
        }
        AiError::Upstream(message) | AiError::Malformed(message) => {
            ApiError::UpstreamFailure(message)
        }
    }
}
