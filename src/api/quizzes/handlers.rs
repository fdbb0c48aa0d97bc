use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentUser, MaybeUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::quiz::{
    OptionCreate, OptionManageResponse, QuestionCreate, QuestionManageResponse, QuestionUpdate,
    QuizCreate, QuizDetailResponse, QuizManageDetailResponse, QuizResponse, QuizUpdate,
};

use super::helpers;

pub(super) async fn create_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course_id = repositories::contents::find_course_id(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;
    require_course_owner(&state, &user, &course_id).await?;

    let existing = repositories::quizzes::find_by_content(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing quiz"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Content already has a quiz".to_string()));
    }

    let now = primitive_now_utc();
    let quiz = repositories::quizzes::create(
        state.db(),
        repositories::quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            content_id: &content_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            passing_score: payload.passing_score,
            time_limit_minutes: payload.time_limit_minutes,
            max_attempts: payload.max_attempts,
            show_results_immediately: payload.show_results_immediately,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

/// Public lookup; unpublished content hides its quiz from everyone but the
/// course instructor and admins.
pub(super) async fn get_quiz_for_content(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let content = repositories::contents::find_by_id(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch content"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    if !content.is_published {
        let course_id = repositories::contents::find_course_id(state.db(), &content_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
            .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;
        let course = repositories::courses::find_by_id(state.db(), &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
            .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

        let allowed = user
            .as_ref()
            .is_some_and(|u| u.role == UserRole::Admin || u.id == course.instructor_id);
        if !allowed {
            return Err(ApiError::NotFound(format!("No quiz for content {content_id}")));
        }
    }

    let quiz = repositories::quizzes::find_by_content(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("No quiz for content {content_id}")))?;

    Ok(Json(QuizResponse::from_db(quiz)))
}

pub(super) async fn get_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizDetailResponse>, ApiError> {
    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;

    if !quiz.is_published && !is_owner(&state, &user, &quiz_id).await? {
        return Err(ApiError::NotFound(format!("Quiz {quiz_id} not found")));
    }

    let questions = helpers::load_public_questions(&state, &quiz_id).await?;

    Ok(Json(QuizDetailResponse { quiz: QuizResponse::from_db(quiz), questions }))
}

pub(super) async fn get_quiz_manage(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizManageDetailResponse>, ApiError> {
    let quiz = helpers::require_quiz_owner(&state, &user, &quiz_id).await?;
    let questions = helpers::load_manage_questions(&state, &quiz_id).await?;

    Ok(Json(QuizManageDetailResponse { quiz: QuizResponse::from_db(quiz), questions }))
}

pub(super) async fn update_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    helpers::require_quiz_owner(&state, &user, &quiz_id).await?;

    repositories::quizzes::update(
        state.db(),
        &quiz_id,
        repositories::quizzes::UpdateQuiz {
            title: payload.title,
            description: payload.description,
            passing_score: payload.passing_score,
            time_limit_minutes: payload.time_limit_minutes,
            max_attempts: payload.max_attempts,
            show_results_immediately: payload.show_results_immediately,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    let quiz = helpers::fetch_quiz(&state, &quiz_id).await?;
    Ok(Json(QuizResponse::from_db(quiz)))
}

pub(super) async fn publish_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_published(&state, &user, &quiz_id, true).await
}

pub(super) async fn unpublish_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_published(&state, &user, &quiz_id, false).await
}

async fn set_published(
    state: &AppState,
    user: &User,
    quiz_id: &str,
    is_published: bool,
) -> Result<StatusCode, ApiError> {
    helpers::require_quiz_owner(state, user, quiz_id).await?;

    repositories::quizzes::set_published(state.db(), quiz_id, is_published, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete_quiz(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    helpers::require_quiz_owner(&state, &user, &quiz_id).await?;

    repositories::quizzes::delete(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn add_question(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionManageResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    helpers::require_quiz_owner(&state, &user, &quiz_id).await?;

    if !payload.options.iter().any(|option| option.is_correct) {
        return Err(ApiError::BadRequest(
            "Question must have at least one correct option".to_string(),
        ));
    }

    let now = primitive_now_utc();
    let question = repositories::quizzes::create_question(
        state.db(),
        repositories::quizzes::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            quiz_id: &quiz_id,
            question_text: payload.question_text.trim(),
            question_type: payload.question_type,
            points: payload.points,
            explanation: payload.explanation.as_deref(),
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    let mut options = Vec::with_capacity(payload.options.len());
    for option in payload.options {
        let created = repositories::quizzes::create_option(
            state.db(),
            repositories::quizzes::CreateOption {
                id: &Uuid::new_v4().to_string(),
                question_id: &question.id,
                option_text: option.option_text.trim(),
                is_correct: option.is_correct,
                created_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create option"))?;
        options.push(OptionManageResponse::from_db(created));
    }

    Ok((StatusCode::CREATED, Json(QuestionManageResponse::from_db(question, options))))
}

pub(super) async fn update_question(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_question_owner(&state, &user, &question_id).await?;

    repositories::quizzes::update_question(
        state.db(),
        &question_id,
        repositories::quizzes::UpdateQuestion {
            question_text: payload.question_text,
            points: payload.points,
            explanation: payload.explanation,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete_question(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_question_owner(&state, &user, &question_id).await?;

    repositories::quizzes::delete_question(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn add_option(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(payload): Json<OptionCreate>,
) -> Result<(StatusCode, Json<OptionManageResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_question_owner(&state, &user, &question_id).await?;

    let option = repositories::quizzes::create_option(
        state.db(),
        repositories::quizzes::CreateOption {
            id: &Uuid::new_v4().to_string(),
            question_id: &question_id,
            option_text: payload.option_text.trim(),
            is_correct: payload.is_correct,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create option"))?;

    Ok((StatusCode::CREATED, Json(OptionManageResponse::from_db(option))))
}

pub(super) async fn update_option(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(option_id): Path<String>,
    Json(payload): Json<crate::schemas::quiz::OptionCreate>,
) -> Result<StatusCode, ApiError> {
    require_option_owner(&state, &user, &option_id).await?;

    repositories::quizzes::update_option(
        state.db(),
        &option_id,
        repositories::quizzes::UpdateOption {
            option_text: Some(payload.option_text),
            is_correct: Some(payload.is_correct),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update option"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete_option(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(option_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_option_owner(&state, &user, &option_id).await?;

    repositories::quizzes::delete_option(state.db(), &option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete option"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn is_owner(state: &AppState, user: &User, quiz_id: &str) -> Result<bool, ApiError> {
    match helpers::require_quiz_owner(state, user, quiz_id).await {
        Ok(_) => Ok(true),
        Err(ApiError::Forbidden(_)) => Ok(false),
        Err(other) => Err(other),
    }
}

async fn require_question_owner(
    state: &AppState,
    user: &User,
    question_id: &str,
) -> Result<(), ApiError> {
    let course_id = repositories::quizzes::find_course_id_for_question(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} not found")))?;

    require_course_owner(state, user, &course_id).await?;
    Ok(())
}

async fn require_option_owner(
    state: &AppState,
    user: &User,
    option_id: &str,
) -> Result<(), ApiError> {
    let course_id = repositories::quizzes::find_course_id_for_option(state.db(), option_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Option {option_id} not found")))?;

    require_course_owner(state, user, &course_id).await?;
    Ok(())
}
