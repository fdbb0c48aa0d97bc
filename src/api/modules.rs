use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentUser, MaybeUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Course, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::course::{
    ContentCreate, ContentResponse, ContentUpdate, ModuleResponse, ModuleUpdate,
};
use crate::services::access::{self, Viewer};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:module_id", get(get_module).put(update_module).delete(delete_module))
        .route("/:module_id/publish", post(publish_module))
        .route("/:module_id/unpublish", post(unpublish_module))
        .route("/:module_id/content", get(list_content).post(create_content))
}

pub(crate) fn content_router() -> Router<AppState> {
    Router::new()
        .route("/:content_id", get(get_content).put(update_content).delete(delete_content))
        .route("/:content_id/publish", post(publish_content))
        .route("/:content_id/unpublish", post(unpublish_content))
}

fn viewer<'a>(user: &'a Option<User>) -> Viewer<'a> {
    match user {
        Some(user) => Viewer::User { id: &user.id, role: user.role },
        None => Viewer::Anonymous,
    }
}

async fn paid_for_course(
    state: &AppState,
    user: &Option<User>,
    course_id: &str,
) -> Result<bool, ApiError> {
    let Some(user) = user else { return Ok(false) };
    repositories::enrollments::has_completed_payment(state.db(), &user.id, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))
}

async fn get_module(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module {module_id} not found")))?;

    // Unpublished modules exist only for their instructor and admins.
    if !module.is_published {
        let course = fetch_course(&state, &module.course_id).await?;
        let allowed = user
            .as_ref()
            .is_some_and(|u| u.role == UserRole::Admin || u.id == course.instructor_id);
        if !allowed {
            return Err(ApiError::NotFound(format!("Module {module_id} not found")));
        }
    }

    Ok(Json(ModuleResponse::from_db(module)))
}

async fn update_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Json(payload): Json<ModuleUpdate>,
) -> Result<Json<ModuleResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let module = require_module_owner(&state, &user, &module_id).await?;

    repositories::modules::update(
        state.db(),
        &module.id,
        repositories::modules::UpdateModule {
            title: payload.title,
            description: payload.description,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update module"))?;

    let module = repositories::modules::find_by_id(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module {module_id} not found")))?;

    Ok(Json(ModuleResponse::from_db(module)))
}

async fn publish_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_module_published(&state, &user, &module_id, true).await
}

async fn unpublish_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_module_published(&state, &user, &module_id, false).await
}

async fn set_module_published(
    state: &AppState,
    user: &User,
    module_id: &str,
    is_published: bool,
) -> Result<StatusCode, ApiError> {
    require_module_owner(state, user, module_id).await?;

    repositories::modules::set_published(state.db(), module_id, is_published, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update module"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_module_owner(&state, &user, &module_id).await?;

    repositories::modules::delete(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete module"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn list_content(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<Vec<ContentResponse>>, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module {module_id} not found")))?;

    let course = fetch_course(&state, &module.course_id).await?;
    let has_paid = paid_for_course(&state, &user, &course.id).await?;

    let contents = repositories::contents::list_by_module(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list content"))?;

    let visible = contents
        .into_iter()
        .filter(|content| {
            access::can_view_content(
                viewer(&user),
                &course.instructor_id,
                has_paid,
                content.is_published,
                content.is_free,
            )
        })
        .map(ContentResponse::from_db)
        .collect();

    Ok(Json(visible))
}

async fn create_content(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    Json(payload): Json<ContentCreate>,
) -> Result<(StatusCode, Json<ContentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_module_owner(&state, &user, &module_id).await?;

    let now = primitive_now_utc();
    let content = repositories::contents::create(
        state.db(),
        repositories::contents::CreateContent {
            id: &Uuid::new_v4().to_string(),
            module_id: &module_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            content_type: payload.content_type,
            video_url: payload.video_url.as_deref(),
            pdf_url: payload.pdf_url.as_deref(),
            content_url: payload.content_url.as_deref(),
            thumbnail_url: payload.thumbnail_url.as_deref(),
            duration_seconds: payload.duration_seconds,
            file_size: None,
            is_free: payload.is_free,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create content"))?;

    Ok((StatusCode::CREATED, Json(ContentResponse::from_db(content))))
}

async fn get_content(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentResponse>, ApiError> {
    let content = repositories::contents::find_by_id(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch content"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    let course_id = repositories::contents::find_course_id(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    let course = fetch_course(&state, &course_id).await?;
    let has_paid = paid_for_course(&state, &user, &course.id).await?;

    let allowed = access::can_view_content(
        viewer(&user),
        &course.instructor_id,
        has_paid,
        content.is_published,
        content.is_free,
    );
    if !allowed {
        return Err(ApiError::Forbidden("Payment required for this content"));
    }

    Ok(Json(ContentResponse::from_db(content)))
}

async fn update_content(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    Json(payload): Json<ContentUpdate>,
) -> Result<Json<ContentResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_content_owner(&state, &user, &content_id).await?;

    repositories::contents::update(
        state.db(),
        &content_id,
        repositories::contents::UpdateContent {
            title: payload.title,
            description: payload.description,
            video_url: payload.video_url,
            pdf_url: payload.pdf_url,
            content_url: payload.content_url,
            thumbnail_url: payload.thumbnail_url,
            duration_seconds: payload.duration_seconds,
            file_size: None,
            is_free: payload.is_free,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update content"))?;

    let content = repositories::contents::find_by_id(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch content"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    Ok(Json(ContentResponse::from_db(content)))
}

async fn publish_content(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_content_published(&state, &user, &content_id, true).await
}

async fn unpublish_content(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_content_published(&state, &user, &content_id, false).await
}

async fn set_content_published(
    state: &AppState,
    user: &User,
    content_id: &str,
    is_published: bool,
) -> Result<StatusCode, ApiError> {
    require_content_owner(state, user, content_id).await?;

    repositories::contents::set_published(
        state.db(),
        content_id,
        is_published,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update content"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_content(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_content_owner(&state, &user, &content_id).await?;

    repositories::contents::delete(state.db(), &content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete content"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn require_module_owner(
    state: &AppState,
    user: &User,
    module_id: &str,
) -> Result<crate::db::models::CourseModule, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound(format!("Module {module_id} not found")))?;

    require_course_owner(state, user, &module.course_id).await?;
    Ok(module)
}

async fn require_content_owner(
    state: &AppState,
    user: &User,
    content_id: &str,
) -> Result<(), ApiError> {
    let course_id = repositories::contents::find_course_id(state.db(), content_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Content {content_id} not found")))?;

    require_course_owner(state, user, &course_id).await?;
    Ok(())
}
