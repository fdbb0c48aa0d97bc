use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentUser, MaybeUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Topic, User};
use crate::repositories;
use crate::schemas::catalog::{
    MaterialCreate, MaterialResponse, MaterialUpdate, TopicResponse, TopicUpdate,
};
use crate::services::access::{self, Viewer};

pub(crate) fn topics_router() -> Router<AppState> {
    Router::new()
        .route("/:topic_id", get(get_topic).put(update_topic).delete(delete_topic))
        .route("/:topic_id/materials", get(list_materials).post(create_material))
}

pub(crate) fn materials_router() -> Router<AppState> {
    Router::new().route(
        "/:material_id",
        get(get_material).put(update_material).delete(delete_material),
    )
}

async fn get_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<Json<TopicResponse>, ApiError> {
    let topic = fetch_topic(&state, &topic_id).await?;
    Ok(Json(TopicResponse::from_db(topic)))
}

async fn update_topic(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(payload): Json<TopicUpdate>,
) -> Result<Json<TopicResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let topic = fetch_topic(&state, &topic_id).await?;
    require_course_owner(&state, &user, &topic.course_id).await?;

    repositories::topics::update(
        state.db(),
        &topic_id,
        repositories::topics::UpdateTopic {
            title: payload.title,
            description: payload.description,
            is_published: payload.is_published,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update topic"))?;

    let topic = fetch_topic(&state, &topic_id).await?;
    Ok(Json(TopicResponse::from_db(topic)))
}

async fn delete_topic(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let topic = fetch_topic(&state, &topic_id).await?;
    require_course_owner(&state, &user, &topic.course_id).await?;

    repositories::topics::delete(state.db(), &topic_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete topic"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn list_materials(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let topic = fetch_topic(&state, &topic_id).await?;
    let course = repositories::courses::find_by_id(state.db(), &topic.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {} not found", topic.course_id)))?;

    let has_paid = match &user {
        Some(u) => repositories::enrollments::has_completed_payment(state.db(), &u.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?,
        None => false,
    };
    let viewer = match &user {
        Some(u) => Viewer::User { id: &u.id, role: u.role },
        None => Viewer::Anonymous,
    };

    let materials = repositories::materials::list_by_topic(state.db(), &topic_id, false)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list materials"))?;

    let visible = materials
        .into_iter()
        .filter(|material| {
            access::can_view_content(
                viewer,
                &course.instructor_id,
                has_paid,
                material.is_published,
                material.is_free,
            )
        })
        .map(MaterialResponse::from_db)
        .collect();

    Ok(Json(visible))
}

async fn create_material(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(payload): Json<MaterialCreate>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let topic = fetch_topic(&state, &topic_id).await?;
    require_course_owner(&state, &user, &topic.course_id).await?;

    let now = primitive_now_utc();
    let material = repositories::materials::create(
        state.db(),
        repositories::materials::CreateMaterial {
            id: &Uuid::new_v4().to_string(),
            topic_id: &topic_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            material_type: payload.material_type,
            content_url: payload.content_url.as_deref(),
            video_url: payload.video_url.as_deref(),
            pdf_url: payload.pdf_url.as_deref(),
            thumbnail_url: payload.thumbnail_url.as_deref(),
            duration_seconds: payload.duration_seconds,
            file_size: None,
            is_free: payload.is_free,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create material"))?;

    Ok((StatusCode::CREATED, Json(MaterialResponse::from_db(material))))
}

async fn get_material(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let material = repositories::materials::find_by_id(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch material"))?
        .ok_or_else(|| ApiError::NotFound(format!("Material {material_id} not found")))?;

    let course_id = repositories::materials::find_course_id(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Material {material_id} not found")))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let has_paid = match &user {
        Some(u) => repositories::enrollments::has_completed_payment(state.db(), &u.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?,
        None => false,
    };
    let viewer = match &user {
        Some(u) => Viewer::User { id: &u.id, role: u.role },
        None => Viewer::Anonymous,
    };

    let allowed = access::can_view_content(
        viewer,
        &course.instructor_id,
        has_paid,
        material.is_published,
        material.is_free,
    );
    if !allowed {
        return Err(ApiError::Forbidden("Payment required for this material"));
    }

    Ok(Json(MaterialResponse::from_db(material)))
}

async fn update_material(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(material_id): Path<String>,
    Json(payload): Json<MaterialUpdate>,
) -> Result<Json<MaterialResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_material_owner(&state, &user, &material_id).await?;

    repositories::materials::update(
        state.db(),
        &material_id,
        repositories::materials::UpdateMaterial {
            title: payload.title,
            description: payload.description,
            content_url: payload.content_url,
            video_url: payload.video_url,
            pdf_url: payload.pdf_url,
            thumbnail_url: payload.thumbnail_url,
            duration_seconds: payload.duration_seconds,
            file_size: None,
            is_published: payload.is_published,
            is_free: payload.is_free,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update material"))?;

    let material = repositories::materials::find_by_id(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch material"))?
        .ok_or_else(|| ApiError::NotFound(format!("Material {material_id} not found")))?;

    Ok(Json(MaterialResponse::from_db(material)))
}

async fn delete_material(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_material_owner(&state, &user, &material_id).await?;

    repositories::materials::delete(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete material"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_topic(state: &AppState, topic_id: &str) -> Result<Topic, ApiError> {
    repositories::topics::find_by_id(state.db(), topic_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch topic"))?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {topic_id} not found")))
}

async fn require_material_owner(
    state: &AppState,
    user: &User,
    material_id: &str,
) -> Result<(), ApiError> {
    let course_id = repositories::materials::find_course_id(state.db(), material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Material {material_id} not found")))?;

    require_course_owner(state, user, &course_id).await?;
    Ok(())
}
