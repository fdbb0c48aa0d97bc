use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentInstructor, CurrentUser};
use crate::api::guards;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{User, Video};
use crate::db::types::{UserRole, VideoStatus, VideoType};
use crate::repositories;
use crate::schemas::video::{VideoResponse, VideoUrlResponse, YoutubeVideoCreate};

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/youtube", post(add_youtube_video))
        .route("/upload", post(upload_video))
        .route("/course/:course_id", get(list_course_videos))
        .route("/:video_id/url", get(video_url))
        .route("/:video_id/stream", get(video_url))
        .route("/:video_id/preview", put(set_preview))
        .route("/:video_id", delete(delete_video))
}

async fn add_youtube_video(
    CurrentInstructor(user): CurrentInstructor,
    State(state): State<AppState>,
    Json(payload): Json<YoutubeVideoCreate>,
) -> Result<(StatusCode, Json<VideoResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    guards::require_course_owner(&state, &user, &payload.course_id).await?;

    let video = repositories::videos::create(
        state.db(),
        repositories::videos::CreateVideo {
            id: &Uuid::new_v4().to_string(),
            course_id: &payload.course_id,
            title: &payload.title,
            description: payload.description.as_deref(),
            video_url: Some(&payload.video_url),
            video_type: if payload.is_preview {
                VideoType::PreviewClip
            } else {
                VideoType::Lesson
            },
            // External links need no processing step.
            status: VideoStatus::Ready,
            is_preview: payload.is_preview,
            duration_seconds: payload.duration_seconds,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create video"))?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from_db(video))))
}

async fn upload_video(
    CurrentInstructor(user): CurrentInstructor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoResponse>), ApiError> {
    let storage = state
        .storage()
        .ok_or_else(|| ApiError::ServiceUnavailable("Object storage is not configured".to_string()))?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;
    let mut title: Option<String> = None;
    let mut course_id: Option<String> = None;
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
                {
                    let next_size = bytes.len() as u64 + chunk.len() as u64;
                    if next_size > max_bytes {
                        return Err(ApiError::BadRequest(format!(
                            "File size exceeds {}MB limit",
                            state.settings().storage().max_upload_size_mb
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                file_bytes = Some(bytes);
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::BadRequest("Invalid title".to_string()))?,
                );
            }
            "course_id" | "courseId" => {
                course_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::BadRequest("Invalid course id".to_string()))?,
                );
            }
            _ => {}
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;
    let course_id =
        course_id.ok_or_else(|| ApiError::BadRequest("course_id is required".to_string()))?;
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    if !content_type.starts_with("video/") {
        return Err(ApiError::BadRequest("Only video files are allowed".to_string()));
    }

    guards::require_course_owner(&state, &user, &course_id).await?;

    let video_id = Uuid::new_v4().to_string();
    let now = primitive_now_utc();
    let video = repositories::videos::create(
        state.db(),
        repositories::videos::CreateVideo {
            id: &video_id,
            course_id: &course_id,
            title: &title,
            description: None,
            video_url: None,
            video_type: VideoType::Lesson,
            status: VideoStatus::Processing,
            is_preview: false,
            duration_seconds: None,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create video"))?;

    let key = format!("videos/{course_id}/{video_id}");
    let (file_size, content_hash) = match storage
        .upload_bytes(&key, &content_type, file_bytes)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            // Leave a failed row rather than a processing one stuck forever.
            if let Err(mark_err) =
                repositories::videos::mark_failed(state.db(), &video.id, primitive_now_utc()).await
            {
                tracing::error!(error = %mark_err, video_id = %video.id, "Failed to mark video failed");
            }
            return Err(ApiError::internal(e, "Failed to upload video to storage"));
        }
    };

    let stored = repositories::videos::mark_uploaded(
        state.db(),
        &video.id,
        repositories::videos::StoredUpload {
            storage_key: &key,
            file_size,
            content_hash: &content_hash,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record upload"))?
    .ok_or_else(|| ApiError::NotFound(format!("Video {} not found", video.id)))?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from_db(stored))))
}

async fn list_course_videos(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<VideoResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let full_access = user.role == UserRole::Admin
        || course.instructor_id == user.id
        || repositories::enrollments::has_completed_payment(state.db(), &user.id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    let videos = repositories::videos::list_by_course(state.db(), &course_id, !full_access)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list videos"))?;

    Ok(Json(videos.into_iter().map(VideoResponse::from_db).collect()))
}

/// Resolves a playable URL. Previews are open to any authenticated user;
/// everything else sits behind the paid course. Stored objects come back
/// as a short-lived presigned link.
async fn video_url(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoUrlResponse>, ApiError> {
    let video = fetch_video(&state, &video_id).await?;
    require_playback_access(&state, &user, &video).await?;

    if let Some(key) = video.storage_key.as_deref() {
        let storage = state
            .storage()
            .ok_or_else(|| ApiError::ServiceUnavailable("Object storage is not configured".to_string()))?;
        let expire_minutes = state.settings().storage().presigned_url_expire_minutes;
        let url = storage
            .presign_get(key, Duration::from_secs(expire_minutes * 60))
            .await
            .map_err(|e| ApiError::internal(e, "Failed to presign video URL"))?;

        return Ok(Json(VideoUrlResponse {
            video_id: video.id,
            url,
            video_type: video.video_type,
            expires_in_seconds: Some(expire_minutes * 60),
        }));
    }

    let url = video
        .video_url
        .ok_or_else(|| ApiError::NotFound(format!("Video {video_id} has no playable source")))?;

    Ok(Json(VideoUrlResponse {
        video_id: video.id,
        url,
        video_type: video.video_type,
        expires_in_seconds: None,
    }))
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    #[serde(alias = "isPreview")]
    is_preview: bool,
}

async fn set_preview(
    CurrentInstructor(user): CurrentInstructor,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<VideoResponse>, ApiError> {
    let video = fetch_video(&state, &video_id).await?;
    guards::require_course_owner(&state, &user, &video.course_id).await?;

    let updated =
        repositories::videos::set_preview(state.db(), &video_id, query.is_preview, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update preview flag"))?
            .ok_or_else(|| ApiError::NotFound(format!("Video {video_id} not found")))?;

    Ok(Json(VideoResponse::from_db(updated)))
}

async fn delete_video(
    CurrentInstructor(user): CurrentInstructor,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let video = fetch_video(&state, &video_id).await?;
    guards::require_course_owner(&state, &user, &video.course_id).await?;

    if let Some(key) = video.storage_key.as_deref() {
        if let Some(storage) = state.storage() {
            storage
                .delete_object(key)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to delete stored video"))?;
        }
    }

    let deleted = repositories::videos::delete(state.db(), &video_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete video"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Video {video_id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_video(state: &AppState, video_id: &str) -> Result<Video, ApiError> {
    repositories::videos::find_by_id(state.db(), video_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch video"))?
        .ok_or_else(|| ApiError::NotFound(format!("Video {video_id} not found")))
}

async fn require_playback_access(
    state: &AppState,
    user: &User,
    video: &Video,
) -> Result<(), ApiError> {
    if video.is_preview || user.role == UserRole::Admin {
        return Ok(());
    }

    let course = repositories::courses::find_by_id(state.db(), &video.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {} not found", video.course_id)))?;
    if course.instructor_id == user.id {
        return Ok(());
    }

    let has_paid =
        repositories::enrollments::has_completed_payment(state.db(), &user.id, &video.course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;
    if !has_paid {
        return Err(ApiError::Forbidden("Payment required for this video"));
    }

    Ok(())
}
