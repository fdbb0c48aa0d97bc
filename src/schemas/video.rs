use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Video;
use crate::db::types::{VideoStatus, VideoType};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct YoutubeVideoCreate {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "videoUrl")]
    #[validate(url(message = "video_url must be a valid URL"))]
    pub(crate) video_url: String,
    #[serde(default)]
    #[serde(alias = "isPreview")]
    pub(crate) is_preview: bool,
    #[serde(default)]
    #[serde(alias = "durationSeconds")]
    pub(crate) duration_seconds: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VideoResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) video_type: VideoType,
    pub(crate) status: VideoStatus,
    pub(crate) is_preview: bool,
    pub(crate) order_index: i32,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl VideoResponse {
    pub(crate) fn from_db(video: Video) -> Self {
        Self {
            id: video.id,
            course_id: video.course_id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            video_type: video.video_type,
            status: video.status,
            is_preview: video.is_preview,
            order_index: video.order_index,
            duration_seconds: video.duration_seconds,
            file_size: video.file_size,
            created_at: format_primitive(video.created_at),
            updated_at: format_primitive(video.updated_at),
        }
    }
}

/// Resolved playback location. YouTube videos return their public URL,
/// uploaded videos a short-lived presigned link.
#[derive(Debug, Serialize)]
pub(crate) struct VideoUrlResponse {
    pub(crate) video_id: String,
    pub(crate) url: String,
    pub(crate) video_type: VideoType,
    pub(crate) expires_in_seconds: Option<u64>,
}
