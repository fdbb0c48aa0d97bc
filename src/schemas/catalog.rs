use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{LearningMaterial, Topic};
use crate::db::types::MaterialType;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TopicCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TopicUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) order_index: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl TopicResponse {
    pub(crate) fn from_db(topic: Topic) -> Self {
        Self {
            id: topic.id,
            course_id: topic.course_id,
            title: topic.title,
            description: topic.description,
            order_index: topic.order_index,
            is_published: topic.is_published,
            created_at: format_primitive(topic.created_at),
            updated_at: format_primitive(topic.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MaterialCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "materialType")]
    pub(crate) material_type: MaterialType,
    #[serde(default)]
    #[serde(alias = "contentUrl")]
    pub(crate) content_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "videoUrl")]
    pub(crate) video_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "pdfUrl")]
    pub(crate) pdf_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationSeconds")]
    pub(crate) duration_seconds: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isFree")]
    pub(crate) is_free: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MaterialUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "contentUrl")]
    pub(crate) content_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "videoUrl")]
    pub(crate) video_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "pdfUrl")]
    pub(crate) pdf_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationSeconds")]
    pub(crate) duration_seconds: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: Option<bool>,
    #[serde(default)]
    #[serde(alias = "isFree")]
    pub(crate) is_free: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MaterialResponse {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) material_type: MaterialType,
    pub(crate) content_url: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) order_index: i32,
    pub(crate) is_published: bool,
    pub(crate) is_free: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl MaterialResponse {
    pub(crate) fn from_db(material: LearningMaterial) -> Self {
        Self {
            id: material.id,
            topic_id: material.topic_id,
            title: material.title,
            description: material.description,
            material_type: material.material_type,
            content_url: material.content_url,
            video_url: material.video_url,
            pdf_url: material.pdf_url,
            thumbnail_url: material.thumbnail_url,
            duration_seconds: material.duration_seconds,
            file_size: material.file_size,
            order_index: material.order_index,
            is_published: material.is_published,
            is_free: material.is_free,
            created_at: format_primitive(material.created_at),
            updated_at: format_primitive(material.updated_at),
        }
    }
}
