use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, CourseModule, ModuleContent};
use crate::db::types::{ContentType, CourseStatus};
use crate::repositories::courses::PublicCourseRow;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub(crate) price: f64,
    #[serde(default)]
    #[serde(alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    #[serde(alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: f64,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) instructor_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            thumbnail_url: course.thumbnail_url,
            status: course.status,
            instructor_id: course.instructor_id,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InstructorSummary {
    pub(crate) id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
}

/// Catalog view: course plus its instructor and module count.
#[derive(Debug, Serialize)]
pub(crate) struct PublicCourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: f64,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) instructor: InstructorSummary,
    pub(crate) module_count: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PublicCourseResponse {
    pub(crate) fn from_row(row: PublicCourseRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            thumbnail_url: row.thumbnail_url,
            status: row.status,
            instructor: InstructorSummary {
                id: row.instructor_id,
                first_name: row.instructor_first_name,
                last_name: row.instructor_last_name,
                email: row.instructor_email,
            },
            module_count: row.module_count,
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ModuleCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ModuleUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) module_order: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ModuleResponse {
    pub(crate) fn from_db(module: CourseModule) -> Self {
        Self {
            id: module.id,
            course_id: module.course_id,
            title: module.title,
            description: module.description,
            module_order: module.module_order,
            is_published: module.is_published,
            created_at: format_primitive(module.created_at),
            updated_at: format_primitive(module.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ContentCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "contentType")]
    pub(crate) content_type: ContentType,
    #[serde(default)]
    #[serde(alias = "videoUrl")]
    pub(crate) video_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "pdfUrl")]
    pub(crate) pdf_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "contentUrl")]
    pub(crate) content_url: Option<String>,
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
pub(crate) struct ContentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "videoUrl")]
    pub(crate) video_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "pdfUrl")]
    pub(crate) pdf_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "contentUrl")]
    pub(crate) content_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationSeconds")]
    pub(crate) duration_seconds: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isFree")]
    pub(crate) is_free: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentResponse {
    pub(crate) id: String,
    pub(crate) module_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) content_type: ContentType,
    pub(crate) content_order: i32,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) content_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_published: bool,
    pub(crate) is_free: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ContentResponse {
    pub(crate) fn from_db(content: ModuleContent) -> Self {
        Self {
            id: content.id,
            module_id: content.module_id,
            title: content.title,
            description: content.description,
            content_type: content.content_type,
            content_order: content.content_order,
            video_url: content.video_url,
            pdf_url: content.pdf_url,
            content_url: content.content_url,
            thumbnail_url: content.thumbnail_url,
            duration_seconds: content.duration_seconds,
            file_size: content.file_size,
            is_published: content.is_published,
            is_free: content.is_free,
            created_at: format_primitive(content.created_at),
            updated_at: format_primitive(content.updated_at),
        }
    }
}
