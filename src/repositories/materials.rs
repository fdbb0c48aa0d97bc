use sqlx::PgPool;

use crate::db::models::LearningMaterial;
use crate::db::types::MaterialType;

const COLUMNS: &str = "\
    id, topic_id, title, description, material_type, content_url, video_url, pdf_url, \
    thumbnail_url, duration_seconds, file_size, order_index, is_published, is_free, \
    created_at, updated_at";

pub(crate) struct CreateMaterial<'a> {
    pub(crate) id: &'a str,
    pub(crate) topic_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) material_type: MaterialType,
    pub(crate) content_url: Option<&'a str>,
    pub(crate) video_url: Option<&'a str>,
    pub(crate) pdf_url: Option<&'a str>,
    pub(crate) thumbnail_url: Option<&'a str>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_free: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateMaterial {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) content_url: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_published: Option<bool>,
    pub(crate) is_free: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateMaterial<'_>,
) -> Result<LearningMaterial, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(&format!(
        "INSERT INTO learning_materials (
            id, topic_id, title, description, material_type, content_url, video_url,
            pdf_url, thumbnail_url, duration_seconds, file_size, order_index,
            is_published, is_free, created_at, updated_at
         ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
            (SELECT COALESCE(MAX(order_index), 0) + 1 FROM learning_materials WHERE topic_id = $2),
            FALSE, $12, $13, $14
         )
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.topic_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.material_type)
    .bind(params.content_url)
    .bind(params.video_url)
    .bind(params.pdf_url)
    .bind(params.thumbnail_url)
    .bind(params.duration_seconds)
    .bind(params.file_size)
    .bind(params.is_free)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    material_id: &str,
) -> Result<Option<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(&format!(
        "SELECT {COLUMNS} FROM learning_materials WHERE id = $1"
    ))
    .bind(material_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_topic(
    pool: &PgPool,
    topic_id: &str,
    published_only: bool,
) -> Result<Vec<LearningMaterial>, sqlx::Error> {
    let filter = if published_only { " AND is_published = TRUE" } else { "" };
    sqlx::query_as::<_, LearningMaterial>(&format!(
        "SELECT {COLUMNS} FROM learning_materials WHERE topic_id = $1{filter} ORDER BY order_index",
    ))
    .bind(topic_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    material_id: &str,
    params: UpdateMaterial,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE learning_materials SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            content_url = COALESCE($3, content_url),
            video_url = COALESCE($4, video_url),
            pdf_url = COALESCE($5, pdf_url),
            thumbnail_url = COALESCE($6, thumbnail_url),
            duration_seconds = COALESCE($7, duration_seconds),
            file_size = COALESCE($8, file_size),
            is_published = COALESCE($9, is_published),
            is_free = COALESCE($10, is_free),
            updated_at = $11
         WHERE id = $12",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.content_url)
    .bind(params.video_url)
    .bind(params.pdf_url)
    .bind(params.thumbnail_url)
    .bind(params.duration_seconds)
    .bind(params.file_size)
    .bind(params.is_published)
    .bind(params.is_free)
    .bind(params.updated_at)
    .bind(material_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, material_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM learning_materials WHERE id = $1")
        .bind(material_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Course id owning a material, through its topic.
pub(crate) async fn find_course_id(
    pool: &PgPool,
    material_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT t.course_id FROM learning_materials lm
         JOIN topics t ON t.id = lm.topic_id
         WHERE lm.id = $1",
    )
    .bind(material_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn count_by_course(pool: &PgPool, course_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM learning_materials lm
         JOIN topics t ON t.id = lm.topic_id
         WHERE t.course_id = $1",
    )
    .bind(course_id)
    .fetch_one(pool)
    .await
}
