use sqlx::PgPool;

use crate::db::models::ModuleContent;
use crate::db::types::ContentType;

const COLUMNS: &str = "\
    id, module_id, title, description, content_type, content_order, video_url, pdf_url, \
    content_url, thumbnail_url, duration_seconds, file_size, is_published, is_free, \
    created_at, updated_at";

pub(crate) struct CreateContent<'a> {
    pub(crate) id: &'a str,
    pub(crate) module_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) content_type: ContentType,
    pub(crate) video_url: Option<&'a str>,
    pub(crate) pdf_url: Option<&'a str>,
    pub(crate) content_url: Option<&'a str>,
    pub(crate) thumbnail_url: Option<&'a str>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_free: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateContent {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) content_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_free: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateContent<'_>,
) -> Result<ModuleContent, sqlx::Error> {
    sqlx::query_as::<_, ModuleContent>(&format!(
        "INSERT INTO module_contents (
            id, module_id, title, description, content_type, content_order,
            video_url, pdf_url, content_url, thumbnail_url, duration_seconds,
            file_size, is_published, is_free, created_at, updated_at
         ) VALUES (
            $1, $2, $3, $4, $5,
            (SELECT COALESCE(MAX(content_order), 0) + 1 FROM module_contents WHERE module_id = $2),
            $6, $7, $8, $9, $10, $11, FALSE, $12, $13, $14
         )
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.module_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.content_type)
    .bind(params.video_url)
    .bind(params.pdf_url)
    .bind(params.content_url)
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
    content_id: &str,
) -> Result<Option<ModuleContent>, sqlx::Error> {
    sqlx::query_as::<_, ModuleContent>(&format!(
        "SELECT {COLUMNS} FROM module_contents WHERE id = $1"
    ))
    .bind(content_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_module(
    pool: &PgPool,
    module_id: &str,
) -> Result<Vec<ModuleContent>, sqlx::Error> {
    sqlx::query_as::<_, ModuleContent>(&format!(
        "SELECT {COLUMNS} FROM module_contents WHERE module_id = $1 ORDER BY content_order",
    ))
    .bind(module_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    content_id: &str,
    params: UpdateContent,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE module_contents SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            video_url = COALESCE($3, video_url),
            pdf_url = COALESCE($4, pdf_url),
            content_url = COALESCE($5, content_url),
            thumbnail_url = COALESCE($6, thumbnail_url),
            duration_seconds = COALESCE($7, duration_seconds),
            file_size = COALESCE($8, file_size),
            is_free = COALESCE($9, is_free),
            updated_at = $10
         WHERE id = $11",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.video_url)
    .bind(params.pdf_url)
    .bind(params.content_url)
    .bind(params.thumbnail_url)
    .bind(params.duration_seconds)
    .bind(params.file_size)
    .bind(params.is_free)
    .bind(params.updated_at)
    .bind(content_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_published(
    pool: &PgPool,
    content_id: &str,
    is_published: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE module_contents SET is_published = $1, updated_at = $2 WHERE id = $3")
        .bind(is_published)
        .bind(updated_at)
        .bind(content_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, content_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM module_contents WHERE id = $1").bind(content_id).execute(pool).await?;
    Ok(())
}

/// Resolves a content item to its owning course for the access gate.
pub(crate) async fn find_course_id(
    pool: &PgPool,
    content_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT m.course_id
         FROM module_contents c
         JOIN course_modules m ON m.id = c.module_id
         WHERE c.id = $1",
    )
    .bind(content_id)
    .fetch_optional(pool)
    .await
}
