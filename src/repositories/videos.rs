use sqlx::PgPool;

use crate::db::models::Video;
use crate::db::types::{VideoStatus, VideoType};

const COLUMNS: &str = "\
    id, course_id, title, description, video_url, storage_key, video_type, status, \
    is_preview, order_index, duration_seconds, file_size, content_hash, created_at, updated_at";

pub(crate) struct CreateVideo<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) video_url: Option<&'a str>,
    pub(crate) video_type: VideoType,
    pub(crate) status: VideoStatus,
    pub(crate) is_preview: bool,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateVideo<'_>) -> Result<Video, sqlx::Error> {
    // order_index is assigned inside the insert so concurrent creates cannot
    // produce duplicates within a course.
    sqlx::query_as::<_, Video>(&format!(
        "INSERT INTO videos (
            id, course_id, title, description, video_url, video_type, status,
            is_preview, order_index, duration_seconds, created_at, updated_at
         ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8,
            (SELECT COALESCE(MAX(order_index), 0) + 1 FROM videos WHERE course_id = $2),
            $9, $10, $10
         )
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.video_url)
    .bind(params.video_type)
    .bind(params.status)
    .bind(params.is_preview)
    .bind(params.duration_seconds)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, video_id: &str) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {COLUMNS} FROM videos WHERE id = $1"))
        .bind(video_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
    previews_only: bool,
) -> Result<Vec<Video>, sqlx::Error> {
    let mut sql = format!("SELECT {COLUMNS} FROM videos WHERE course_id = $1");
    if previews_only {
        sql.push_str(" AND is_preview = TRUE");
    }
    sql.push_str(" ORDER BY order_index");
    sqlx::query_as::<_, Video>(&sql)
        .bind(course_id)
        .fetch_all(pool)
        .await
}

pub(crate) struct StoredUpload<'a> {
    pub(crate) storage_key: &'a str,
    pub(crate) file_size: i64,
    pub(crate) content_hash: &'a str,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn mark_uploaded(
    pool: &PgPool,
    video_id: &str,
    params: StoredUpload<'_>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET
            storage_key = $1, file_size = $2, content_hash = $3,
            status = 'ready', updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(params.storage_key)
    .bind(params.file_size)
    .bind(params.content_hash)
    .bind(params.updated_at)
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn mark_failed(
    pool: &PgPool,
    video_id: &str,
    updated_at: time::PrimitiveDateTime,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET status = 'failed', updated_at = $1 WHERE id = $2
         RETURNING {COLUMNS}",
    ))
    .bind(updated_at)
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn set_preview(
    pool: &PgPool,
    video_id: &str,
    is_preview: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        "UPDATE videos SET is_preview = $1, updated_at = $2 WHERE id = $3
         RETURNING {COLUMNS}",
    ))
    .bind(is_preview)
    .bind(updated_at)
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, video_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
