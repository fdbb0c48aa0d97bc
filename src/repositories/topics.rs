use sqlx::PgPool;

use crate::db::models::Topic;

const COLUMNS: &str = "\
    id, course_id, title, description, order_index, is_published, created_at, updated_at";

pub(crate) struct CreateTopic<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateTopic {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) is_published: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateTopic<'_>) -> Result<Topic, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "INSERT INTO topics (
            id, course_id, title, description, order_index, is_published, created_at, updated_at
         ) VALUES (
            $1, $2, $3, $4,
            (SELECT COALESCE(MAX(order_index), 0) + 1 FROM topics WHERE course_id = $2),
            FALSE, $5, $6
         )
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    topic_id: &str,
) -> Result<Option<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!("SELECT {COLUMNS} FROM topics WHERE id = $1"))
        .bind(topic_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
    published_only: bool,
) -> Result<Vec<Topic>, sqlx::Error> {
    let filter = if published_only { " AND is_published = TRUE" } else { "" };
    sqlx::query_as::<_, Topic>(&format!(
        "SELECT {COLUMNS} FROM topics WHERE course_id = $1{filter} ORDER BY order_index",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    topic_id: &str,
    params: UpdateTopic,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE topics SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            is_published = COALESCE($3, is_published),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.is_published)
    .bind(params.updated_at)
    .bind(topic_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, topic_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM topics WHERE id = $1").bind(topic_id).execute(pool).await?;
    Ok(())
}
