use sqlx::{FromRow, PgPool};

use crate::db::models::Course;
use crate::db::types::CourseStatus;

const COLUMNS: &str = "\
    id, title, description, price, thumbnail_url, status, instructor_id, \
    created_at, updated_at";

/// Published-course listing row with the instructor summary joined in.
#[derive(Debug, FromRow)]
pub(crate) struct PublicCourseRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: f64,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) instructor_id: String,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
    pub(crate) instructor_first_name: String,
    pub(crate) instructor_last_name: String,
    pub(crate) instructor_email: String,
    pub(crate) module_count: i64,
}

const PUBLIC_COLUMNS: &str = "\
    c.id, c.title, c.description, c.price, c.thumbnail_url, c.status, c.instructor_id, \
    c.created_at, c.updated_at, \
    u.first_name AS instructor_first_name, u.last_name AS instructor_last_name, \
    u.email AS instructor_email, \
    (SELECT COUNT(*) FROM course_modules m WHERE m.course_id = c.id) AS module_count";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) price: f64,
    pub(crate) thumbnail_url: Option<&'a str>,
    pub(crate) status: CourseStatus,
    pub(crate) instructor_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateCourse {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) price: Option<f64>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, description, price, thumbnail_url, status, instructor_id,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.price)
    .bind(params.thumbnail_url)
    .bind(params.status)
    .bind(params.instructor_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    params: UpdateCourse,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            thumbnail_url = COALESCE($4, thumbnail_url),
            updated_at = $5
         WHERE id = $6",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.price)
    .bind(params.thumbnail_url)
    .bind(params.updated_at)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_status(
    pool: &PgPool,
    course_id: &str,
    status: CourseStatus,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status)
        .bind(updated_at)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM courses WHERE id = $1").bind(course_id).execute(pool).await?;
    Ok(())
}

pub(crate) async fn list_published(pool: &PgPool) -> Result<Vec<PublicCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, PublicCourseRow>(&format!(
        "SELECT {PUBLIC_COLUMNS}
         FROM courses c
         JOIN users u ON u.id = c.instructor_id
         WHERE c.status = 'published'
         ORDER BY c.created_at DESC",
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_published_by_instructor(
    pool: &PgPool,
    instructor_id: &str,
) -> Result<Vec<PublicCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, PublicCourseRow>(&format!(
        "SELECT {PUBLIC_COLUMNS}
         FROM courses c
         JOIN users u ON u.id = c.instructor_id
         WHERE c.status = 'published' AND c.instructor_id = $1
         ORDER BY c.created_at DESC",
    ))
    .bind(instructor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_instructor(
    pool: &PgPool,
    instructor_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC",
    ))
    .bind(instructor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses").fetch_one(pool).await
}

pub(crate) async fn count_published(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE status = 'published'")
        .fetch_one(pool)
        .await
}
