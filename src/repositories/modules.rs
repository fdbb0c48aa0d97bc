use sqlx::PgPool;

use crate::db::models::CourseModule;

const COLUMNS: &str = "\
    id, course_id, title, description, module_order, is_published, created_at, updated_at";

pub(crate) struct CreateModule<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateModule {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

// module_order is append-only: assigned inside the insert so concurrent
// creates cannot produce duplicates within a course.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateModule<'_>,
) -> Result<CourseModule, sqlx::Error> {
    sqlx::query_as::<_, CourseModule>(&format!(
        "INSERT INTO course_modules (
            id, course_id, title, description, module_order, is_published,
            created_at, updated_at
         ) VALUES (
            $1, $2, $3, $4,
            (SELECT COALESCE(MAX(module_order), 0) + 1 FROM course_modules WHERE course_id = $2),
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
    module_id: &str,
) -> Result<Option<CourseModule>, sqlx::Error> {
    sqlx::query_as::<_, CourseModule>(&format!(
        "SELECT {COLUMNS} FROM course_modules WHERE id = $1"
    ))
    .bind(module_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
    published_only: bool,
) -> Result<Vec<CourseModule>, sqlx::Error> {
    let filter = if published_only { " AND is_published = TRUE" } else { "" };
    sqlx::query_as::<_, CourseModule>(&format!(
        "SELECT {COLUMNS} FROM course_modules
         WHERE course_id = $1{filter}
         ORDER BY module_order",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    module_id: &str,
    params: UpdateModule,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE course_modules SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.updated_at)
    .bind(module_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_published(
    pool: &PgPool,
    module_id: &str,
    is_published: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE course_modules SET is_published = $1, updated_at = $2 WHERE id = $3")
        .bind(is_published)
        .bind(updated_at)
        .bind(module_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, module_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM course_modules WHERE id = $1").bind(module_id).execute(pool).await?;
    Ok(())
}

