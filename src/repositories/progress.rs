use sqlx::PgPool;

use crate::db::models::StudentProgress;

const COLUMNS: &str = "\
    id, enrollment_id, material_id, completed, progress_percentage, time_spent_seconds, \
    started_at, completed_at, updated_at";

/// Find-or-create keyed by (enrollment, material); concurrent starts collapse
/// onto the same row via ON CONFLICT.
pub(crate) async fn ensure_row(
    pool: &PgPool,
    id: &str,
    enrollment_id: &str,
    material_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<StudentProgress, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "INSERT INTO student_progress (
            id, enrollment_id, material_id, completed, progress_percentage,
            time_spent_seconds, started_at, updated_at
         ) VALUES ($1, $2, $3, FALSE, 0, 0, $4, $4)
         ON CONFLICT (enrollment_id, material_id)
         DO UPDATE SET updated_at = student_progress.updated_at
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(enrollment_id)
    .bind(material_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) struct ApplyProgress {
    pub(crate) progress_percentage: f64,
    pub(crate) completed: bool,
    pub(crate) added_seconds: i64,
    // First completion wins; never overwritten afterwards.
    pub(crate) stamp_completed_at: bool,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn apply(
    pool: &PgPool,
    progress_id: &str,
    params: ApplyProgress,
) -> Result<StudentProgress, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "UPDATE student_progress SET
            progress_percentage = $1,
            completed = $2,
            time_spent_seconds = time_spent_seconds + $3,
            completed_at = CASE WHEN $4 AND completed_at IS NULL THEN $5 ELSE completed_at END,
            updated_at = $5
         WHERE id = $6
         RETURNING {COLUMNS}",
    ))
    .bind(params.progress_percentage)
    .bind(params.completed)
    .bind(params.added_seconds)
    .bind(params.stamp_completed_at)
    .bind(params.updated_at)
    .bind(progress_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_enrollment(
    pool: &PgPool,
    enrollment_id: &str,
) -> Result<Vec<StudentProgress>, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "SELECT {COLUMNS} FROM student_progress WHERE enrollment_id = $1 ORDER BY updated_at DESC"
    ))
    .bind(enrollment_id)
    .fetch_all(pool)
    .await
}
