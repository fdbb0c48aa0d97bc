use sqlx::{FromRow, PgPool};

use crate::db::models::Enrollment;
use crate::db::types::{EnrollmentStatus, PaymentStatus};

const COLUMNS: &str = "\
    id, student_id, course_id, enrolled_at, payment_amount, payment_status, \
    progress_percentage, overall_score, status, completed_at, last_accessed_at";

/// Enrollment joined with its course summary for student-facing listings.
#[derive(Debug, FromRow)]
pub(crate) struct EnrolledCourseRow {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
    pub(crate) payment_amount: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) progress_percentage: f64,
    pub(crate) status: EnrollmentStatus,
    pub(crate) course_title: String,
    pub(crate) course_thumbnail_url: Option<String>,
    pub(crate) instructor_first_name: String,
    pub(crate) instructor_last_name: String,
}

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) payment_amount: f64,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (
            id, student_id, course_id, enrolled_at, payment_amount, payment_status,
            progress_percentage, status
         ) VALUES ($1,$2,$3,$4,$5,'pending',0,'active')
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.course_id)
    .bind(params.enrolled_at)
    .bind(params.payment_amount)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    enrollment_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1"))
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_student_course(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

/// The content gate keys off a completed payment, nothing else.
pub(crate) async fn has_completed_payment(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_scalar::<_, i32>(
        "SELECT 1 FROM enrollments
         WHERE student_id = $1 AND course_id = $2 AND payment_status = 'completed'",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub(crate) async fn mark_payment_completed(
    pool: &PgPool,
    enrollment_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE enrollments SET payment_status = 'completed' WHERE id = $1")
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE student_id = $1 ORDER BY enrolled_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_courses_for_student(
    pool: &PgPool,
    student_id: &str,
    paid_only: bool,
) -> Result<Vec<EnrolledCourseRow>, sqlx::Error> {
    let filter = if paid_only { " AND e.payment_status = 'completed'" } else { "" };
    sqlx::query_as::<_, EnrolledCourseRow>(&format!(
        "SELECT e.id, e.course_id, e.enrolled_at, e.payment_amount, e.payment_status,
                e.progress_percentage, e.status,
                c.title AS course_title, c.thumbnail_url AS course_thumbnail_url,
                u.first_name AS instructor_first_name, u.last_name AS instructor_last_name
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN users u ON u.id = c.instructor_id
         WHERE e.student_id = $1{filter}
         ORDER BY e.enrolled_at DESC",
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn touch_last_accessed(
    pool: &PgPool,
    enrollment_id: &str,
    at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE enrollments SET last_accessed_at = $1 WHERE id = $2")
        .bind(at)
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn count_paid(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE payment_status = 'completed'",
    )
    .fetch_one(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments").fetch_one(pool).await
}
