use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Enrollment, StudentProgress, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::progress::{
    CourseProgressSummary, EnrollmentProgressResponse, ProgressResponse, ProgressUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/enrollment/:enrollment_id/material/:material_id",
            put(update_material_progress),
        )
        .route(
            "/enrollment/:enrollment_id/material/:material_id/start",
            post(start_material),
        )
        .route("/enrollment/:enrollment_id", get(enrollment_progress))
        .route("/student/:student_id/course/:course_id", get(course_progress))
}

async fn update_material_progress(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((enrollment_id, material_id)): Path<(String, String)>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<Json<ProgressResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let enrollment = fetch_enrollment(&state, &enrollment_id).await?;
    if enrollment.student_id != user.id {
        return Err(ApiError::Forbidden("Not your enrollment"));
    }
    require_material(&state, &material_id).await?;

    let now = primitive_now_utc();
    let current = repositories::progress::ensure_row(
        state.db(),
        &Uuid::new_v4().to_string(),
        &enrollment_id,
        &material_id,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load progress row"))?;

    let change = merge_update(&current, &payload, now);
    let updated = repositories::progress::apply(state.db(), &current.id, change)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update progress"))?;

    repositories::enrollments::touch_last_accessed(state.db(), &enrollment_id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to touch enrollment"))?;

    Ok(Json(ProgressResponse::from_db(updated)))
}

/// Idempotent: restarting an already-tracked material returns the existing
/// row untouched.
async fn start_material(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((enrollment_id, material_id)): Path<(String, String)>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let enrollment = fetch_enrollment(&state, &enrollment_id).await?;
    if enrollment.student_id != user.id {
        return Err(ApiError::Forbidden("Not your enrollment"));
    }
    require_material(&state, &material_id).await?;

    let row = repositories::progress::ensure_row(
        state.db(),
        &Uuid::new_v4().to_string(),
        &enrollment_id,
        &material_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to start material"))?;

    Ok(Json(ProgressResponse::from_db(row)))
}

async fn enrollment_progress(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
) -> Result<Json<EnrollmentProgressResponse>, ApiError> {
    let enrollment = fetch_enrollment(&state, &enrollment_id).await?;
    require_progress_reader(&user, &enrollment.student_id)?;

    let rows = repositories::progress::list_by_enrollment(state.db(), &enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list progress"))?;

    let completed_count = rows.iter().filter(|row| row.completed).count() as i64;
    let average_progress = mean_percentage(&rows);

    Ok(Json(EnrollmentProgressResponse {
        enrollment_id,
        completed_count,
        average_progress,
        materials: rows.into_iter().map(ProgressResponse::from_db).collect(),
    }))
}

async fn course_progress(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> Result<Json<CourseProgressSummary>, ApiError> {
    require_progress_reader(&user, &student_id)?;

    let enrollment =
        repositories::enrollments::find_by_student_course(state.db(), &student_id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "No enrollment for student {student_id} in course {course_id}"
                ))
            })?;

    let rows = repositories::progress::list_by_enrollment(state.db(), &enrollment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list progress"))?;

    let total_materials = repositories::materials::count_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count materials"))?;
    let completed_materials = rows.iter().filter(|row| row.completed).count() as i64;
    let progress_percentage = mean_percentage(&rows);
    let total_time_spent_seconds = rows.iter().map(|row| row.time_spent_seconds).sum();

    Ok(Json(CourseProgressSummary {
        enrollment_id: enrollment.id,
        course_id,
        total_materials,
        completed_materials,
        progress_percentage,
        total_time_spent_seconds,
        materials: rows.into_iter().map(ProgressResponse::from_db).collect(),
    }))
}

/// The enrolled student themselves, or any instructor or admin.
fn require_progress_reader(user: &User, student_id: &str) -> Result<(), ApiError> {
    if user.id == student_id || matches!(user.role, UserRole::Instructor | UserRole::Admin) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied"))
    }
}

fn merge_update(
    current: &StudentProgress,
    payload: &ProgressUpdate,
    now: time::PrimitiveDateTime,
) -> repositories::progress::ApplyProgress {
    let mut percentage = payload.progress_percentage.unwrap_or(current.progress_percentage);
    let mut completed = current.completed || percentage >= 100.0;
    if payload.completed == Some(true) {
        completed = true;
        percentage = 100.0;
    }

    repositories::progress::ApplyProgress {
        progress_percentage: percentage,
        completed,
        added_seconds: payload.time_spent_seconds.unwrap_or(0),
        stamp_completed_at: completed && !current.completed,
        updated_at: now,
    }
}

/// Mean of the tracked percentages, rounded to two decimals; 0.0 when
/// nothing is tracked yet.
fn mean_percentage(rows: &[StudentProgress]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let sum: f64 = rows.iter().map(|row| row.progress_percentage).sum();
    (sum / rows.len() as f64 * 100.0).round() / 100.0
}

async fn fetch_enrollment(state: &AppState, enrollment_id: &str) -> Result<Enrollment, ApiError> {
    repositories::enrollments::find_by_id(state.db(), enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
        .ok_or_else(|| ApiError::NotFound(format!("Enrollment {enrollment_id} not found")))
}

async fn require_material(state: &AppState, material_id: &str) -> Result<(), ApiError> {
    repositories::materials::find_by_id(state.db(), material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch material"))?
        .ok_or_else(|| ApiError::NotFound(format!("Material {material_id} not found")))?;
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use time::macros::datetime;

    use super::{mean_percentage, merge_update};
    use crate::db::models::StudentProgress;
    use crate::schemas::progress::ProgressUpdate;

    fn row(completed: bool, percentage: f64, seconds: i64) -> StudentProgress {
        StudentProgress {
            id: "p1".into(),
            enrollment_id: "e1".into(),
            material_id: "m1".into(),
            completed,
            progress_percentage: percentage,
            time_spent_seconds: seconds,
            started_at: Some(datetime!(2026-01-01 10:00)),
            completed_at: None,
            updated_at: datetime!(2026-01-01 10:00),
        }
    }

    #[test]
    fn full_percentage_marks_completed() {
        let change = merge_update(
            &row(false, 40.0, 0),
            &ProgressUpdate {
                progress_percentage: Some(100.0),
                time_spent_seconds: None,
                completed: None,
            },
            datetime!(2026-01-02 10:00),
        );
        assert!(change.completed);
        assert!(change.stamp_completed_at);
        assert_eq!(change.progress_percentage, 100.0);
    }

    #[test]
    fn explicit_completed_forces_full_percentage() {
        let change = merge_update(
            &row(false, 30.0, 0),
            &ProgressUpdate {
                progress_percentage: None,
                time_spent_seconds: Some(120),
                completed: Some(true),
            },
            datetime!(2026-01-02 10:00),
        );
        assert_eq!(change.progress_percentage, 100.0);
        assert_eq!(change.added_seconds, 120);
        assert!(change.stamp_completed_at);
    }

    #[test]
    fn completed_row_never_restamps() {
        let change = merge_update(
            &row(true, 100.0, 600),
            &ProgressUpdate {
                progress_percentage: None,
                time_spent_seconds: Some(60),
                completed: Some(true),
            },
            datetime!(2026-01-02 10:00),
        );
        assert!(!change.stamp_completed_at);
    }

    #[test]
    fn mean_percentage_rounds_to_two_decimals() {
        let rows = vec![row(false, 33.0, 0), row(false, 34.0, 0), row(false, 34.0, 0)];
        assert_eq!(mean_percentage(&rows), 33.67);
        assert_eq!(mean_percentage(&[]), 0.0);
    }
}
