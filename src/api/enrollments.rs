use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{CourseStatus, EnrollmentStatus};
use crate::repositories;
use crate::schemas::enrollment::{
    EnrolledCourseResponse, EnrollmentResponse, StudentDashboardResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/course/:course_id", post(enroll))
        .route("/:enrollment_id/payment/complete", post(complete_payment))
        .route("/my", get(my_enrollments))
}

/// Student-facing views that hang off /student rather than /enrollments.
pub(crate) fn student_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/courses", get(my_courses))
}

async fn enroll(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;
    if course.status != CourseStatus::Published {
        return Err(ApiError::NotFound(format!("Course {course_id} not found")));
    }

    let existing =
        repositories::enrollments::find_by_student_course(state.db(), &user.id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Already enrolled in this course".to_string()));
    }

    // The unique (student_id, course_id) index backs the check above under
    // concurrent requests.
    let enrollment = repositories::enrollments::create(
        state.db(),
        repositories::enrollments::CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            student_id: &user.id,
            course_id: &course_id,
            payment_amount: course.price,
            enrolled_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            ApiError::Conflict("Already enrolled in this course".to_string())
        }
        other => ApiError::internal(other, "Failed to create enrollment"),
    })?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

/// Stand-in for the payment processor callback. Safe to call twice.
async fn complete_payment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(enrollment_id): Path<String>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = repositories::enrollments::find_by_id(state.db(), &enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
        .ok_or_else(|| ApiError::NotFound(format!("Enrollment {enrollment_id} not found")))?;
    if enrollment.student_id != user.id {
        return Err(ApiError::Forbidden("Not your enrollment"));
    }

    repositories::enrollments::mark_payment_completed(state.db(), &enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to complete payment"))?;

    let refreshed = repositories::enrollments::find_by_id(state.db(), &enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch enrollment"))?
        .ok_or_else(|| ApiError::NotFound(format!("Enrollment {enrollment_id} not found")))?;

    Ok(Json(EnrollmentResponse::from_db(refreshed)))
}

async fn my_enrollments(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = repositories::enrollments::list_by_student(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from_db).collect()))
}

async fn dashboard(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StudentDashboardResponse>, ApiError> {
    let rows = repositories::enrollments::list_courses_for_student(state.db(), &user.id, false)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrolled courses"))?;

    let total_enrollments = rows.len();
    let active_courses =
        rows.iter().filter(|row| row.status == EnrollmentStatus::Active).count();
    let completed_courses =
        rows.iter().filter(|row| row.status == EnrollmentStatus::Completed).count();
    let average_progress = if rows.is_empty() {
        0.0
    } else {
        let sum: f64 = rows.iter().map(|row| row.progress_percentage).sum();
        (sum / rows.len() as f64 * 100.0).round() / 100.0
    };

    Ok(Json(StudentDashboardResponse {
        total_enrollments,
        active_courses,
        completed_courses,
        average_progress,
        courses: rows.into_iter().map(EnrolledCourseResponse::from_row).collect(),
    }))
}

/// Only courses the student has actually paid for.
async fn my_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrolledCourseResponse>>, ApiError> {
    let rows = repositories::enrollments::list_courses_for_student(state.db(), &user.id, true)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrolled courses"))?;

    Ok(Json(rows.into_iter().map(EnrolledCourseResponse::from_row).collect()))
}
