use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
struct UserListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

async fn list_users(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let limit = params.limit.clamp(1, 1000);
    let skip = params.skip.max(0);

    let users = repositories::users::list(state.db(), skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;
    let total_count = repositories::users::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;

    Ok(Json(PaginatedResponse {
        items: users.into_iter().map(UserResponse::from_db).collect(),
        total_count,
        skip,
        limit,
    }))
}

#[derive(Debug, Serialize)]
struct AdminDashboardResponse {
    total_users: i64,
    total_students: i64,
    total_instructors: i64,
    total_admins: i64,
    total_courses: i64,
    published_courses: i64,
    total_enrollments: i64,
    paid_enrollments: i64,
}

async fn dashboard(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardResponse>, ApiError> {
    let db = state.db();

    let total_users = repositories::users::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;
    let total_students = repositories::users::count_by_role(db, UserRole::Student)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count students"))?;
    let total_instructors = repositories::users::count_by_role(db, UserRole::Instructor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count instructors"))?;
    let total_admins = repositories::users::count_by_role(db, UserRole::Admin)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count admins"))?;
    let total_courses = repositories::courses::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count courses"))?;
    let published_courses = repositories::courses::count_published(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count published courses"))?;
    let total_enrollments = repositories::enrollments::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?;
    let paid_enrollments = repositories::enrollments::count_paid(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count paid enrollments"))?;

    Ok(Json(AdminDashboardResponse {
        total_users,
        total_students,
        total_instructors,
        total_admins,
        total_courses,
        published_courses,
        total_enrollments,
        paid_enrollments,
    }))
}
