use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentInstructor, CurrentUser, MaybeUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{CourseStatus, UserRole};
use crate::repositories;
use crate::schemas::catalog::{TopicCreate, TopicResponse};
use crate::schemas::course::{
    CourseCreate, CourseResponse, CourseUpdate, ModuleCreate, ModuleResponse, PublicCourseResponse,
};

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/my", get(my_courses))
        .route("/instructor/:instructor_id", get(instructor_courses))
        .route("/:course_id", get(get_course).put(update_course).delete(delete_course))
        .route("/:course_id/publish", post(publish_course))
        .route("/:course_id/unpublish", post(unpublish_course))
        .route("/:course_id/modules", get(list_modules).post(create_module))
        .route("/:course_id/topics", get(list_topics).post(create_topic))
}

async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicCourseResponse>>, ApiError> {
    let rows = repositories::courses::list_published(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(rows.into_iter().map(PublicCourseResponse::from_row).collect()))
}

/// Published courses by one instructor, same public shape as the main listing.
async fn instructor_courses(
    State(state): State<AppState>,
    Path(instructor_id): Path<String>,
) -> Result<Json<Vec<PublicCourseResponse>>, ApiError> {
    let rows = repositories::courses::list_published_by_instructor(state.db(), &instructor_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(rows.into_iter().map(PublicCourseResponse::from_row).collect()))
}

async fn create_course(
    CurrentInstructor(instructor): CurrentInstructor,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            price: payload.price,
            thumbnail_url: payload.thumbnail_url.as_deref(),
            status: CourseStatus::Draft,
            instructor_id: &instructor.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn my_courses(
    CurrentInstructor(instructor): CurrentInstructor,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_by_instructor(state.db(), &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn get_course(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    // Drafts are visible only to the owning instructor and admins.
    if course.status != CourseStatus::Published {
        let allowed = user
            .as_ref()
            .is_some_and(|u| u.role == UserRole::Admin || u.id == course.instructor_id);
        if !allowed {
            return Err(ApiError::NotFound(format!("Course {course_id} not found")));
        }
    }

    Ok(Json(CourseResponse::from_db(course)))
}

async fn update_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_course_owner(&state, &user, &course_id).await?;

    repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            description: payload.description,
            price: payload.price,
            thumbnail_url: payload.thumbnail_url,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn publish_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, ApiError> {
    set_course_status(&state, &user, &course_id, CourseStatus::Published).await
}

async fn unpublish_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, ApiError> {
    set_course_status(&state, &user, &course_id, CourseStatus::Draft).await
}

async fn set_course_status(
    state: &AppState,
    user: &crate::db::models::User,
    course_id: &str,
    status: CourseStatus,
) -> Result<Json<CourseResponse>, ApiError> {
    require_course_owner(state, user, course_id).await?;

    repositories::courses::set_status(state.db(), course_id, status, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update course status"))?;

    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn delete_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_course_owner(&state, &user, &course_id).await?;

    repositories::courses::delete(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn list_modules(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let is_owner = user
        .as_ref()
        .is_some_and(|u| u.role == UserRole::Admin || u.id == course.instructor_id);

    let modules = repositories::modules::list_by_course(state.db(), &course_id, !is_owner)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list modules"))?;

    Ok(Json(modules.into_iter().map(ModuleResponse::from_db).collect()))
}

async fn create_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(payload): Json<ModuleCreate>,
) -> Result<(StatusCode, Json<ModuleResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_course_owner(&state, &user, &course_id).await?;

    let now = primitive_now_utc();
    let module = repositories::modules::create(
        state.db(),
        repositories::modules::CreateModule {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create module"))?;

    Ok((StatusCode::CREATED, Json(ModuleResponse::from_db(module))))
}

async fn list_topics(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;

    let is_owner = user
        .as_ref()
        .is_some_and(|u| u.role == UserRole::Admin || u.id == course.instructor_id);

    let topics = repositories::topics::list_by_course(state.db(), &course_id, !is_owner)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;

    Ok(Json(topics.into_iter().map(TopicResponse::from_db).collect()))
}

async fn create_topic(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(payload): Json<TopicCreate>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_course_owner(&state, &user, &course_id).await?;

    let now = primitive_now_utc();
    let topic = repositories::topics::create(
        state.db(),
        repositories::topics::CreateTopic {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create topic"))?;

    Ok((StatusCode::CREATED, Json(TopicResponse::from_db(topic))))
}
