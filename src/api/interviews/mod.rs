mod attempts;
mod handlers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(handlers::generate_interview))
        .route("/course/:course_id", get(handlers::list_for_course))
        .route("/:interview_id", get(handlers::get_interview).delete(handlers::delete_interview))
        .route("/:interview_id/manage", get(handlers::get_interview_manage))
        .route("/:interview_id/publish", post(handlers::publish_interview))
        .route("/:interview_id/unpublish", post(handlers::unpublish_interview))
        .route("/:interview_id/attempts", get(attempts::list_my_attempts))
        .route("/:interview_id/attempts/start", post(attempts::start_attempt))
        .route("/attempts/:attempt_id", get(attempts::get_attempt))
        .route("/attempts/:attempt_id/answers", post(attempts::submit_answer))
        .route("/attempts/:attempt_id/complete", post(attempts::complete_attempt))
}

#[cfg(test)]
mod tests;
