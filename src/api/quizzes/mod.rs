mod attempts;
mod handlers;
mod helpers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/content/:content_id", post(handlers::create_quiz).get(handlers::get_quiz_for_content))
        .route(
            "/:quiz_id",
            get(handlers::get_quiz).put(handlers::update_quiz).delete(handlers::delete_quiz),
        )
        .route("/:quiz_id/manage", get(handlers::get_quiz_manage))
        .route("/:quiz_id/publish", post(handlers::publish_quiz))
        .route("/:quiz_id/unpublish", post(handlers::unpublish_quiz))
        .route("/:quiz_id/questions", post(handlers::add_question))
        .route(
            "/questions/:question_id",
            axum::routing::put(handlers::update_question).delete(handlers::delete_question),
        )
        .route("/questions/:question_id/options", post(handlers::add_option))
        .route(
            "/options/:option_id",
            axum::routing::put(handlers::update_option).delete(handlers::delete_option),
        )
        .route("/:quiz_id/attempts", get(attempts::list_my_attempts))
        .route("/:quiz_id/attempts/start", post(attempts::start_attempt))
        .route("/attempts/:attempt_id", get(attempts::get_attempt))
        .route("/attempts/:attempt_id/answers", post(attempts::submit_answer))
        .route("/attempts/:attempt_id/complete", post(attempts::complete_attempt))
}

#[cfg(test)]
mod tests;
