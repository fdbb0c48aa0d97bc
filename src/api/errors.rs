use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    status: u16,
    error: String,
}

fn envelope(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { success: false, status: status.as_u16(), error }))
        .into_response()
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(&'static str),
    ServiceUnavailable(String),
    UpstreamFailure(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response = envelope(StatusCode::UNAUTHORIZED, message.to_string());
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => envelope(StatusCode::FORBIDDEN, message.to_string()),
            ApiError::BadRequest(message) => envelope(StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => envelope(StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => envelope(StatusCode::CONFLICT, message),
            ApiError::TooManyRequests(message) => {
                envelope(StatusCode::TOO_MANY_REQUESTS, message.to_string())
            }
            ApiError::ServiceUnavailable(message) => {
                tracing::error!(error = %message, "Service unavailable");
                envelope(StatusCode::SERVICE_UNAVAILABLE, message)
            }
            ApiError::UpstreamFailure(message) => {
                tracing::error!(error = %message, "Upstream provider failure");
                envelope(StatusCode::BAD_GATEWAY, message)
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                envelope(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
