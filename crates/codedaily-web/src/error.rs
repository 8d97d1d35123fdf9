use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use codedaily_core::DailyError;
use serde_json::json;

/// Error returned by API handlers.
///
/// Rendered as `{"error": true, "message": ..., "status": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DailyError> for ApiError {
    fn from(err: DailyError) -> Self {
        if matches!(err, DailyError::InvalidGoal(_)) {
            Self::unprocessable(err.to_string())
        } else if err.is_upstream() {
            tracing::warn!(error = %err, "activity source failed");
            Self::bad_gateway(err.to_string())
        } else {
            tracing::error!(error = %err, "request failed");
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16(),
        });
        (self.status_code, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_internal() {
        let err = ApiError::from(DailyError::Config("missing GITHUB_TOKEN".into()));
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn invalid_goal_is_unprocessable() {
        let err = ApiError::from(DailyError::InvalidGoal(0));
        assert_eq!(err.status_code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn source_errors_are_bad_gateway() {
        for err in [
            DailyError::Auth,
            DailyError::UserNotFound("ghost".into()),
            DailyError::RateLimited {
                remaining: "0".into(),
            },
            DailyError::Api {
                status: 500,
                body: "boom".into(),
            },
            DailyError::Http("timeout".into()),
            DailyError::Git("no HEAD".into()),
        ] {
            assert_eq!(ApiError::from(err).status_code, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn not_found_message_names_the_user() {
        let err = ApiError::from(DailyError::UserNotFound("ghost".into()));
        assert_eq!(err.to_string(), "user 'ghost' not found on GitHub.");
    }
}
