use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::users::error::UserError;

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub const fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub const fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }

    pub const fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error.",
        }
    }
}

/// Default wording; individual handlers override where theirs differs.
impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::MissingField => ApiError::bad_request("Facebook ID is required."),
            UserError::NotFound => ApiError::not_found("User not found."),
            UserError::AlreadyExists => ApiError::bad_request("User already exists."),
            UserError::Storage(inner) => {
                error!(error = %inner, "user store failure");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            warn!(status = %self.status, message = self.message, "request rejected");
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn error_body_is_single_error_field() {
        let res = ApiError::not_found("User not found.").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "User not found." }));
    }

    #[test]
    fn duplicate_maps_to_bad_request() {
        let err = ApiError::from(UserError::AlreadyExists);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "User already exists.");
    }
}
