//! Error types for tuitionweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tuitionweb_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use tuitionweb_core::{CoreError, ErrorCode};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ApiError {
    /// Log a core failure against the operation that produced it
    pub fn logged(operation: &str) -> impl FnOnce(CoreError) -> ApiError + '_ {
        move |error| {
            DefaultErrorLogger.log_error(&error, &ErrorContext::new(operation));
            ApiError::Core(error)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error.code() {
                ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::UserNotFound | ErrorCode::SemesterNotFound | ErrorCode::GroupNotFound => {
                    StatusCode::NOT_FOUND
                }
                ErrorCode::ReadOnly => StatusCode::FORBIDDEN,
                ErrorCode::InvalidFormat | ErrorCode::SourceError => StatusCode::BAD_GATEWAY,
            },
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Core(error) => {
                let details = error.to_details();
                ErrorBody {
                    code: details.code.to_string(),
                    message: details.message,
                    details: details.details,
                    suggestions: details.suggestions,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tuitionweb_core::FieldError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(CoreError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(CoreError::Validation { errors: vec![] }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(CoreError::UserNotFound { id: "u1".to_string() }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CoreError::ReadOnly { operation: "pay".to_string() }).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let error = ApiError::from(CoreError::Validation {
            errors: vec![FieldError::new("amount", "Amount must be positive")],
        });
        let body = serde_json::to_value(error.body()).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "amount");
        assert!(body.get("suggestions").is_none());
    }
}
