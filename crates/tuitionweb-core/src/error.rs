//! Error types for tuitionweb-core
//!
//! Error codes, severities and suggestion-carrying details for everything
//! the dashboard store can fail with.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tuitionweb_client::FetchError;

use crate::validation::FieldError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Token missing, expired or rejected
    Unauthorized,
    /// Draft failed client-side checks
    ValidationError,
    /// Record from the API could not be interpreted
    InvalidFormat,
    /// The payments API could not be reached or answered with an error
    SourceError,
    UserNotFound,
    SemesterNotFound,
    GroupNotFound,
    /// Source does not accept writes
    ReadOnly,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::SourceError => write!(f, "SOURCE_ERROR"),
            ErrorCode::UserNotFound => write!(f, "USER_NOT_FOUND"),
            ErrorCode::SemesterNotFound => write!(f, "SEMESTER_NOT_FOUND"),
            ErrorCode::GroupNotFound => write!(f, "GROUP_NOT_FOUND"),
            ErrorCode::ReadOnly => write!(f, "READ_ONLY"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation may be affected
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for tuitionweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unauthorized: sign in again")]
    Unauthorized,

    #[error("Validation failed for {}", field_list(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Payments API error: {message}")]
    Source { message: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Semester not found: {id}")]
    SemesterNotFound { id: String },

    #[error("Group not found: {id}")]
    GroupNotFound { id: String },

    #[error("Read-only data source: {operation}")]
    ReadOnly { operation: String },
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::Source { .. } => ErrorCode::SourceError,
            CoreError::UserNotFound { .. } => ErrorCode::UserNotFound,
            CoreError::SemesterNotFound { .. } => ErrorCode::SemesterNotFound,
            CoreError::GroupNotFound { .. } => ErrorCode::GroupNotFound,
            CoreError::ReadOnly { .. } => ErrorCode::ReadOnly,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Unauthorized => ErrorSeverity::Warning,
            CoreError::Validation { .. } => ErrorSeverity::Info,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Warning,
            CoreError::Source { .. } => ErrorSeverity::Error,
            CoreError::UserNotFound { .. } => ErrorSeverity::Info,
            CoreError::SemesterNotFound { .. } => ErrorSeverity::Info,
            CoreError::GroupNotFound { .. } => ErrorSeverity::Info,
            CoreError::ReadOnly { .. } => ErrorSeverity::Warning,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Unauthorized => {
                details = details.with_suggestion(
                    "Set a fresh token in api.token of the config file.".to_string(),
                );
            }
            CoreError::Validation { errors } => {
                details = details.with_detail(serde_json::json!({ "fields": errors }));
            }
            CoreError::Source { .. } => {
                details = details.with_suggestion(
                    "Check that api.base_url points at a running payments API.".to_string(),
                );
            }
            CoreError::UserNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/users endpoint to list all users.".to_string(),
                );
            }
            CoreError::SemesterNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/semesters endpoint to list all semesters.".to_string(),
                );
            }
            CoreError::ReadOnly { .. } => {
                details = details.with_suggestion(
                    "Switch data.source to http to make changes.".to_string(),
                );
            }
            _ => {}
        }

        details
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Unauthorized)
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<FetchError> for CoreError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Unauthorized => CoreError::Unauthorized,
            FetchError::ReadOnly { operation } => CoreError::ReadOnly { operation },
            other => CoreError::Source {
                message: other.to_string(),
            },
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "tuitionweb::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
            ErrorSeverity::Error => log::error!(
                target: "tuitionweb::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error.to_details(),
                context.operation
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::Unauthorized.to_string(), "UNAUTHORIZED");
        assert_eq!(ErrorCode::SemesterNotFound.to_string(), "SEMESTER_NOT_FOUND");
        assert_eq!(
            serde_json::to_value(ErrorCode::ValidationError).unwrap(),
            serde_json::json!("VALIDATION_ERROR")
        );
    }

    #[test]
    fn test_from_fetch_error() {
        assert!(CoreError::from(FetchError::Unauthorized).is_unauthorized());

        let err = CoreError::from(FetchError::ReadOnly { operation: "delete_user".to_string() });
        assert_eq!(err.code(), ErrorCode::ReadOnly);

        let err = CoreError::from(FetchError::Status { path: "/users/all".to_string(), status: 500 });
        assert_eq!(err.code(), ErrorCode::SourceError);
        assert!(err.to_string().contains("/users/all"));
    }

    #[test]
    fn test_validation_details_list_fields() {
        let err = CoreError::Validation {
            errors: vec![
                FieldError::new("phone", "Phone must have 11 digits"),
                FieldError::new("password", "Password is too short"),
            ],
        };
        assert_eq!(err.to_string(), "Validation failed for phone, password");
        assert_eq!(err.severity(), ErrorSeverity::Info);

        let details = err.to_details();
        assert_eq!(details.details.unwrap()["fields"][1]["field"], "password");
    }

    #[test]
    fn test_error_details_suggestions() {
        let details = CoreError::SemesterNotFound { id: "s9".to_string() }.to_details();
        assert_eq!(details.code, ErrorCode::SemesterNotFound);
        assert!(details.message.contains("s9"));
        assert!(!details.suggestions.is_empty());
    }
}
