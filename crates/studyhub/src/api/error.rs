//! API error mapping
//!
//! Every failure is rendered as an envelope carrying only `errors`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use studyhub_api::envelope::{Envelope, Error};
use studyhub_core::CoreError;
use tracing::{debug, error};

/// Wrapper for API errors with status codes
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub errors: Vec<Error>,
}

impl AppError {
    fn single(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            errors: vec![
                Error::new(message)
                    .with_code(code)
                    .with_numeric_code(i64::from(status.as_u16())),
            ],
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::single(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::single(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::single(StatusCode::BAD_REQUEST, "parse_error", message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::single(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { resource, id } => {
                debug!(resource, id, "record not found");
                Self::not_found("Not found.")
            }
            CoreError::InvalidPage { page, reason } => {
                debug!(page, reason, "invalid page requested");
                Self::not_found("Invalid page.")
            }
            CoreError::Validation(fields) => Self {
                status: StatusCode::BAD_REQUEST,
                errors: fields
                    .into_iter()
                    .map(|field| {
                        Error::new(field.to_string())
                            .with_code("invalid")
                            .with_numeric_code(400)
                    })
                    .collect(),
            },
            CoreError::Database(_) | CoreError::Migration(_) => {
                error!(error = %err, "store operation failed");
                Self::internal("A server error occurred.")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::empty().with_errors(self.errors);
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use studyhub_core::FieldError;

    use super::*;

    #[test]
    fn test_invalid_page_is_not_found() {
        let err = AppError::from(CoreError::InvalidPage {
            page: "9".to_string(),
            reason: "That page contains no results",
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.errors[0].message.as_deref(), Some("Invalid page."));
        assert_eq!(err.errors[0].code.as_deref(), Some("not_found"));
        assert_eq!(err.errors[0].numeric_code, Some(404));
    }

    #[test]
    fn test_validation_yields_one_error_per_field() {
        let err = AppError::from(CoreError::Validation(vec![
            FieldError::new("title", "This field may not be blank."),
            FieldError::new("description", "This field may not be blank."),
        ]));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors.len(), 2);
        assert_eq!(
            err.errors[0].message.as_deref(),
            Some("title: This field may not be blank.")
        );
    }
}
