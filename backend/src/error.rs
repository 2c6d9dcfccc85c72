//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nutriplan_shared::types::{ErrorDetail, ErrorResponse};
use nutriplan_shared::{CalculationError, ValidationError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::Validation(v) => ApiError::Validation(v),
            CalculationError::Configuration(msg) => ApiError::Configuration(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                err.user_message(),
                Some(err.field.clone()),
            ),
            ApiError::Configuration(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONFIGURATION_ERROR",
                msg.clone(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details: None,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        ApiError::Validation(ValidationError::new("height_cm", "must be at most 250 cm")),
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        Some("height_cm")
    )]
    #[case::configuration(
        ApiError::Configuration("unknown sex 'x'".to_string()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "CONFIGURATION_ERROR",
        None
    )]
    #[case::not_found(ApiError::NotFound("Metrics are disabled".to_string()), StatusCode::NOT_FOUND, "NOT_FOUND", None)]
    #[case::bad_request(ApiError::BadRequest("empty batch".to_string()), StatusCode::BAD_REQUEST, "BAD_REQUEST", None)]
    #[case::internal(ApiError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)]
    #[tokio::test]
    async fn test_error_envelope(
        #[case] error: ApiError,
        #[case] status: StatusCode,
        #[case] code: &str,
        #[case] field: Option<&str>,
    ) {
        let response = error.into_response();
        assert_eq!(response.status(), status);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], code);
        assert_eq!(body["error"]["field"].as_str(), field);
    }

    #[test]
    fn test_configuration_error_status() {
        let error: ApiError = CalculationError::Configuration("unknown activity level".to_string()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_calculation_validation_maps_to_validation() {
        let error: ApiError =
            CalculationError::Validation(ValidationError::new("age_years", "must be at most 120 years")).into();
        assert!(matches!(error, ApiError::Validation(ref v) if v.field == "age_years"));
    }
}
