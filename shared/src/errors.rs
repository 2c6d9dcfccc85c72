//! Error types for the nutrition calculation pipeline

use crate::validation::ValidationError;
use thiserror::Error;

/// Hard failures of a calculation
///
/// A calculation either returns a complete result or one of these; it never
/// returns a partially populated result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// User-correctable input problem (missing or out-of-range field)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unrecognized enum value or unusable policy table; a caller/data bug
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CalculationError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            CalculationError::Validation(_) => "VALIDATION_ERROR",
            CalculationError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Field that failed validation, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CalculationError::Validation(err) => Some(&err.field),
            CalculationError::Configuration(_) => None,
        }
    }

    /// Message without the error-kind prefix
    pub fn message(&self) -> String {
        match self {
            CalculationError::Validation(err) => err.user_message(),
            CalculationError::Configuration(msg) => msg.clone(),
        }
    }
}
