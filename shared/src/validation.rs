//! Input validation functions
//!
//! Range checks for the anthropometric inputs of a calculation. Every check
//! reports the failing field so a form can highlight it. Values are never
//! clamped: an out-of-range input is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound (inclusive) for body weight in kilograms
pub const MAX_WEIGHT_KG: f64 = 300.0;

/// Upper bound (inclusive) for height in centimeters
pub const MAX_HEIGHT_CM: f64 = 250.0;

/// Upper bound (inclusive) for age in years
pub const MAX_AGE_YEARS: u32 = 120;

/// Upper bound (inclusive) for a caller-supplied daily calorie target
pub const MAX_TARGET_KCAL: f64 = 20_000.0;

/// Validate weight value (in kg), range (0, 300]
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), ValidationError> {
    if !weight_kg.is_finite() {
        return Err(ValidationError::new("weight_kg", "must be a valid number"));
    }
    if weight_kg <= 0.0 {
        return Err(ValidationError::new("weight_kg", "must be greater than 0 kg"));
    }
    if weight_kg > MAX_WEIGHT_KG {
        return Err(ValidationError::new("weight_kg", "must be at most 300 kg"));
    }
    Ok(())
}

/// Validate height value (in cm), range (0, 250]
pub fn validate_height_cm(height_cm: f64) -> Result<(), ValidationError> {
    if !height_cm.is_finite() {
        return Err(ValidationError::new("height_cm", "must be a valid number"));
    }
    if height_cm <= 0.0 {
        return Err(ValidationError::new("height_cm", "must be greater than 0 cm"));
    }
    if height_cm > MAX_HEIGHT_CM {
        return Err(ValidationError::new("height_cm", "must be at most 250 cm"));
    }
    Ok(())
}

/// Validate age in whole years, range (0, 120]
pub fn validate_age_years(age_years: u32) -> Result<(), ValidationError> {
    if age_years == 0 {
        return Err(ValidationError::new("age_years", "must be at least 1 year"));
    }
    if age_years > MAX_AGE_YEARS {
        return Err(ValidationError::new("age_years", "must be at most 120 years"));
    }
    Ok(())
}

/// Validate a caller-supplied calorie target (custom objective)
pub fn validate_target_kcal(target_kcal: f64) -> Result<(), ValidationError> {
    if !target_kcal.is_finite() {
        return Err(ValidationError::new("custom_target_kcal", "must be a valid number"));
    }
    if target_kcal <= 0.0 {
        return Err(ValidationError::new(
            "custom_target_kcal",
            "must be greater than 0 kcal",
        ));
    }
    if target_kcal > MAX_TARGET_KCAL {
        return Err(ValidationError::new(
            "custom_target_kcal",
            "must be at most 20000 kcal",
        ));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight_kg" | "weight" => "Weight",
        "height_cm" | "height" => "Height",
        "age_years" | "age" => "Age",
        "sex" => "Sex",
        "activity_level" => "Activity Level",
        "objective" => "Objective",
        "body_profile" => "Body Profile",
        "custom_target_kcal" => "Target Calories",
        "anthropometrics" => "Anthropometric Data",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Error for a required field that was not supplied
    pub fn missing(field: &str) -> Self {
        Self::new(field, "is required")
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
