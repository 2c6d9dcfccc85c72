//! NutriPlan WASM Module
//!
//! WebAssembly bindings so the browser calculator runs the same pipeline
//! as the backend, without a round trip.

use nutriplan_shared::health_metrics;
use nutriplan_shared::types::{CalculationRequest, ErrorDetail};
use nutriplan_shared::{calculate, ActivityLevel, CalculationError};
use wasm_bindgen::prelude::*;

/// Run the full calculation for a JSON request
///
/// Accepts the same body as `POST /api/v1/calculations` and returns the
/// result as JSON. Failures throw a JSON string `{code, message, field}`.
#[wasm_bindgen]
pub fn calculate_nutrition(request_json: &str) -> Result<String, JsValue> {
    calculate_nutrition_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Activity multiplier for a level name such as `"moderate"`
#[wasm_bindgen]
pub fn activity_factor(level: &str) -> Result<f64, JsValue> {
    parse_activity_factor(level).map_err(|e| JsValue::from_str(&e))
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    health_metrics::calculate_bmi(weight_kg, height_cm)
}

fn calculate_nutrition_json(request_json: &str) -> Result<String, String> {
    let request: CalculationRequest = serde_json::from_str(request_json).map_err(|e| {
        error_json(ErrorDetail {
            code: "BAD_REQUEST".to_string(),
            message: e.to_string(),
            field: None,
            details: None,
        })
    })?;

    let result = request
        .into_inputs()
        .and_then(|inputs| calculate(&inputs))
        .map_err(|e| calculation_error_json(&e))?;

    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn parse_activity_factor(level: &str) -> Result<f64, String> {
    level
        .parse::<ActivityLevel>()
        .map(|level| level.factor())
        .map_err(|e| calculation_error_json(&e))
}

fn calculation_error_json(err: &CalculationError) -> String {
    error_json(ErrorDetail::from(err))
}

fn error_json(detail: ErrorDetail) -> String {
    serde_json::to_string(&detail).unwrap_or(detail.message)
}
