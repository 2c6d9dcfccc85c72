//! API request and response types

use crate::energy::BmrFormula;
use crate::errors::CalculationError;
use crate::pipeline::CalculationResult;
use crate::policy::{CalculatorPolicy, TABLE_VERSION};
use crate::profile::{ActivityLevel, BiologicalSex, BodyProfile, CalculationInputs, Objective};
use crate::validation::{ValidationError, MAX_AGE_YEARS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&CalculationError> for ErrorDetail {
    fn from(err: &CalculationError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message(),
            field: err.field().map(str::to_string),
            details: None,
        }
    }
}

// ============================================================================
// Calculation Types
// ============================================================================

/// Calculation request as submitted by a form or read from a patient record
///
/// Every field is optional on the wire so that a missing value can be
/// reported against its field instead of as a generic parse failure. Numeric
/// fields are kept as raw JSON for the same reason: `"abc"` or `30.5` years
/// become a validation error naming the field. Numeric strings such as
/// `"70.5"` are accepted, since HTML forms submit them that way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(default, alias = "weight")]
    pub weight_kg: Option<Value>,
    #[serde(default, alias = "height")]
    pub height_cm: Option<Value>,
    #[serde(default, alias = "age")]
    pub age_years: Option<Value>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub body_profile: Option<String>,
    #[serde(default, alias = "custom_target_calories")]
    pub custom_target_kcal: Option<Value>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

/// Read a JSON number, or a string holding one
fn number_field(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::new(field, "must be a valid number"))
}

fn age_field(value: &Value) -> Result<u32, ValidationError> {
    let age = number_field(value, "age_years")?;
    if age.fract() != 0.0 {
        return Err(ValidationError::new(
            "age_years",
            "must be a whole number of years",
        ));
    }
    if !(1.0..=f64::from(MAX_AGE_YEARS)).contains(&age) {
        return Err(ValidationError::new(
            "age_years",
            "must be between 1 and 120 years",
        ));
    }
    Ok(age as u32)
}

impl CalculationRequest {
    /// Convert into typed, range-checked inputs
    ///
    /// # Errors
    ///
    /// - validation error for a missing, non-numeric or out-of-range field
    /// - configuration error for an unrecognized enum value
    pub fn into_inputs(self) -> Result<CalculationInputs, CalculationError> {
        let weight_kg = number_field(&required(self.weight_kg, "weight_kg")?, "weight_kg")?;
        let height_cm = number_field(&required(self.height_cm, "height_cm")?, "height_cm")?;
        let age_years = age_field(&required(self.age_years, "age_years")?)?;

        let sex: BiologicalSex = required(self.sex, "sex")?.parse()?;
        let activity_level: ActivityLevel =
            required(self.activity_level, "activity_level")?.parse()?;
        let objective: Objective = required(self.objective, "objective")?.parse()?;
        let body_profile: BodyProfile = required(self.body_profile, "body_profile")?.parse()?;

        let custom_target_kcal = self
            .custom_target_kcal
            .as_ref()
            .map(|v| number_field(v, "custom_target_kcal"))
            .transpose()?;

        let inputs = CalculationInputs {
            weight_kg,
            height_cm,
            age_years,
            sex,
            activity_level,
            objective,
            body_profile,
            custom_target_kcal,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

/// Calculation result stamped for the caller's history store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub id: Uuid,
    pub calculated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: CalculationResult,
}

impl CalculationResponse {
    pub fn new(result: CalculationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            result,
        }
    }
}

/// One entry of a batch recomputation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCalculationItem {
    /// Caller's key for the item, echoed back (e.g. a patient id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub request: CalculationRequest,
}

/// Batch recomputation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCalculationRequest {
    pub items: Vec<BatchCalculationItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchItemStatus {
    Ok,
    Error,
}

/// Outcome of one batch entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub status: BatchItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl BatchItemOutcome {
    pub fn from_result(
        reference: Option<String>,
        outcome: Result<CalculationResult, CalculationError>,
    ) -> Self {
        match outcome {
            Ok(result) => Self {
                reference,
                status: BatchItemStatus::Ok,
                result: Some(CalculationResponse::new(result)),
                error: None,
            },
            Err(err) => Self {
                reference,
                status: BatchItemStatus::Error,
                result: None,
                error: Some(ErrorDetail::from(&err)),
            },
        }
    }
}

/// Batch recomputation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationResponse {
    pub results: Vec<BatchItemOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchCalculationResponse {
    pub fn new(results: Vec<BatchItemOutcome>) -> Self {
        let succeeded = results
            .iter()
            .filter(|r| r.status == BatchItemStatus::Ok)
            .count();
        let failed = results.len() - succeeded;
        Self {
            results,
            succeeded,
            failed,
        }
    }
}

// ============================================================================
// Policy Types
// ============================================================================

/// Activity factor table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorEntry {
    pub activity_level: ActivityLevel,
    pub factor: f64,
    pub description: String,
}

/// BMR equation table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaEntry {
    pub body_profile: BodyProfile,
    pub sex: BiologicalSex,
    pub formula: BmrFormula,
    pub description: String,
}

/// Active policy plus the fixed tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub table_version: u32,
    pub policy: CalculatorPolicy,
    pub activity_factors: Vec<ActivityFactorEntry>,
    pub formulas: Vec<FormulaEntry>,
}

impl PolicyResponse {
    pub fn new(policy: CalculatorPolicy) -> Self {
        let activity_factors = ActivityLevel::ALL
            .iter()
            .map(|level| ActivityFactorEntry {
                activity_level: *level,
                factor: level.factor(),
                description: level.description().to_string(),
            })
            .collect();

        let formulas = BodyProfile::ALL
            .iter()
            .flat_map(|profile| {
                BiologicalSex::ALL.iter().map(move |sex| {
                    let formula = BmrFormula::select(*profile, *sex);
                    FormulaEntry {
                        body_profile: *profile,
                        sex: *sex,
                        formula,
                        description: formula.description().to_string(),
                    }
                })
            })
            .collect();

        Self {
            table_version: TABLE_VERSION,
            policy,
            activity_factors,
            formulas,
        }
    }
}
