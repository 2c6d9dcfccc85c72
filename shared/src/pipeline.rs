//! Nutrition calculation pipeline
//!
//! Composes the stages into one synchronous, stateless call:
//!
//! 1. validate every input (no partial results past this point)
//! 2. BMR from the (profile, sex) equation table
//! 3. total energy expenditure from the activity factor
//! 4. target energy intake from the objective policy and safety floor
//! 5. macro split from the per-profile ratio table
//!
//! Domain problems that do not invalidate the numbers are attached to the
//! result as [`DomainWarning`]s instead of failing the call.

use crate::energy::{compute_bmr, compute_get, compute_vet, BmrFormula};
use crate::errors::CalculationError;
use crate::health_metrics::{bmi_summary, BmiSummary};
use crate::macros::{compute_macros, MacroBreakdown};
use crate::policy::CalculatorPolicy;
use crate::profile::CalculationInputs;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Non-fatal annotation on a result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainWarning {
    /// The objective asked for less than the floor; the floor was used
    MinCaloriesApplied { requested_kcal: f64, floor_kcal: f64 },
    /// Protein and fat alone exceed the target; carbs were set to 0 g
    NegativeCarbohydrates { shortfall_kcal: f64 },
}

impl DomainWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainWarning::MinCaloriesApplied { .. } => "min_calories_applied",
            DomainWarning::NegativeCarbohydrates { .. } => "negative_carbohydrates",
        }
    }
}

/// Output of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,
    pub formula_used: BmrFormula,
    pub activity_factor: f64,
    /// GET / TDEE (kcal/day)
    pub total_energy_expenditure: f64,
    /// Objective-adjusted intake before the safety floor (kcal/day)
    pub requested_energy_intake: f64,
    /// VET (kcal/day)
    pub target_energy_intake: f64,
    pub min_calories_applied: bool,
    pub macros: MacroBreakdown,
    pub bmi: BmiSummary,
    #[serde(default)]
    pub warnings: Vec<DomainWarning>,
}

impl CalculationResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// False when the macro split cannot meet the target; downstream
    /// consumers such as meal-plan generation should refuse such a result
    pub fn is_nutritionally_consistent(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, DomainWarning::NegativeCarbohydrates { .. }))
    }
}

/// Run the pipeline with the default policy tables
///
/// # Errors
///
/// See [`calculate_with_policy`].
pub fn calculate(inputs: &CalculationInputs) -> Result<CalculationResult, CalculationError> {
    calculate_with_policy(inputs, &CalculatorPolicy::default())
}

/// Run the pipeline with an explicit policy
///
/// # Errors
///
/// - [`CalculationError::Validation`] when an input is out of range, a custom
///   target is missing, or the inputs yield a non-positive BMR
/// - [`CalculationError::Configuration`] when the policy tables are unusable
pub fn calculate_with_policy(
    inputs: &CalculationInputs,
    policy: &CalculatorPolicy,
) -> Result<CalculationResult, CalculationError> {
    policy.validate()?;
    inputs.validate()?;

    let bmr = compute_bmr(
        inputs.weight_kg,
        inputs.height_cm,
        inputs.age_years,
        inputs.sex,
        inputs.body_profile,
    );
    if bmr.value.is_nan() || bmr.value <= 0.0 {
        return Err(ValidationError::new(
            "anthropometrics",
            "weight, height and age produce a non-positive metabolic rate",
        )
        .into());
    }

    let activity_factor = inputs.activity_level.factor();
    let get = compute_get(bmr.value, inputs.activity_level);
    let energy = compute_vet(get, inputs.objective, inputs.custom_target_kcal, policy)?;
    let distribution = compute_macros(
        energy.target_kcal,
        inputs.weight_kg,
        inputs.body_profile,
        &policy.macro_ratios,
    );

    let mut warnings = Vec::new();
    if energy.min_calories_applied {
        warn!(
            requested_kcal = energy.requested_kcal,
            floor_kcal = policy.min_target_kcal,
            "Target energy intake raised to safety floor"
        );
        warnings.push(DomainWarning::MinCaloriesApplied {
            requested_kcal: energy.requested_kcal,
            floor_kcal: policy.min_target_kcal,
        });
    }
    if let Some(shortfall_kcal) = distribution.carbohydrate_shortfall_kcal {
        warn!(
            shortfall_kcal,
            target_kcal = energy.target_kcal,
            body_profile = %inputs.body_profile,
            "Protein and fat exceed target energy intake"
        );
        warnings.push(DomainWarning::NegativeCarbohydrates { shortfall_kcal });
    }

    debug!(
        bmr = bmr.value,
        formula = ?bmr.formula,
        get,
        vet = energy.target_kcal,
        objective = %inputs.objective,
        "Nutrition calculation complete"
    );

    Ok(CalculationResult {
        bmr: bmr.value,
        formula_used: bmr.formula,
        activity_factor,
        total_energy_expenditure: get,
        requested_energy_intake: energy.requested_kcal,
        target_energy_intake: energy.target_kcal,
        min_calories_applied: energy.min_calories_applied,
        macros: distribution.macros,
        bmi: bmi_summary(inputs.weight_kg, inputs.height_cm),
        warnings,
    })
}

/// Recompute many patients at once; one failing item never aborts the rest
pub fn calculate_batch<'a, I>(
    inputs: I,
    policy: &CalculatorPolicy,
) -> Vec<Result<CalculationResult, CalculationError>>
where
    I: IntoIterator<Item = &'a CalculationInputs>,
{
    inputs
        .into_iter()
        .map(|item| calculate_with_policy(item, policy))
        .collect()
}
