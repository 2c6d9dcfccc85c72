//! Energy stages of the calculation pipeline
//!
//! BMR → total energy expenditure (GET) → target energy intake (VET).
//!
//! # Equations
//!
//! The BMR equation is chosen by body profile and sex, because a single
//! equation serves some populations poorly:
//!
//! | profile          | sex    | equation                                   |
//! |------------------|--------|--------------------------------------------|
//! | lean             | male   | 66 + 13.8·w + 5·h − 6.8·a (Harris-Benedict) |
//! | lean             | female | 655 + 9.6·w + 1.9·h − 4.7·a (Harris-Benedict) |
//! | overweight_obese | male   | 10·w + 6.25·h − 5·a + 5 (Mifflin-St Jeor)  |
//! | overweight_obese | female | 10·w + 6.25·h − 5·a − 161 (Mifflin-St Jeor) |
//! | athlete          | any    | 24.8·w + 10 (Tinsley)                       |
//!
//! w = weight (kg), h = height (cm), a = age (years).

use crate::errors::CalculationError;
use crate::policy::CalculatorPolicy;
use crate::profile::{ActivityLevel, BiologicalSex, BodyProfile, Objective};
use crate::validation::{validate_target_kcal, ValidationError};
use serde::{Deserialize, Serialize};

// ============================================================================
// BMR Stage
// ============================================================================

/// BMR equation applied to a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    HarrisBenedict,
    MifflinStJeor,
    /// Weight-based equation for resistance-trained athletes
    Tinsley,
}

impl BmrFormula {
    /// Equation selected for a (profile, sex) pair
    pub fn select(profile: BodyProfile, sex: BiologicalSex) -> Self {
        match (profile, sex) {
            (BodyProfile::Lean, _) => BmrFormula::HarrisBenedict,
            (BodyProfile::OverweightObese, _) => BmrFormula::MifflinStJeor,
            (BodyProfile::Athlete, _) => BmrFormula::Tinsley,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BmrFormula::HarrisBenedict => "Harris-Benedict",
            BmrFormula::MifflinStJeor => "Mifflin-St Jeor",
            BmrFormula::Tinsley => "Tinsley (weight-based)",
        }
    }
}

/// BMR value with the equation that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrEstimate {
    /// kcal/day
    pub value: f64,
    pub formula: BmrFormula,
}

/// Calculate basal metabolic rate for a body profile
pub fn compute_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: BiologicalSex,
    profile: BodyProfile,
) -> BmrEstimate {
    let age = f64::from(age_years);
    let value = match (profile, sex) {
        // Original 1919 Harris-Benedict constants, not the 1984 Roza-Shizgal revision
        (BodyProfile::Lean, BiologicalSex::Male) => {
            66.0 + 13.8 * weight_kg + 5.0 * height_cm - 6.8 * age
        }
        (BodyProfile::Lean, BiologicalSex::Female) => {
            655.0 + 9.6 * weight_kg + 1.9 * height_cm - 4.7 * age
        }
        (BodyProfile::OverweightObese, BiologicalSex::Male) => {
            10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + 5.0
        }
        (BodyProfile::OverweightObese, BiologicalSex::Female) => {
            10.0 * weight_kg + 6.25 * height_cm - 5.0 * age - 161.0
        }
        (BodyProfile::Athlete, _) => 24.8 * weight_kg + 10.0,
    };

    BmrEstimate {
        value,
        formula: BmrFormula::select(profile, sex),
    }
}

// ============================================================================
// Activity Stage
// ============================================================================

/// Total energy expenditure: BMR × activity factor
pub fn compute_get(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.factor()
}

// ============================================================================
// Objective Stage
// ============================================================================

/// Target energy intake after the objective adjustment and safety floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTarget {
    /// Value the objective asked for, before the floor
    pub requested_kcal: f64,
    /// Value to plan with (kcal/day)
    pub target_kcal: f64,
    /// True when `requested_kcal` was below the floor
    pub min_calories_applied: bool,
}

/// Apply the objective to total energy expenditure
///
/// The floor from `policy.min_target_kcal` applies to every objective,
/// including a custom target.
///
/// # Errors
///
/// Returns a validation error when the objective is custom and the target is
/// missing, non-finite, not positive or above the 20000 kcal ceiling.
pub fn compute_vet(
    get: f64,
    objective: Objective,
    custom_target_kcal: Option<f64>,
    policy: &CalculatorPolicy,
) -> Result<EnergyTarget, CalculationError> {
    let requested_kcal = match objective {
        Objective::Maintenance => get,
        Objective::WeightLoss => policy.objectives.weight_loss.apply(get),
        Objective::Hypertrophy => policy.objectives.hypertrophy.apply(get),
        Objective::Custom => {
            let target = custom_target_kcal.ok_or_else(|| {
                ValidationError::new(
                    "custom_target_kcal",
                    "is required when the objective is custom",
                )
            })?;
            validate_target_kcal(target)?;
            target
        }
    };

    let min_calories_applied = requested_kcal < policy.min_target_kcal;
    let target_kcal = if min_calories_applied {
        policy.min_target_kcal
    } else {
        requested_kcal
    };

    Ok(EnergyTarget {
        requested_kcal,
        target_kcal,
        min_calories_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EnergyAdjustment;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_bmr_lean_male_spot_value() {
        // 80kg, 180cm, 30y -> 66 + 1104 + 900 - 204
        let bmr = compute_bmr(80.0, 180.0, 30, BiologicalSex::Male, BodyProfile::Lean);
        assert_eq!(bmr.formula, BmrFormula::HarrisBenedict);
        assert!((bmr.value - 1866.0).abs() < 1e-9);
        // ~1855 is what the 1984 revision (88.362 + 13.397w + 4.799h - 5.677a)
        // gives; the original 1919 constants used here land about 12 kcal higher
        assert!((bmr.value - 1855.0).abs() < 15.0);
    }

    #[test]
    fn test_bmr_overweight_female_spot_value() {
        let bmr = compute_bmr(80.0, 160.0, 35, BiologicalSex::Female, BodyProfile::OverweightObese);
        assert_eq!(bmr.formula, BmrFormula::MifflinStJeor);
        assert!((bmr.value - 1464.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_athlete_ignores_sex() {
        let male = compute_bmr(75.0, 180.0, 25, BiologicalSex::Male, BodyProfile::Athlete);
        let female = compute_bmr(75.0, 165.0, 40, BiologicalSex::Female, BodyProfile::Athlete);
        assert_eq!(male, female);
        assert!((male.value - 1870.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(BodyProfile::Lean, BiologicalSex::Male, BmrFormula::HarrisBenedict)]
    #[case(BodyProfile::Lean, BiologicalSex::Female, BmrFormula::HarrisBenedict)]
    #[case(BodyProfile::OverweightObese, BiologicalSex::Male, BmrFormula::MifflinStJeor)]
    #[case(BodyProfile::OverweightObese, BiologicalSex::Female, BmrFormula::MifflinStJeor)]
    #[case(BodyProfile::Athlete, BiologicalSex::Male, BmrFormula::Tinsley)]
    #[case(BodyProfile::Athlete, BiologicalSex::Female, BmrFormula::Tinsley)]
    fn test_formula_selection(
        #[case] profile: BodyProfile,
        #[case] sex: BiologicalSex,
        #[case] expected: BmrFormula,
    ) {
        for (weight, height, age) in [(50.0, 150.0, 20), (95.0, 190.0, 70)] {
            assert_eq!(compute_bmr(weight, height, age, sex, profile).formula, expected);
        }
    }

    #[test]
    fn test_get_is_bmr_times_factor() {
        assert!((compute_get(1700.0, ActivityLevel::Moderate) - 2635.0).abs() < 1e-9);
        assert!((compute_get(1000.0, ActivityLevel::Sedentary) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_vet_defaults() {
        let policy = CalculatorPolicy::default();
        let maintenance = compute_vet(2500.0, Objective::Maintenance, None, &policy).unwrap();
        assert_eq!(maintenance.target_kcal, 2500.0);
        assert!(!maintenance.min_calories_applied);

        let loss = compute_vet(2500.0, Objective::WeightLoss, None, &policy).unwrap();
        assert!((loss.target_kcal - 2125.0).abs() < 1e-9);

        let gain = compute_vet(2500.0, Objective::Hypertrophy, None, &policy).unwrap();
        assert!((gain.target_kcal - 2900.0).abs() < 1e-9);
    }

    #[test]
    fn test_vet_custom_target() {
        let policy = CalculatorPolicy::default();
        let custom = compute_vet(2500.0, Objective::Custom, Some(1800.0), &policy).unwrap();
        assert_eq!(custom.target_kcal, 1800.0);

        let missing = compute_vet(2500.0, Objective::Custom, None, &policy).unwrap_err();
        assert_eq!(missing.field(), Some("custom_target_kcal"));

        let negative = compute_vet(2500.0, Objective::Custom, Some(-1.0), &policy).unwrap_err();
        assert_eq!(negative.field(), Some("custom_target_kcal"));
    }

    #[test]
    fn test_vet_floor_applied() {
        let policy = CalculatorPolicy::default();
        let loss = compute_vet(1300.0, Objective::WeightLoss, None, &policy).unwrap();
        assert!((loss.requested_kcal - 1105.0).abs() < 1e-9);
        assert_eq!(loss.target_kcal, 1200.0);
        assert!(loss.min_calories_applied);

        let custom = compute_vet(2500.0, Objective::Custom, Some(900.0), &policy).unwrap();
        assert_eq!(custom.target_kcal, 1200.0);
        assert!(custom.min_calories_applied);
    }

    #[test]
    fn test_vet_percent_surplus_policy() {
        let mut policy = CalculatorPolicy::default();
        policy.objectives.hypertrophy = EnergyAdjustment::Percent(15.0);
        let gain = compute_vet(2000.0, Objective::Hypertrophy, None, &policy).unwrap();
        assert!((gain.target_kcal - 2300.0).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// More active never means less energy
        #[test]
        fn prop_activity_monotonic(bmr in 500.0f64..4000.0) {
            let gets: Vec<f64> = ActivityLevel::ALL.iter().map(|l| compute_get(bmr, *l)).collect();
            for pair in gets.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }

        /// weight_loss < maintenance < hypertrophy above the floor
        #[test]
        fn prop_objective_ordering(get in 1500.0f64..6000.0) {
            let policy = CalculatorPolicy::default();
            let loss = compute_vet(get, Objective::WeightLoss, None, &policy).unwrap().target_kcal;
            let keep = compute_vet(get, Objective::Maintenance, None, &policy).unwrap().target_kcal;
            let gain = compute_vet(get, Objective::Hypertrophy, None, &policy).unwrap().target_kcal;
            prop_assert!(loss < keep);
            prop_assert!(keep < gain);
        }

        /// The target never drops below the floor
        #[test]
        fn prop_floor_holds(get in 100.0f64..6000.0) {
            let policy = CalculatorPolicy::default();
            for objective in [Objective::Maintenance, Objective::WeightLoss, Objective::Hypertrophy] {
                let target = compute_vet(get, objective, None, &policy).unwrap();
                prop_assert!(target.target_kcal >= policy.min_target_kcal);
                prop_assert_eq!(target.min_calories_applied, target.requested_kcal < policy.min_target_kcal);
            }
        }
    }
}
