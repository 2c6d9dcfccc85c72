//! Patient profile types consumed by the calculation pipeline
//!
//! All enums are closed sets. Parsing from strings is case-insensitive and
//! never falls back to a default: an unrecognized value is a
//! [`CalculationError::Configuration`].

use crate::errors::CalculationError;
use crate::validation::{
    validate_age_years, validate_height_cm, validate_target_kcal, validate_weight_kg,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase, trim, and fold `-`/space into `_`
fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(|c: char| c == '-' || c == ' ', "_")
}

fn unknown_value(kind: &str, value: &str, accepted: &[&str]) -> CalculationError {
    CalculationError::Configuration(format!(
        "unknown {} '{}'; expected one of: {}",
        kind,
        value,
        accepted.join(", ")
    ))
}

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    pub const ALL: [BiologicalSex; 2] = [BiologicalSex::Male, BiologicalSex::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            BiologicalSex::Male => "male",
            BiologicalSex::Female => "female",
        }
    }
}

/// Activity level for the total energy expenditure stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Intense,
    /// Very hard exercise or physical job
    Extreme,
}

impl ActivityLevel {
    /// Ordered from least to most active
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Intense,
        ActivityLevel::Extreme,
    ];

    /// Activity factor applied to BMR
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Intense => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Intense => "Hard exercise 6-7 days/week",
            ActivityLevel::Extreme => "Very hard exercise or physical job",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intense => "intense",
            ActivityLevel::Extreme => "extreme",
        }
    }
}

/// Nutritional objective driving the energy adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Maintenance,
    WeightLoss,
    Hypertrophy,
    /// Caller supplies the target energy intake directly
    Custom,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::Maintenance,
        Objective::WeightLoss,
        Objective::Hypertrophy,
        Objective::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Maintenance => "maintenance",
            Objective::WeightLoss => "weight_loss",
            Objective::Hypertrophy => "hypertrophy",
            Objective::Custom => "custom",
        }
    }
}

/// Body profile; selects the BMR equation and the macro ratio row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyProfile {
    Lean,
    OverweightObese,
    Athlete,
}

impl BodyProfile {
    pub const ALL: [BodyProfile; 3] = [
        BodyProfile::Lean,
        BodyProfile::OverweightObese,
        BodyProfile::Athlete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyProfile::Lean => "lean",
            BodyProfile::OverweightObese => "overweight_obese",
            BodyProfile::Athlete => "athlete",
        }
    }
}

macro_rules! impl_display_and_parse {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CalculationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = normalize(s);
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| {
                        let accepted: Vec<&str> = <$ty>::ALL.iter().map(|v| v.as_str()).collect();
                        unknown_value($kind, s, &accepted)
                    })
            }
        }
    };
}

impl_display_and_parse!(BiologicalSex, "sex");
impl_display_and_parse!(ActivityLevel, "activity level");
impl_display_and_parse!(Objective, "objective");
impl_display_and_parse!(BodyProfile, "body profile");

/// Typed, unit-explicit inputs of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInputs {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in whole years
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub activity_level: ActivityLevel,
    pub objective: Objective,
    pub body_profile: BodyProfile,
    /// Only read when `objective` is [`Objective::Custom`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_target_kcal: Option<f64>,
}

impl CalculationInputs {
    /// Range-check every numeric input
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first failing field.
    pub fn validate(&self) -> Result<(), CalculationError> {
        validate_weight_kg(self.weight_kg)?;
        validate_height_cm(self.height_cm)?;
        validate_age_years(self.age_years)?;
        if self.objective == Objective::Custom {
            let target = self.custom_target_kcal.ok_or_else(|| {
                ValidationError::new(
                    "custom_target_kcal",
                    "is required when the objective is custom",
                )
            })?;
            validate_target_kcal(target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn inputs() -> CalculationInputs {
        CalculationInputs {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: BiologicalSex::Male,
            activity_level: ActivityLevel::Moderate,
            objective: Objective::Maintenance,
            body_profile: BodyProfile::Lean,
            custom_target_kcal: None,
        }
    }

    #[rstest]
    #[case("sedentary", ActivityLevel::Sedentary)]
    #[case("LIGHT", ActivityLevel::Light)]
    #[case(" Moderate ", ActivityLevel::Moderate)]
    #[case("intense", ActivityLevel::Intense)]
    #[case("extreme", ActivityLevel::Extreme)]
    fn test_parse_activity_level(#[case] raw: &str, #[case] expected: ActivityLevel) {
        assert_eq!(raw.parse::<ActivityLevel>().unwrap(), expected);
    }

    #[rstest]
    #[case("weight_loss", Objective::WeightLoss)]
    #[case("weight-loss", Objective::WeightLoss)]
    #[case("Weight Loss", Objective::WeightLoss)]
    #[case("hypertrophy", Objective::Hypertrophy)]
    fn test_parse_objective(#[case] raw: &str, #[case] expected: Objective) {
        assert_eq!(raw.parse::<Objective>().unwrap(), expected);
    }

    #[test]
    fn test_parse_body_profile() {
        assert_eq!("overweight_obese".parse::<BodyProfile>().unwrap(), BodyProfile::OverweightObese);
        assert_eq!("Athlete".parse::<BodyProfile>().unwrap(), BodyProfile::Athlete);
    }

    #[test]
    fn test_unknown_activity_level_is_configuration_error() {
        let err = "unknown".parse::<ActivityLevel>().unwrap_err();
        match err {
            CalculationError::Configuration(msg) => {
                assert!(msg.contains("'unknown'"));
                assert!(msg.contains("sedentary, light, moderate, intense, extreme"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_sex_never_defaults() {
        assert!("other".parse::<BiologicalSex>().is_err());
        assert!("".parse::<BiologicalSex>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.to_string().parse::<ActivityLevel>().unwrap(), level);
        }
        for profile in BodyProfile::ALL {
            assert_eq!(profile.to_string().parse::<BodyProfile>().unwrap(), profile);
        }
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&BodyProfile::OverweightObese).unwrap();
        assert_eq!(json, "\"overweight_obese\"");
        let json = serde_json::to_string(&Objective::WeightLoss).unwrap();
        assert_eq!(json, "\"weight_loss\"");
    }

    #[test]
    fn test_activity_factors_increase() {
        let factors: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.factor()).collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_inputs_validate() {
        assert!(inputs().validate().is_ok());

        let mut bad = inputs();
        bad.age_years = 200;
        let err = bad.validate().unwrap_err();
        assert_eq!(err.field(), Some("age_years"));
    }

    #[test]
    fn test_custom_objective_requires_target() {
        let mut custom = inputs();
        custom.objective = Objective::Custom;
        assert_eq!(custom.validate().unwrap_err().field(), Some("custom_target_kcal"));

        custom.custom_target_kcal = Some(0.0);
        assert_eq!(custom.validate().unwrap_err().field(), Some("custom_target_kcal"));

        custom.custom_target_kcal = Some(1800.0);
        assert!(custom.validate().is_ok());
    }

    #[test]
    fn test_custom_target_ignored_for_other_objectives() {
        let mut with_target = inputs();
        with_target.custom_target_kcal = Some(-5.0);
        assert!(with_target.validate().is_ok());
    }
}
