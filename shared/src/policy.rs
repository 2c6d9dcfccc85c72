//! Calculation policy tables
//!
//! Every tunable number of the pipeline lives here as a named table: the
//! objective adjustments, the per-profile macro ratios and the calorie
//! safety floor. The defaults are versioned by [`TABLE_VERSION`]; deployments
//! may override them through configuration, in which case
//! [`CalculatorPolicy::validate`] must pass before the policy is used.
//!
//! The activity factors and BMR equations are fixed and not part of the
//! policy; see [`ActivityLevel::factor`](crate::profile::ActivityLevel::factor)
//! and [`compute_bmr`](crate::energy::compute_bmr).

use crate::errors::CalculationError;
use crate::profile::BodyProfile;
use crate::validation::MAX_TARGET_KCAL;
use serde::{Deserialize, Serialize};

/// Version of the default tables below
pub const TABLE_VERSION: u32 = 1;

/// Energy density of protein (kcal/g)
pub const KCAL_PER_GRAM_PROTEIN: u32 = 4;
/// Energy density of fat (kcal/g)
pub const KCAL_PER_GRAM_FAT: u32 = 9;
/// Energy density of carbohydrate (kcal/g)
pub const KCAL_PER_GRAM_CARBS: u32 = 4;

/// Default minimum target energy intake (kcal/day)
pub const DEFAULT_MIN_TARGET_KCAL: f64 = 1200.0;

/// Largest accepted protein or fat ratio (g per kg of body weight)
pub const MAX_MACRO_G_PER_KG: f64 = 10.0;

/// How an objective moves total energy expenditure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum EnergyAdjustment {
    /// Relative change, e.g. `-15.0` multiplies by 0.85
    Percent(f64),
    /// Absolute change in kcal/day
    OffsetKcal(f64),
}

impl EnergyAdjustment {
    pub fn apply(&self, kcal: f64) -> f64 {
        match self {
            EnergyAdjustment::Percent(pct) => kcal * (1.0 + pct / 100.0),
            EnergyAdjustment::OffsetKcal(offset) => kcal + offset,
        }
    }

    fn amount(&self) -> f64 {
        match self {
            EnergyAdjustment::Percent(v) | EnergyAdjustment::OffsetKcal(v) => *v,
        }
    }
}

/// Energy adjustments per objective
///
/// Maintenance is always the identity and custom always uses the caller's
/// target, so only the two moving objectives are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectivePolicy {
    pub weight_loss: EnergyAdjustment,
    pub hypertrophy: EnergyAdjustment,
}

impl Default for ObjectivePolicy {
    fn default() -> Self {
        Self {
            weight_loss: EnergyAdjustment::Percent(-15.0),
            hypertrophy: EnergyAdjustment::OffsetKcal(400.0),
        }
    }
}

/// Protein and fat per kilogram of body weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatio {
    pub protein_g_per_kg: f64,
    pub fat_g_per_kg: f64,
}

/// One [`MacroRatio`] row per body profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatioTable {
    pub lean: MacroRatio,
    pub overweight_obese: MacroRatio,
    pub athlete: MacroRatio,
}

impl MacroRatioTable {
    pub fn for_profile(&self, profile: BodyProfile) -> MacroRatio {
        match profile {
            BodyProfile::Lean => self.lean,
            BodyProfile::OverweightObese => self.overweight_obese,
            BodyProfile::Athlete => self.athlete,
        }
    }
}

impl Default for MacroRatioTable {
    fn default() -> Self {
        Self {
            lean: MacroRatio {
                protein_g_per_kg: 1.8,
                fat_g_per_kg: 1.0,
            },
            overweight_obese: MacroRatio {
                protein_g_per_kg: 1.5,
                fat_g_per_kg: 0.8,
            },
            athlete: MacroRatio {
                protein_g_per_kg: 2.0,
                fat_g_per_kg: 1.0,
            },
        }
    }
}

/// Complete policy for one deployment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorPolicy {
    #[serde(default)]
    pub objectives: ObjectivePolicy,
    #[serde(default)]
    pub macro_ratios: MacroRatioTable,
    /// Safety floor for the target energy intake (kcal/day)
    #[serde(default = "default_min_target_kcal")]
    pub min_target_kcal: f64,
}

fn default_min_target_kcal() -> f64 {
    DEFAULT_MIN_TARGET_KCAL
}

impl Default for CalculatorPolicy {
    fn default() -> Self {
        Self {
            objectives: ObjectivePolicy::default(),
            macro_ratios: MacroRatioTable::default(),
            min_target_kcal: DEFAULT_MIN_TARGET_KCAL,
        }
    }
}

impl CalculatorPolicy {
    /// Reject tables that would break the pipeline's ordering and
    /// positivity guarantees
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Configuration`] describing the first bad entry.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !self.min_target_kcal.is_finite()
            || self.min_target_kcal <= 0.0
            || self.min_target_kcal > MAX_TARGET_KCAL
        {
            return Err(CalculationError::Configuration(format!(
                "min_target_kcal must be a positive number no greater than {}",
                MAX_TARGET_KCAL
            )));
        }

        let loss = self.objectives.weight_loss;
        if !loss.amount().is_finite() || loss.amount() >= 0.0 {
            return Err(CalculationError::Configuration(
                "weight_loss adjustment must be negative".to_string(),
            ));
        }
        if let EnergyAdjustment::Percent(pct) = loss {
            if pct <= -100.0 {
                return Err(CalculationError::Configuration(
                    "weight_loss percent must be greater than -100".to_string(),
                ));
            }
        }

        let gain = self.objectives.hypertrophy;
        if !gain.amount().is_finite() || gain.amount() <= 0.0 {
            return Err(CalculationError::Configuration(
                "hypertrophy adjustment must be positive".to_string(),
            ));
        }

        for profile in BodyProfile::ALL {
            let ratio = self.macro_ratios.for_profile(profile);
            for (name, value) in [
                ("protein_g_per_kg", ratio.protein_g_per_kg),
                ("fat_g_per_kg", ratio.fat_g_per_kg),
            ] {
                if !value.is_finite() || !(0.0..=MAX_MACRO_G_PER_KG).contains(&value) {
                    return Err(CalculationError::Configuration(format!(
                        "macro ratio {} for profile {} must be between 0 and {} g/kg",
                        name, profile, MAX_MACRO_G_PER_KG
                    )));
                }
            }
        }

        Ok(())
    }
}
