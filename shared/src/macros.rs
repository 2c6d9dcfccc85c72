//! Macro distribution stage
//!
//! Protein and fat scale with body weight and are allocated first; carbohydrate
//! receives whatever energy remains. Grams are rounded to whole numbers and
//! every kcal figure is derived from the rounded grams, so that the displayed
//! grams × kcal-per-gram always equals the displayed kcal.

use crate::policy::{
    MacroRatioTable, KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use crate::profile::BodyProfile;
use serde::{Deserialize, Serialize};

/// One macronutrient's share of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroAmount {
    pub grams: u32,
    pub kcal: u32,
    /// Share of the target energy intake, rounded to a whole percent
    pub percent: u32,
}

/// Daily macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein: MacroAmount,
    pub fat: MacroAmount,
    pub carbs: MacroAmount,
}

impl MacroBreakdown {
    /// Sum of the three macro energies (kcal)
    pub fn total_kcal(&self) -> u32 {
        self.protein
            .kcal
            .saturating_add(self.fat.kcal)
            .saturating_add(self.carbs.kcal)
    }

    /// Sum of the three rounded percentages
    pub fn total_percent(&self) -> u32 {
        self.protein
            .percent
            .saturating_add(self.fat.percent)
            .saturating_add(self.carbs.percent)
    }
}

/// Macro split plus the energy protein and fat overshot the target by
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroDistribution {
    pub macros: MacroBreakdown,
    /// Set when protein + fat alone exceed the target; carbs are then 0 g
    pub carbohydrate_shortfall_kcal: Option<f64>,
}

/// Negative and NaN grams become 0; `as` saturates at `u32::MAX`
fn round_grams(grams: f64) -> u32 {
    grams.max(0.0).round() as u32
}

fn percent_of(kcal: u32, target_kcal: f64) -> u32 {
    if target_kcal <= 0.0 {
        return 0;
    }
    (f64::from(kcal) / target_kcal * 100.0).round() as u32
}

/// Split the target energy intake into protein, fat and carbohydrate
pub fn compute_macros(
    target_kcal: f64,
    weight_kg: f64,
    profile: BodyProfile,
    ratios: &MacroRatioTable,
) -> MacroDistribution {
    let ratio = ratios.for_profile(profile);

    let protein_grams = round_grams(weight_kg * ratio.protein_g_per_kg);
    let fat_grams = round_grams(weight_kg * ratio.fat_g_per_kg);
    let protein_kcal = protein_grams.saturating_mul(KCAL_PER_GRAM_PROTEIN);
    let fat_kcal = fat_grams.saturating_mul(KCAL_PER_GRAM_FAT);

    let remaining_kcal = target_kcal - f64::from(protein_kcal) - f64::from(fat_kcal);
    let carbohydrate_shortfall_kcal = (remaining_kcal < 0.0).then(|| -remaining_kcal);

    let carbs_grams = round_grams(remaining_kcal / f64::from(KCAL_PER_GRAM_CARBS));
    let carbs_kcal = carbs_grams.saturating_mul(KCAL_PER_GRAM_CARBS);

    MacroDistribution {
        macros: MacroBreakdown {
            protein: MacroAmount {
                grams: protein_grams,
                kcal: protein_kcal,
                percent: percent_of(protein_kcal, target_kcal),
            },
            fat: MacroAmount {
                grams: fat_grams,
                kcal: fat_kcal,
                percent: percent_of(fat_kcal, target_kcal),
            },
            carbs: MacroAmount {
                grams: carbs_grams,
                kcal: carbs_kcal,
                percent: percent_of(carbs_kcal, target_kcal),
            },
        },
        carbohydrate_shortfall_kcal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MacroRatio;
    use proptest::prelude::*;

    #[test]
    fn test_lean_split() {
        let dist = compute_macros(2500.0, 70.0, BodyProfile::Lean, &MacroRatioTable::default());
        let m = dist.macros;
        assert_eq!(m.protein.grams, 126);
        assert_eq!(m.protein.kcal, 504);
        assert_eq!(m.fat.grams, 70);
        assert_eq!(m.fat.kcal, 630);
        // (2500 - 1134) / 4 = 341.5 -> 342
        assert_eq!(m.carbs.grams, 342);
        assert_eq!(m.carbs.kcal, 1368);
        assert_eq!(dist.carbohydrate_shortfall_kcal, None);
    }

    #[test]
    fn test_kcal_derived_from_rounded_grams() {
        // 72.3 kg * 1.5 = 108.45 g -> 108 g -> 432 kcal, not 433.8
        let dist = compute_macros(
            2200.0,
            72.3,
            BodyProfile::OverweightObese,
            &MacroRatioTable::default(),
        );
        assert_eq!(dist.macros.protein.grams, 108);
        assert_eq!(dist.macros.protein.kcal, 432);
        assert_eq!(dist.macros.fat.kcal, dist.macros.fat.grams * 9);
        assert_eq!(dist.macros.carbs.kcal, dist.macros.carbs.grams * 4);
    }

    #[test]
    fn test_negative_carbs_reported_not_negative() {
        let heavy = MacroRatioTable {
            lean: MacroRatio {
                protein_g_per_kg: 4.0,
                fat_g_per_kg: 3.0,
            },
            ..MacroRatioTable::default()
        };
        // protein 400 g = 1600 kcal, fat 300 g = 2700 kcal, target 1500
        let dist = compute_macros(1500.0, 100.0, BodyProfile::Lean, &heavy);
        assert_eq!(dist.macros.carbs.grams, 0);
        assert_eq!(dist.macros.carbs.kcal, 0);
        let shortfall = dist.carbohydrate_shortfall_kcal.unwrap();
        assert!((shortfall - 2800.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_fit_has_no_shortfall() {
        let ratios = MacroRatioTable {
            athlete: MacroRatio {
                protein_g_per_kg: 2.5,
                fat_g_per_kg: 1.0,
            },
            ..MacroRatioTable::default()
        };
        // 250 g protein = 1000 kcal, 100 g fat = 900 kcal, target 1900
        let dist = compute_macros(1900.0, 100.0, BodyProfile::Athlete, &ratios);
        assert_eq!(dist.carbohydrate_shortfall_kcal, None);
        assert_eq!(dist.macros.carbs.grams, 0);
    }

    #[test]
    fn test_huge_target_saturates_instead_of_overflowing() {
        let dist = compute_macros(2.0e10, 70.0, BodyProfile::Lean, &MacroRatioTable::default());
        assert_eq!(dist.macros.carbs.grams, u32::MAX);
        assert_eq!(dist.macros.carbs.kcal, u32::MAX);
        assert_eq!(dist.macros.total_kcal(), u32::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Rounded kcal reconcile with the target and percents sum to ~100
        #[test]
        fn prop_reconciliation(
            target in 1200.0f64..6000.0,
            weight in 35.0f64..120.0,
            profile_idx in 0usize..3,
        ) {
            let profile = BodyProfile::ALL[profile_idx];
            let dist = compute_macros(target, weight, profile, &MacroRatioTable::default());
            prop_assume!(dist.carbohydrate_shortfall_kcal.is_none());

            let m = dist.macros;
            let total = f64::from(m.protein.grams * 4 + m.fat.grams * 9 + m.carbs.grams * 4);
            prop_assert!((total - target).abs() <= 2.0, "total {} vs target {}", total, target);
            prop_assert!((99..=101).contains(&m.total_percent()), "percent sum {}", m.total_percent());
        }
    }
}
