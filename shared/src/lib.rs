//! NutriPlan Shared Library
//!
//! The nutrition calculation pipeline (BMR → energy expenditure → target
//! intake → macro split) together with its types, policy tables and
//! validation. Used by the backend service and the WASM bindings so both
//! compute identical results.

pub mod energy;
pub mod errors;
pub mod health_metrics;
pub mod macros;
pub mod pipeline;
pub mod policy;
pub mod profile;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use energy::{compute_bmr, compute_get, compute_vet, BmrEstimate, BmrFormula, EnergyTarget};
pub use errors::*;
pub use health_metrics::{BmiCategory, BmiSummary};
pub use macros::{compute_macros, MacroAmount, MacroBreakdown, MacroDistribution};
pub use pipeline::{calculate, calculate_batch, calculate_with_policy, CalculationResult, DomainWarning};
pub use policy::{CalculatorPolicy, EnergyAdjustment, MacroRatio, MacroRatioTable, ObjectivePolicy};
pub use profile::{ActivityLevel, BiologicalSex, BodyProfile, CalculationInputs, Objective};
pub use validation::ValidationError;
