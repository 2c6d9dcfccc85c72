//! Business logic services
//!
//! Services sit between the HTTP handlers and the pure calculation engine.

pub mod calculation;

pub use calculation::CalculationService;
