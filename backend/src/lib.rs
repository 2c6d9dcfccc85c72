//! NutriPlan Backend Library
//!
//! HTTP surface for the nutrition calculation engine in `nutriplan-shared`.

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
