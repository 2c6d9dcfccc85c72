//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! State is immutable after creation; every field is cheap to clone.

use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use nutriplan_shared::CalculatorPolicy;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Validated calculation policy
    pub policy: Arc<CalculatorPolicy>,
    /// Prometheus render handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// The calculator policy is copied out of the config so handlers do not
    /// reach through the whole configuration on every request.
    pub fn new(config: AppConfig) -> Self {
        let policy = config.calculator;
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
            metrics: None,
        }
    }

    /// Attach an installed Prometheus recorder
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the calculation policy
    #[inline]
    pub fn policy(&self) -> &CalculatorPolicy {
        &self.policy
    }
}
