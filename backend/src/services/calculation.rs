//! Calculation service - runs the nutrition pipeline for API callers

use crate::error::ApiError;
use nutriplan_shared::types::{
    BatchCalculationRequest, BatchCalculationResponse, BatchItemOutcome, CalculationRequest,
    CalculationResponse,
};
use nutriplan_shared::{
    calculate_with_policy, CalculationError, CalculationInputs, CalculationResult,
    CalculatorPolicy,
};
use tracing::{debug, info};

/// Calculation service
pub struct CalculationService;

impl CalculationService {
    /// Run one calculation
    pub fn calculate(
        policy: &CalculatorPolicy,
        request: CalculationRequest,
    ) -> Result<CalculationResponse, ApiError> {
        let result = Self::run(policy, request)?;
        Ok(CalculationResponse::new(result))
    }

    /// Run a batch; per-item failures are reported inline, not as an error
    pub fn calculate_batch(
        policy: &CalculatorPolicy,
        request: BatchCalculationRequest,
        max_items: usize,
    ) -> Result<BatchCalculationResponse, ApiError> {
        if request.items.is_empty() {
            return Err(ApiError::BadRequest(
                "Batch must contain at least one item".to_string(),
            ));
        }
        if request.items.len() > max_items {
            return Err(ApiError::BadRequest(format!(
                "Batch contains {} items; the limit is {}",
                request.items.len(),
                max_items
            )));
        }

        let outcomes: Vec<BatchItemOutcome> = request
            .items
            .into_iter()
            .map(|item| {
                let outcome = Self::run(policy, item.request);
                BatchItemOutcome::from_result(item.reference, outcome)
            })
            .collect();

        let response = BatchCalculationResponse::new(outcomes);
        info!(
            succeeded = response.succeeded,
            failed = response.failed,
            "Batch calculation complete"
        );
        Ok(response)
    }

    fn run(
        policy: &CalculatorPolicy,
        request: CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        let inputs = request.into_inputs();
        let outcome = inputs
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|inputs| calculate_with_policy(inputs, policy));
        record_outcome(inputs.as_ref().ok(), &outcome);
        outcome
    }
}

/// Count the calculation and any warnings it carried
fn record_outcome(
    inputs: Option<&CalculationInputs>,
    outcome: &Result<CalculationResult, CalculationError>,
) {
    let (objective, body_profile) = inputs
        .map(|i| (i.objective.as_str(), i.body_profile.as_str()))
        .unwrap_or(("invalid", "invalid"));

    let label = match outcome {
        Ok(_) => "ok",
        Err(CalculationError::Validation(_)) => "validation_error",
        Err(CalculationError::Configuration(_)) => "configuration_error",
    };

    metrics::counter!(
        "nutrition_calculations_total",
        "objective" => objective,
        "body_profile" => body_profile,
        "outcome" => label
    )
    .increment(1);

    match outcome {
        Ok(result) => {
            for warning in &result.warnings {
                metrics::counter!("nutrition_calculation_warnings_total", "kind" => warning.kind())
                    .increment(1);
            }
        }
        Err(err) => {
            debug!(code = err.code(), field = ?err.field(), "Calculation rejected");
        }
    }
}
