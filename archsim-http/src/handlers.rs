//! Request handlers for the simulation endpoints

use crate::error::ApiError;
use crate::presets;
use archsim_core::{CostEstimate, Engine, SimulationInput, SimulationOutput};
use axum::Json;
use serde_json::Value;
use tracing::info;

fn validate(input: &SimulationInput, require_workload: bool) -> Result<(), ApiError> {
    if input.nodes.is_empty() {
        return Err(ApiError::BadRequest("No nodes provided".to_string()));
    }
    if require_workload && input.workload.rps <= 0 {
        return Err(ApiError::BadRequest(
            "RPS must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// `POST /api/simulation/run`
pub async fn run_simulation(
    Json(mut input): Json<SimulationInput>,
) -> Result<Json<SimulationOutput>, ApiError> {
    validate(&input, true)?;
    input.normalize();

    info!(
        nodes = input.nodes.len(),
        rps = input.workload.rps,
        duration = input.workload.duration_seconds,
        "starting simulation run"
    );
    let output = Engine::new(input)
        .run()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(output))
}

/// `POST /api/simulation/estimate-cost`
///
/// Monthly cost estimate over initialized state, before any simulation.
pub async fn estimate_cost(
    Json(mut input): Json<SimulationInput>,
) -> Result<Json<CostEstimate>, ApiError> {
    validate(&input, false)?;
    input.normalize();

    let estimate = Engine::new(input)
        .estimate_costs()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(estimate))
}

/// `GET /api/simulation/presets`
pub async fn simulation_presets() -> Json<Value> {
    Json(presets::all())
}
