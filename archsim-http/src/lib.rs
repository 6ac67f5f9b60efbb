//! Stateless JSON-over-HTTP surface for the simulation engine
//!
//! Three endpoints, no shared state:
//!
//! - `POST /api/simulation/run` — execute a simulation, return the result
//! - `POST /api/simulation/estimate-cost` — monthly cost estimate
//! - `GET /api/simulation/presets` — canned workload templates
//!
//! The wider web backend (auth, persistence, collaboration) lives
//! elsewhere; this router only fronts the engine.

pub mod error;
pub mod handlers;
pub mod presets;

use axum::routing::{get, post};
use axum::Router;

pub use error::ApiError;

/// Build the simulation API router.
pub fn router() -> Router {
    Router::new()
        .route("/api/simulation/run", post(handlers::run_simulation))
        .route(
            "/api/simulation/estimate-cost",
            post(handlers::estimate_cost),
        )
        .route("/api/simulation/presets", get(handlers::simulation_presets))
}
