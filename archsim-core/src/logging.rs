//! Structured logging setup for simulation debugging
//!
//! Uses `tracing` with an environment-driven filter. `RUST_LOG` overrides
//! everything; without it the given level applies, with router internals
//! kept one notch more verbose since that is where simulations go wrong.
//!
//! ```bash
//! RUST_LOG=archsim_core=debug cargo run
//! RUST_LOG=archsim_core::router=trace cargo test
//! ```

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with sensible defaults (info level).
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info");
}

/// Initialize logging at a specific level: "trace", "debug", "info",
/// "warn" or "error".
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("archsim_core={level},archsim_core::router=debug").into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("simulation logging initialized at level: {}", level);
}
