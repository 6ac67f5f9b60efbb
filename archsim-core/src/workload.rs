//! Per-tick request-rate generation for the workload modes

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::Uniform;
use std::str::FromStr;

/// Traffic shape over the run. Unrecognized mode strings behave as constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkloadMode {
    #[default]
    Constant,
    Burst,
    Spike,
}

impl FromStr for WorkloadMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "burst" => WorkloadMode::Burst,
            "spike" => WorkloadMode::Spike,
            _ => WorkloadMode::Constant,
        })
    }
}

impl WorkloadMode {
    /// The request rate for one tick.
    ///
    /// Burst mode fires on every seventh tick and with probability 0.15
    /// otherwise, multiplying the base rate by U(1.5, 2.0). Spike mode
    /// triples the rate in the window `[D/2 - 2, D/2 + 5]`.
    pub fn rate_for_tick(
        &self,
        tick: u64,
        duration_seconds: u64,
        base_rps: f64,
        rng: &mut StdRng,
    ) -> f64 {
        match self {
            WorkloadMode::Constant => base_rps,
            WorkloadMode::Burst => {
                if tick % 7 == 0 || rng.gen::<f64>() < 0.15 {
                    base_rps * rng.sample(Uniform::new(1.5, 2.0))
                } else {
                    base_rps
                }
            }
            WorkloadMode::Spike => {
                let midpoint = duration_seconds / 2;
                if tick >= midpoint.saturating_sub(2) && tick <= midpoint + 5 {
                    base_rps * 3.0
                } else {
                    base_rps
                }
            }
        }
    }
}
