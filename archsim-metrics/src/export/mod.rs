//! Export of simulation results to files

mod csv;
mod json;

pub use csv::CsvExporter;
pub use json::JsonExporter;

use crate::error::MetricsError;
use archsim_core::SimulationOutput;
use std::path::Path;

/// A sink for finished simulation results.
pub trait ResultExporter {
    fn export(&self, output: &SimulationOutput) -> Result<(), MetricsError>;
}

/// Write the full result document as JSON.
pub fn export_json(
    output: &SimulationOutput,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), MetricsError> {
    JsonExporter::new(path.as_ref(), pretty).export(output)
}

/// Write the time series as CSV.
pub fn export_csv(output: &SimulationOutput, path: impl AsRef<Path>) -> Result<(), MetricsError> {
    CsvExporter::new(path.as_ref()).export(output)
}
