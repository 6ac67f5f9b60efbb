//! JSON export for simulation results
//!
//! Writes the complete result document in the same wire format the HTTP
//! layer serves, suitable for archival and visualization tools.

use crate::error::MetricsError;
use crate::export::ResultExporter;
use archsim_core::SimulationOutput;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }
}

impl ResultExporter for JsonExporter {
    fn export(&self, output: &SimulationOutput) -> Result<(), MetricsError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(output)
        } else {
            serde_json::to_string(output)
        }?;

        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
