//! CSV export of the per-tick time series

use crate::error::MetricsError;
use crate::export::ResultExporter;
use archsim_core::SimulationOutput;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ResultExporter for CsvExporter {
    fn export(&self, output: &SimulationOutput) -> Result<(), MetricsError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "tick,incomingRPS,throughputRPS,p50,p95,p99,errorRatePercent,queueDepth,cacheHitRatio,dropRate,cpuUsagePercent,memoryUsagePercent"
        )?;

        for point in &output.time_series {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                point.tick,
                point.incoming_rps,
                point.throughput_rps,
                point.latency.p50,
                point.latency.p95,
                point.latency.p99,
                point.error_rate_percent,
                point.queue_depth,
                point.cache_hit_ratio,
                point.drop_rate,
                point.cpu_usage_percent,
                point.memory_usage_percent,
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}
