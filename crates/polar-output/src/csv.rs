//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `step_summaries.csv`
//! - `histograms.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{HistogramRow, OutputResult, StepSummaryRow};

pub const STEP_SUMMARIES_FILE: &str = "step_summaries.csv";
pub const HISTOGRAMS_FILE: &str = "histograms.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    summaries:  Writer<File>,
    histograms: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) both CSV files, and write
    /// the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join(STEP_SUMMARIES_FILE))?;
        summaries.write_record(["step", "mean", "stddev", "variance", "idle", "attracted", "repelled"])?;

        let mut histograms = Writer::from_path(dir.join(HISTOGRAMS_FILE))?;
        histograms.write_record(["step", "bin", "lower", "upper", "count"])?;

        tracing::debug!(dir = %dir.display(), "csv output opened");

        Ok(Self {
            summaries,
            histograms,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.mean.to_string(),
            row.stddev.to_string(),
            row.variance.to_string(),
            row.idle.to_string(),
            row.attracted.to_string(),
            row.repelled.to_string(),
        ])?;
        Ok(())
    }

    fn write_histogram(&mut self, rows: &[HistogramRow]) -> OutputResult<()> {
        for row in rows {
            self.histograms.write_record(&[
                row.step.to_string(),
                row.bin.to_string(),
                row.lower.to_string(),
                row.upper.to_string(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.histograms.flush()?;
        Ok(())
    }
}
