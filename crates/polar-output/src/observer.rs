//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use polar_agent::Population;
use polar_sim::SimObserver;
use polar_stats::{SimulationResult, StepRecord};

use crate::row::{HistogramRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every [`StepRecord`] to an [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].  Once a write has failed, later steps
/// are not written.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    histograms: bool,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer writing summaries and histograms to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, histograms: true, last_error: None }
    }

    /// Skip histogram rows (summaries only).
    pub fn without_histograms(mut self) -> Self {
        self.histograms = false;
        self
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &StepRecord) -> OutputResult<()> {
        self.writer.write_step_summary(&StepSummaryRow::from(record))?;
        if self.histograms {
            self.writer.write_histogram(&HistogramRow::from_record(record))?;
        }
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::error!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, record: &StepRecord, _population: &Population) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.write_record(record);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _result: &SimulationResult) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
