//! The `OutputWriter` trait implemented by backend writers.

use crate::{HistogramRow, OutputResult, StepSummaryRow};

/// Sink for per-step output rows.
///
/// Errors are stored by the observer and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write a batch of histogram rows.
    fn write_histogram(&mut self, rows: &[HistogramRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
