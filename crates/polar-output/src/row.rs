//! Plain data row types written by output backends.

use polar_stats::StepRecord;

/// Summary statistics and interaction counts for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:      u64,
    pub mean:      f64,
    pub stddev:    f64,
    pub variance:  f64,
    pub idle:      u64,
    pub attracted: u64,
    pub repelled:  u64,
}

impl From<&StepRecord> for StepSummaryRow {
    fn from(record: &StepRecord) -> Self {
        Self {
            step:      record.step.0,
            mean:      record.mean(),
            stddev:    record.stddev(),
            variance:  record.variance(),
            idle:      record.interactions.idle,
            attracted: record.interactions.attracted,
            repelled:  record.interactions.repelled,
        }
    }
}

/// One histogram bin at one step.  Bin `b` covers `[lower, upper)`, except
/// the last, which also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramRow {
    pub step:  u64,
    pub bin:   u32,
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

impl HistogramRow {
    /// Expand a record into its [`BIN_COUNT`][polar_stats::BIN_COUNT] histogram rows.
    pub fn from_record(record: &StepRecord) -> Vec<HistogramRow> {
        let edges = record.histogram_bin_edges();
        record
            .histogram_counts()
            .iter()
            .enumerate()
            .map(|(b, &count)| HistogramRow {
                step:  record.step.0,
                bin:   b as u32,
                lower: edges[b],
                upper: edges[b + 1],
                count,
            })
            .collect()
    }
}
