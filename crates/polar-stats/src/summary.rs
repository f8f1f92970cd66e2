//! Mean / spread summary of an opinion vector.

use crate::Histogram;

/// Aggregate statistics of one opinion vector.
///
/// Standard deviation and variance are population statistics (divide by N).
/// For opinions in [0, 1] the variance never exceeds 0.25, reached when the
/// population is split evenly between 0 and 1.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpinionStats {
    pub mean:      f64,
    pub stddev:    f64,
    pub variance:  f64,
    pub histogram: Histogram,
}

impl OpinionStats {
    /// Summarise `opinions`.  An empty slice yields all-zero statistics.
    pub fn compute(opinions: &[f64]) -> Self {
        if opinions.is_empty() {
            return Self::default();
        }
        let n = opinions.len() as f64;
        let mean = opinions.iter().sum::<f64>() / n;
        let variance = opinions.iter().map(|o| (o - mean) * (o - mean)).sum::<f64>() / n;
        Self {
            mean,
            stddev: variance.sqrt(),
            variance,
            histogram: Histogram::from_values(opinions),
        }
    }
}
