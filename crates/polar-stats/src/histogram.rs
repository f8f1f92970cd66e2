//! Fixed-range opinion histogram.

/// Number of histogram bins.
pub const BIN_COUNT: usize = 25;

/// Width of one bin over [0, 1].
pub const BIN_WIDTH: f64 = 1.0 / BIN_COUNT as f64;

/// Bin counts over `BIN_COUNT` equal-width bins spanning [0, 1].
///
/// Bin `k` covers `[edges[k], edges[k + 1])`; the last bin is closed on the
/// right so an opinion of exactly 1.0 is counted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    pub counts: [u64; BIN_COUNT],
    pub edges:  [f64; BIN_COUNT + 1],
}

impl Default for Histogram {
    fn default() -> Self {
        Self { counts: [0; BIN_COUNT], edges: Self::bin_edges() }
    }
}

impl Histogram {
    /// The `BIN_COUNT + 1` evenly spaced edges `k / BIN_COUNT`.
    pub fn bin_edges() -> [f64; BIN_COUNT + 1] {
        std::array::from_fn(|k| k as f64 / BIN_COUNT as f64)
    }

    /// Count `values` into bins.  Values outside [0, 1] are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let mut hist = Self::default();
        for &v in values {
            if let Some(bin) = hist.bin_of(v) {
                hist.counts[bin] += 1;
            }
        }
        hist
    }

    /// Index of the bin containing `value`, or `None` outside [0, 1].
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        if !(0.0..=1.0).contains(&value) {
            return None;
        }
        let mut bin = ((value * BIN_COUNT as f64) as usize).min(BIN_COUNT - 1);
        // `value * 25` can round across an edge; settle against the stored
        // edges so bin membership agrees with `edges`.
        if value < self.edges[bin] {
            bin -= 1;
        } else if bin + 1 < BIN_COUNT && value >= self.edges[bin + 1] {
            bin += 1;
        }
        Some(bin)
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
