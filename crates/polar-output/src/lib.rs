//! `polar-output` — simulation output writers for the polarsim framework.
//!
//! | Backend | Files created                                 |
//! |---------|-----------------------------------------------|
//! | CSV     | `step_summaries.csv`, `histograms.csv`        |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `polar_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use polar_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! engine.run(&mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{HistogramRow, StepSummaryRow};
pub use writer::OutputWriter;
