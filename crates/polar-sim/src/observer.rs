//! Simulation observer trait for progress reporting and data collection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use polar_agent::Population;
use polar_core::Step;
use polar_stats::{SimulationResult, StepRecord};

/// Callbacks invoked by [`Engine::run`][crate::Engine::run] at key points in
/// the step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, record: &StepRecord, _population: &Population) {
///         if record.step.0 % self.interval == 0 {
///             println!("{}: variance {:.4}", record.step, record.variance());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Polled before every step.  Returning `true` ends the run early; the
    /// steps recorded so far are kept.
    fn should_stop(&mut self, _next: Step) -> bool {
        false
    }

    /// Called at the very start of each step, before any agent updates.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after the step's record is appended.
    ///
    /// `population` is the post-step state, for writers that want per-agent
    /// detail beyond the aggregate record.
    fn on_step_end(&mut self, _record: &StepRecord, _population: &Population) {}

    /// Called once when the run finishes or is stopped.
    fn on_sim_end(&mut self, _result: &SimulationResult) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Stops the run once a shared flag is raised, e.g. from a UI thread or a
/// Ctrl-C handler.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.  Takes effect before the next step begins.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl SimObserver for CancelFlag {
    fn should_stop(&mut self, _next: Step) -> bool {
        self.is_cancelled()
    }
}

/// Fan out every callback to two observers, in order.  Either may stop the
/// run.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn should_stop(&mut self, next: Step) -> bool {
        self.0.should_stop(next) | self.1.should_stop(next)
    }

    fn on_step_start(&mut self, step: Step) {
        self.0.on_step_start(step);
        self.1.on_step_start(step);
    }

    fn on_step_end(&mut self, record: &StepRecord, population: &Population) {
        self.0.on_step_end(record, population);
        self.1.on_step_end(record, population);
    }

    fn on_sim_end(&mut self, result: &SimulationResult) {
        self.0.on_sim_end(result);
        self.1.on_sim_end(result);
    }
}
