//! Simulation observer trait for progress reporting and data collection.

use fleet_core::{SimClock, SimEvent};

use crate::SimReport;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: event printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_event(&mut self, event: &SimEvent) {
///         println!("{event}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every event as it is appended to the log.
    fn on_event(&mut self, _event: &SimEvent) {}

    /// Called after each outer iteration (delivery sweep plus at most one
    /// reload).
    fn on_iteration_end(&mut self, _iteration: usize, _clock: &SimClock) {}

    /// Called once with the final report.
    fn on_sim_end(&mut self, _report: &SimReport) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
