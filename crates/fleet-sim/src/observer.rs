//! Simulation observer trait for progress reporting and data collection.

use fleet_core::Tick;
use fleet_stats::Report;

use crate::LiveFrame;

/// Callbacks invoked by [`Engine::run`][crate::Engine::run] and
/// [`Engine::run_ticks`][crate::Engine::run_ticks].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, frame: &LiveFrame) {
///         if frame.time.0 % self.every == 0 {
///             println!("{}: {} delivered", frame.time, frame.delivered);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every tick with the fleet's state at the new time.
    fn on_tick_end(&mut self, _frame: &LiveFrame) {}

    /// Called when an interactive run pushes its horizon out to `end`.
    fn on_horizon_extended(&mut self, _end: Tick) {}

    /// Called once when `run` reaches its horizon.
    fn on_sim_end(&mut self, _final_tick: Tick, _report: &Report) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
