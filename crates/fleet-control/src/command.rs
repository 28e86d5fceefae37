//! Operator commands and their replies.

use fleet_core::Tick;
use fleet_stats::{BatchSummary, Report};

/// One request to the control surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Build a fresh interactive engine and start the timeline.
    Start { agent_count: usize, initial_duration: u64, speed_factor: f64 },
    /// Snapshot the run and halt the timeline.
    Pause,
    /// Rebuild the timeline from the pause snapshot.
    Resume,
    /// Change wall-clock seconds per tick.  Pauses and resumes a live run.
    SetSpeed(f64),
    /// Independent fixed-horizon repetitions; refused while a run is active.
    Analyze { agent_count: usize, duration: u64, repetitions: u32 },
    /// End the run, keeping its final snapshot.
    Stop,
}

/// Successful outcome of a [`Command`].
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Started { agents: usize, end: Tick },
    Paused { tick: Tick, delivered: u64 },
    Resumed { tick: Tick },
    SpeedSet { speed_factor: f64 },
    Analysis(BatchSummary),
    Stopped(Report),
}
