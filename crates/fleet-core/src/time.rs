//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is a monotonically increasing `Tick` counter.  One tick is
//! `tick_duration_secs` virtual seconds (default 1).  `SimClock` carries the
//! run horizon, the wall-clock pacing factor and the paused flag:
//!
//!   wall_time_per_tick = speed_factor seconds
//!
//! The horizon is soft for interactive sessions: whenever the current tick
//! reaches `end_tick - 1` it is pushed out by `extension_ticks`, so a live run
//! never ends on its own.  Batch runs disable auto-extension and stop at the
//! fixed horizon.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The run's timeline: current tick, soft horizon, pacing and pause state.
///
/// `SimClock` holds no heap data and is captured verbatim in snapshots.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current tick, advanced once per engine iteration.
    pub current_tick: Tick,
    /// Target end of the run (exclusive).
    pub end_tick: Tick,
    /// How many virtual seconds one tick represents.  Default: 1.
    pub tick_duration_secs: u32,
    /// Wall-clock seconds per virtual tick.  Always > 0.
    pub speed_factor: f64,
    /// Set while the timeline is halted by a pause.
    pub paused: bool,
    /// When `true` the horizon is pushed out instead of ending the run.
    pub auto_extend: bool,
    /// Amount added to `end_tick` on each extension.
    pub extension_ticks: u64,
}

impl SimClock {
    /// A clock at tick 0 with a fixed horizon (auto-extension off).
    pub fn new(tick_duration_secs: u32, duration_ticks: u64, speed_factor: f64) -> Self {
        Self {
            current_tick: Tick::ZERO,
            end_tick: Tick(duration_ticks),
            tick_duration_secs,
            speed_factor,
            paused: false,
            auto_extend: false,
            extension_ticks: 0,
        }
    }

    /// Enable horizon auto-extension by `extension_ticks` per extension.
    pub fn with_auto_extend(mut self, extension_ticks: u64) -> Self {
        self.auto_extend = extension_ticks > 0;
        self.extension_ticks = extension_ticks;
        self
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Push the horizon out when the current tick is about to reach it.
    ///
    /// Returns the new end tick if an extension happened.
    pub fn extend_if_needed(&mut self) -> Option<Tick> {
        if self.auto_extend && self.current_tick.0 + 1 >= self.end_tick.0 {
            self.end_tick = self.end_tick + self.extension_ticks;
            Some(self.end_tick)
        } else {
            None
        }
    }

    /// `true` once a fixed-horizon run has reached its end tick.
    #[inline]
    pub fn is_finished(&self) -> bool {
        !self.auto_extend && self.current_tick >= self.end_tick
    }

    /// Ticks elapsed since tick 0.
    #[inline]
    pub fn elapsed_ticks(&self) -> u64 {
        self.current_tick.0
    }

    /// Wall-clock pause between ticks for the current speed factor.
    pub fn wall_per_tick(&self) -> Duration {
        if self.speed_factor.is_finite() && self.speed_factor > 0.0 {
            Duration::from_secs_f64(self.speed_factor)
        } else {
            Duration::ZERO
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} (x{:.2}{})",
            self.current_tick,
            self.end_tick,
            self.speed_factor,
            if self.paused { ", paused" } else { "" }
        )
    }
}
