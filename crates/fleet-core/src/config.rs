//! Run configuration loaded from TOML.
//!
//! Every section and field is optional in the file; anything omitted falls
//! back to the `Default` impl below.
//!
//! ```toml
//! [sim]
//! layout = "warehouse_9x7"
//! seed = 7
//!
//! [agent]
//! handling_ticks = 10
//!
//! [control]
//! speed_factor = 0.05
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

/// Top-level configuration: one struct per TOML table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub sim: SimSettings,
    pub agent: AgentSettings,
    pub control: ControlSettings,
}

impl FleetConfig {
    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FleetResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> FleetResult<Self> {
        let config: FleetConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> FleetResult<()> {
        let bad = |msg: &str| Err(FleetError::Config(msg.to_string()));
        if self.sim.tick_duration_secs == 0 {
            return bad("sim.tick_duration_secs must be > 0");
        }
        if self.sim.initial_duration_ticks == 0 {
            return bad("sim.initial_duration_ticks must be > 0");
        }
        if self.sim.report_interval_ticks == 0 {
            return bad("sim.report_interval_ticks must be > 0");
        }
        if !(self.agent.cells_per_tick > 0.0 && self.agent.cells_per_tick <= 1.0) {
            return bad("agent.cells_per_tick must be in (0, 1]");
        }
        if self.agent.substeps == 0 {
            return bad("agent.substeps must be > 0");
        }
        if self.agent.handling_ticks == 0 {
            return bad("agent.handling_ticks must be > 0");
        }
        if self.agent.reservation_retry_limit == 0 || self.agent.stuck_limit == 0 {
            return bad("agent retry and stuck limits must be > 0");
        }
        if !(self.control.speed_factor.is_finite() && self.control.speed_factor > 0.0) {
            return bad("control.speed_factor must be a positive number");
        }
        if self.control.analysis_repetitions == 0 {
            return bad("control.analysis_repetitions must be > 0");
        }
        Ok(())
    }
}

// ── [sim] ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Preset layout name (`warehouse_9x7`, `warehouse_12x15`).
    pub layout: String,
    /// Inline text map; overrides `layout` when present.
    pub map: Option<String>,
    /// Virtual seconds per tick.
    pub tick_duration_secs: u32,
    /// Horizon of a fresh interactive run.
    pub initial_duration_ticks: u64,
    /// Horizon extension applied when an interactive run nears its end.
    pub extension_ticks: u64,
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
    /// Delivered-history sampling interval.
    pub report_interval_ticks: u64,
    /// Pickups before this tick are excluded from cycle-time statistics.
    pub warmup_ticks: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            layout: "warehouse_9x7".to_string(),
            map: None,
            tick_duration_secs: 1,
            initial_duration_ticks: 3_000,
            extension_ticks: 3_000,
            seed: 42,
            report_interval_ticks: 3_000,
            warmup_ticks: 30,
        }
    }
}

// ── [agent] ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Travel speed; at most one cell per tick.
    pub cells_per_tick: f64,
    /// Interpolation increments per tick.
    pub substeps: u32,
    /// Duration of a pick or a drop.
    pub handling_ticks: u64,
    /// Upper bound of the idle jitter drawn after each handling operation.
    pub cooldown_max_ticks: u64,
    /// Upper bound of the delay before retrying a failed seek.
    pub retry_delay_ticks: u64,
    /// Consecutive next-cell reservation failures before a forced re-route.
    pub reservation_retry_limit: u32,
    /// Ticks without displacement before a stuck reset.
    pub stuck_limit: u32,
    /// Maximum recorded location-trace entries per agent.
    pub trace_capacity: usize,
    /// Extra path cost per recent visit to a cell (one step costs 10).
    pub congestion_weight: u32,
    /// Visit counts are cleared every this many ticks.
    pub congestion_window_ticks: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            cells_per_tick: 1.0,
            substeps: 4,
            handling_ticks: 10,
            cooldown_max_ticks: 1,
            retry_delay_ticks: 1,
            reservation_retry_limit: 5,
            stuck_limit: 20,
            trace_capacity: 1_024,
            congestion_weight: 1,
            congestion_window_ticks: 100,
        }
    }
}

// ── [control] ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Wall-clock seconds per virtual tick.
    pub speed_factor: f64,
    /// Telemetry push period, independent of the speed factor.
    pub telemetry_interval_ms: u64,
    /// Default repetitions for a batch analysis.
    pub analysis_repetitions: u32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            telemetry_interval_ms: 100,
            analysis_repetitions: 15,
        }
    }
}
