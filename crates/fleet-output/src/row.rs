//! Plain data row types written by output backends.

use fleet_sim::LiveFrame;
use fleet_stats::AgentReport;

/// One agent's continuous position at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub x:        f64,
    pub y:        f64,
    pub loaded:   bool,
}

/// Fleet-wide counters after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:      u64,
    pub delivered: u64,
    pub paused:    bool,
}

/// Final per-agent totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentReportRow {
    pub agent_id:        u32,
    pub pickups:         u64,
    pub deliveries:      u64,
    pub avg_cycle_ticks: f64,
    pub utilization:     f64,
}

impl PositionRow {
    /// All agent rows of one live frame.
    pub fn from_frame(frame: &LiveFrame) -> Vec<Self> {
        frame
            .agents
            .iter()
            .map(|a| PositionRow {
                tick:     frame.time.0,
                agent_id: a.agent_id.0,
                x:        a.x,
                y:        a.y,
                loaded:   a.loaded,
            })
            .collect()
    }
}

impl From<&LiveFrame> for TickSummaryRow {
    fn from(frame: &LiveFrame) -> Self {
        Self { tick: frame.time.0, delivered: frame.delivered, paused: frame.paused }
    }
}

impl From<&AgentReport> for AgentReportRow {
    fn from(r: &AgentReport) -> Self {
        Self {
            agent_id:        r.agent.0,
            pickups:         r.pickups,
            deliveries:      r.deliveries,
            avg_cycle_ticks: r.avg_cycle_ticks,
            utilization:     r.utilization,
        }
    }
}
