//! Per-tick live view of the fleet, for observers and telemetry.

use fleet_agent::Agent;
use fleet_core::{AgentId, SimClock, Tick};

/// One agent's continuous position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentFrame {
    pub agent_id: AgentId,
    /// Row coordinate, interpolated between cells while moving.
    pub x:        f64,
    /// Column coordinate.
    pub y:        f64,
    pub loaded:   bool,
}

/// Everything an external consumer sees at one instant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LiveFrame {
    /// Virtual time: ticks elapsed since the run began.
    pub time:      Tick,
    pub agents:    Vec<AgentFrame>,
    pub delivered: u64,
    pub paused:    bool,
}

impl LiveFrame {
    /// Frame for `agents` at the clock's current tick.
    pub fn capture(clock: &SimClock, agents: &[Agent], delivered: u64) -> Self {
        Self {
            time: clock.current_tick,
            agents: agents
                .iter()
                .map(|a| AgentFrame {
                    agent_id: a.id,
                    x:        a.pos.x,
                    y:        a.pos.y,
                    loaded:   a.cargo.is_loaded(),
                })
                .collect(),
            delivered,
            paused: clock.paused,
        }
    }
}
