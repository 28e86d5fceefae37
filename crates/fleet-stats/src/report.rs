use fleet_core::AgentId;

/// Aggregate statistics for one run, as of the tick it was taken.
///
/// The cycle, wait and travel averages weight every agent equally: each is
/// the mean of the per-agent means, and an agent that has not completed a
/// cycle counts as 0.  A fleet with idle members therefore reports lower
/// averages than the pooled per-cycle figure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub elapsed_ticks:        u64,
    pub agent_count:          usize,
    pub delivered:            u64,
    pub throughput_per_hour:  f64,
    pub deliveries_per_agent: f64,
    pub avg_cycle_ticks:      f64,
    pub avg_wait_ticks:       f64,
    pub avg_travel_ticks:     f64,
    /// Mean over agents of busy ticks / elapsed ticks.
    pub utilization:          f64,
    pub per_agent:            Vec<AgentReport>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentReport {
    pub agent:           AgentId,
    pub pickups:         u64,
    pub deliveries:      u64,
    pub avg_cycle_ticks: f64,
    pub utilization:     f64,
}
