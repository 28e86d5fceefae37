//! The `StatsCollector`.

use std::collections::VecDeque;

use fleet_core::{AgentId, Cell, Tick};

use crate::report::{AgentReport, Report};

/// One location-trace entry, recorded whenever an AGV enters a new cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TracePoint {
    pub tick: Tick,
    pub cell: Cell,
}

/// Per-agent counters and histories.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentStats {
    pub pickups:      u64,
    pub deliveries:   u64,
    /// Pickup-to-drop durations, warm-up pickups excluded.
    pub cycle_times:  Vec<u64>,
    /// Non-moving, non-handling ticks per delivery cycle.
    pub wait_times:   Vec<u64>,
    /// Moving ticks per delivery cycle.
    pub travel_times: Vec<u64>,
    /// Ticks spent moving or handling.
    pub busy_ticks:   u64,
    /// Most recent cell entries, oldest first.
    pub trace:        VecDeque<TracePoint>,
}

/// Run-wide statistics, indexed by `AgentId`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsCollector {
    agents:         Vec<AgentStats>,
    delivered:      u64,
    /// `(tick, delivered)` checkpoints every `interval` ticks.
    history:        Vec<(Tick, u64)>,
    interval:       u64,
    trace_capacity: usize,
}

impl StatsCollector {
    pub fn new(agent_count: usize, report_interval_ticks: u64, trace_capacity: usize) -> Self {
        Self {
            agents: vec![AgentStats::default(); agent_count],
            delivered: 0,
            history: Vec::new(),
            interval: report_interval_ticks.max(1),
            trace_capacity,
        }
    }

    // ── Recording ─────────────────────────────────────────────────────────

    pub fn record_pickup(&mut self, agent: AgentId) {
        if let Some(s) = self.agents.get_mut(agent.index()) {
            s.pickups += 1;
        }
    }

    pub fn record_delivery(&mut self, agent: AgentId, cycle: Option<u64>, wait: u64, travel: u64) {
        let Some(s) = self.agents.get_mut(agent.index()) else { return };
        s.deliveries += 1;
        if let Some(c) = cycle {
            s.cycle_times.push(c);
        }
        s.wait_times.push(wait);
        s.travel_times.push(travel);
        self.delivered += 1;
    }

    pub fn record_activity(&mut self, agent: AgentId, busy: bool) {
        if !busy {
            return;
        }
        if let Some(s) = self.agents.get_mut(agent.index()) {
            s.busy_ticks += 1;
        }
    }

    pub fn record_position(&mut self, agent: AgentId, tick: Tick, cell: Cell) {
        if self.trace_capacity == 0 {
            return;
        }
        let Some(s) = self.agents.get_mut(agent.index()) else { return };
        if s.trace.len() == self.trace_capacity {
            s.trace.pop_front();
        }
        s.trace.push_back(TracePoint { tick, cell });
    }

    /// Record a delivered-history checkpoint if `now` falls on the interval.
    /// Returns `true` when a checkpoint was taken.
    pub fn sample(&mut self, now: Tick) -> bool {
        if now.0 == 0 || now.0 % self.interval != 0 {
            return false;
        }
        if self.history.last().is_some_and(|&(t, _)| t == now) {
            return false;
        }
        self.history.push((now, self.delivered));
        true
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn history(&self) -> &[(Tick, u64)] {
        &self.history
    }

    pub fn agent(&self, agent: AgentId) -> Option<&AgentStats> {
        self.agents.get(agent.index())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Aggregate report over `elapsed_ticks` of `tick_duration_secs` each.
    pub fn report(&self, elapsed_ticks: u64, tick_duration_secs: u32) -> Report {
        let elapsed_secs = elapsed_ticks as f64 * tick_duration_secs as f64;
        let n = self.agents.len();

        let per_agent: Vec<AgentReport> = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, s)| AgentReport {
                agent:           AgentId(i as u32),
                pickups:         s.pickups,
                deliveries:      s.deliveries,
                avg_cycle_ticks: mean_u64(&s.cycle_times),
                utilization:     ratio(s.busy_ticks as f64, elapsed_ticks as f64),
            })
            .collect();

        Report {
            elapsed_ticks,
            agent_count: n,
            delivered: self.delivered,
            throughput_per_hour: ratio(self.delivered as f64 * 3_600.0, elapsed_secs),
            deliveries_per_agent: ratio(self.delivered as f64, n as f64),
            avg_cycle_ticks: self.mean_of_means(|s| s.cycle_times.as_slice()),
            avg_wait_ticks: self.mean_of_means(|s| s.wait_times.as_slice()),
            avg_travel_ticks: self.mean_of_means(|s| s.travel_times.as_slice()),
            utilization: ratio(
                per_agent.iter().map(|a| a.utilization).sum::<f64>(),
                n as f64,
            ),
            per_agent,
        }
    }

    /// Mean over all agents of each agent's own mean.  An agent with no
    /// samples contributes 0.
    fn mean_of_means(&self, pick: impl Fn(&AgentStats) -> &[u64]) -> f64 {
        let total: f64 = self.agents.iter().map(|s| mean_u64(pick(s))).sum();
        ratio(total, self.agents.len() as f64)
    }
}

/// `num / den`, or 0 when `den` is 0.
#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

fn mean_u64(xs: &[u64]) -> f64 {
    ratio(xs.iter().sum::<u64>() as f64, xs.len() as f64)
}
