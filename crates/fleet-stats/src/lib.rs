//! `fleet-stats` — what the fleet achieved.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`collector`] | `StatsCollector`, `AgentStats`, `TracePoint`             |
//! | [`report`]    | `Report`, `AgentReport`: one run's aggregate            |
//! | [`batch`]     | `BatchSummary`, `Spread`: mean / std over repetitions   |
//!
//! The collector is append-only and written by the engine alone, once per
//! agent per tick in ascending id order.  The delivered counter only ever
//! increases.

pub mod batch;
pub mod collector;
pub mod report;

#[cfg(test)]
mod tests;

pub use batch::{BatchSummary, Spread};
pub use collector::{AgentStats, StatsCollector, TracePoint};
pub use report::{AgentReport, Report};
