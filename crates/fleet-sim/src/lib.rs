//! `fleet-sim` — the tick loop that drives an AGV fleet.
//!
//! # Tick loop
//!
//! ```text
//! for each tick:
//!   ① Housekeeping: expire handling blocks whose timer has run out; clear
//!                    congestion counts at each window boundary.
//!   ② Agents      : Agent::step for every agent in ascending AgentId order,
//!                    each seeing the reservations of the ones before it.
//!   ③ Events      : pickups, deliveries and cell entries go to the
//!                    StatsCollector; recovery events to RecoveryCounters.
//!   ④ Checks      : count agents sharing a rounded cell (always 0 unless a
//!                    policy is broken).
//!   ⑤ Clock       : advance, sample delivered history, auto-extend the
//!                    horizon on interactive runs.
//! ```
//!
//! # Snapshots
//!
//! [`Engine::snapshot`] captures a fully consistent state at a tick boundary,
//! RNG streams included; [`Engine::restore`] rebuilds an engine that evolves
//! exactly as the uninterrupted one would have.  Pause/resume and speed changes in
//! `fleet-control` are built on this pair.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | `Serialize` on `LiveFrame`, `AgentFrame` and counters.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::FleetConfig;
//! use fleet_sim::{EngineBuilder, NoopObserver};
//!
//! let mut engine = EngineBuilder::new(FleetConfig::default())
//!     .agent_count(4)
//!     .build()?;
//! let report = engine.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod frame;
pub mod observer;
pub mod snapshot;


pub use builder::{default_starts, EngineBuilder};
pub use engine::{Engine, RecoveryCounters};
pub use error::{SimError, SimResult};
pub use frame::{AgentFrame, LiveFrame};
pub use observer::{NoopObserver, SimObserver};
pub use snapshot::EngineSnapshot;
