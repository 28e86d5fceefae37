//! `fleet-core` — foundational types for the AGV fleet simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and only small external ones (`rand`, `thiserror`,
//! and `serde` + `toml` for configuration loading).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `AgentId`                                             |
//! | [`cell`]     | `Cell`, `CellKind`, `Cargo`, `Position`               |
//! | [`time`]     | `Tick`, `SimClock`                                    |
//! | [`rng`]      | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`config`]   | `FleetConfig` and its TOML sections                   |
//! | [`error`]    | `FleetError`, `FleetResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, cells and ticks.    |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cargo, Cell, CellKind, Position};
pub use config::{AgentSettings, ControlSettings, FleetConfig, SimSettings};
pub use error::{FleetError, FleetResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
