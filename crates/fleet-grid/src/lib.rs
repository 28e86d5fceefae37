//! `fleet-grid` — the static warehouse map and path finding over it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`world`]   | `GridWorld`, `GridWorldBuilder`, text-map parsing           |
//! | [`layouts`] | Preset warehouse maps and name lookup                       |
//! | [`path`]    | `Path` (ordered cells, both endpoints inclusive)             |
//! | [`finder`]  | `PathFinder` trait, `PathQuery`, `Occupancy`, A* finder     |
//! | [`error`]   | `GridError`, `GridResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Path`.                 |

pub mod error;
pub mod finder;
pub mod layouts;
pub mod path;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use finder::{AStarPathFinder, NoOccupancy, Occupancy, PathFinder, PathQuery, STEP_COST};
pub use path::Path;
pub use world::{GridWorld, GridWorldBuilder};
