//! Preset warehouse layouts.
//!
//! Both maps put the dropoff dock along row 0 and leave the bottom row free
//! as a staging area where AGVs start.

use fleet_core::SimSettings;

use crate::error::{GridError, GridResult};
use crate::world::GridWorld;

/// Compact 9×7 floor: three rack columns, six pickup shelves.
pub const WAREHOUSE_9X7: &str = "\
DDDDDDD
.......
.#P#P#P
.#.#.#.
.......
.#P#P#P
.#.#.#.
.......
.......
";

/// 12×15 floor with irregular rack blocks and five pickup shelves.
pub const WAREHOUSE_12X15: &str = "\
DDDDDDDDDDDDDDD
...............
.###.#.#...###.
.##P.#......P#.
...............
.#.#P.##.#.###.
...##.##...###.
...............
...#.#P###.###.
.#...#.###..P#.
...............
...............
";

pub fn warehouse_9x7() -> GridResult<GridWorld> {
    GridWorld::parse(WAREHOUSE_9X7)
}

pub fn warehouse_12x15() -> GridResult<GridWorld> {
    GridWorld::parse(WAREHOUSE_12X15)
}

/// Look up a preset by name.
pub fn by_name(name: &str) -> GridResult<GridWorld> {
    match name {
        "warehouse_9x7" => warehouse_9x7(),
        "warehouse_12x15" => warehouse_12x15(),
        other => Err(GridError::UnknownLayout(other.to_string())),
    }
}

/// The map a run is configured with: the inline text map if given, else the
/// named preset.
pub fn from_settings(settings: &SimSettings) -> GridResult<GridWorld> {
    match &settings.map {
        Some(text) => GridWorld::parse(text),
        None => by_name(&settings.layout),
    }
}
