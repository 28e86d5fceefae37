//! `fleet-control` — the operator-facing control surface.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`command`]    | `Command` (tagged request) and `Response`                  |
//! | [`controller`] | `Controller`: Idle / Running / Paused state machine       |
//! | [`analyze`]    | batch repetitions with derived seeds → `BatchSummary`      |
//! | [`runner`]     | `Runner`: driver + telemetry threads, `TelemetrySink`     |
//! | [`error`]      | `ControlError`, `ControlResult`                            |
//!
//! Pause takes a full engine snapshot at a tick boundary and drops the live
//! engine; resume rebuilds one from the snapshot.  Virtual time, agents and
//! RNG streams survive, so a paused-and-resumed run is indistinguishable from
//! one never paused.  A speed change is a pause and resume with a new factor.
//!
//! # Cargo features
//!
//! | Feature    | Default | Effect                                         |
//! |------------|---------|------------------------------------------------|
//! | `parallel` | on      | Batch repetitions run on Rayon's thread pool.  |

pub mod analyze;
pub mod command;
pub mod controller;
pub mod error;
pub mod runner;


pub use analyze::{repetition_seeds, run_batch};
pub use command::{Command, Response};
pub use controller::Controller;
pub use error::{ControlError, ControlResult};
pub use runner::{Runner, TelemetryFrame, TelemetrySink};
