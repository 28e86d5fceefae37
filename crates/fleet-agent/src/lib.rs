//! `fleet-agent` — the AGV model and its per-tick state machine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`state`]   | `Phase`, `HandlingOp`, `Motion`                             |
//! | [`event`]   | `AgentEvent`, `StepOutcome`                                 |
//! | [`context`] | `StepContext<'a>`: shared world state lent to one step     |
//! | [`agent`]   | `Agent` and `Agent::step`                                   |
//!
//! # State machine
//!
//! ```text
//!            dispatch + path              arrive at target
//!  SEEKING ─────────────────▶ MOVING ─────────────────────▶ HANDLING
//!     ▲                         │                              │
//!     │   stuck / lost target   │        timer expires         │
//!     └─────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Steps never fail.  Recoverable conditions (no path, reservation timeout,
//! stuck reset, lost destination) come back as [`AgentEvent`]s and the agent
//! is left in a state from which it will retry on its own.
//!
//! An idle agent (SEEKING with no destination) also enters MOVING for a
//! single hop when it steps aside: off a dock it cannot use, out of a
//! blocked mover's way, or after a stuck reset.

pub mod agent;
pub mod context;
pub mod event;
pub mod state;


pub use agent::Agent;
pub use context::StepContext;
pub use event::{AgentEvent, StepOutcome};
pub use state::{HandlingOp, Motion, Phase};
