//! `fleet-dispatch` — who goes where.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`request`]    | `DispatchRequest<'a>`: what an idle AGV asks for      |
//! | [`dispatcher`] | `Dispatcher` trait, `NearestDispatcher`                |
//!
//! # Design notes
//!
//! A dispatcher only chooses.  The agent plans a route to the chosen cell
//! and claims it in the `ReservationLedger` before its step ends, so two
//! AGVs evaluated in the same tick can never both hold the same cell.  A
//! candidate without a route is excluded and the dispatcher asked again,
//! nearest first, until one is reachable or none is left.

pub mod dispatcher;
pub mod request;

#[cfg(test)]
mod tests;

pub use dispatcher::{Dispatcher, NearestDispatcher};
pub use request::DispatchRequest;
