//! `fleet-reserve` — exclusive claims on cells and destinations.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ledger`] | `ReservationLedger`, `DestinationClaim`, `ClaimOutcome`   |
//!
//! The ledger has no failure modes of its own: a refused claim is an
//! ordinary outcome the caller reacts to (wait, retarget, re-route), so the
//! API returns `bool` / [`ClaimOutcome`] rather than `Result`.

pub mod ledger;


pub use ledger::{ClaimOutcome, DestinationClaim, ReservationLedger};
