//! Derive macro support for restructure
//!
//! Re-exports `#[derive(Schema)]` and `#[derive(Capability)]`. The macros
//! share their names with the traits they implement, so a single
//! `use restructure::prelude::*;` brings both into scope.

pub use restructure_derive::{Capability, Schema};
