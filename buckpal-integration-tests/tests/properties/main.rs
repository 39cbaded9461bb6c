//! Property tests for the transfer core.

#[path = "../common/mod.rs"]
mod common;

mod balance_conservation;
mod lock_ordering;
