//! Example applications using the `BuckPal` transfer core
//!
//! This crate wires the application core to the in-memory account store
//! the way a real application would wire it to a database adapter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// These are examples, so we don't need to be as pedantic
#![allow(clippy::missing_const_for_fn)]

/// Send-money example: opening accounts, transferring and querying balances
pub mod send_money;
