//! Integration tests for `BuckPal`
//!
//! This crate contains integration tests that verify the transfer core
//! running against the in-memory account store.

// This is a test-only crate
#![cfg(test)]
