//! Integration test crate for Tripcut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every tripcut crate to verify the pipeline end to end.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod sampling;
