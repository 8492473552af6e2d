//! # Selector Module
//!
//! This module implements smooth weighted round-robin candidate selection.
//!
//! Every selection adds each candidate's base weight to its accumulator,
//! picks the candidate with the largest accumulator, and debits the winner
//! by the total weight. Over any window of `total_weight` calls from a fresh
//! state each candidate wins exactly `weight` times, with its wins spread
//! evenly across the window.

mod smooth;

pub use smooth::{SmoothWeight, WeightState};
