//! Service layer for GPU tuning operations
//!
//! Services encapsulate the business logic of validating and applying
//! tuning values to devices.

pub mod tuner;

pub use tuner::{PowerCapOutcome, TunePlan, TuningService};
