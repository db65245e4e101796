//! nvtune - NVML-based GPU tuning library
//!
//! This library provides the core functionality for applying a power cap
//! and clock offsets to NVIDIA GPUs via the NVML library.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`nvml`]: NVML abstraction layer
//! - [`services`]: Business logic services

pub mod cli;
pub mod commands;
pub mod domain;
pub mod error;
pub mod nvml;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
