//! Domain models for nvtune
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod clock;
pub mod gpu;
pub mod power;

pub use clock::{ClockDomain, ClockOffset};
pub use gpu::GpuInfo;
pub use power::{PowerCapPercent, PowerConstraints, PowerLimit};

/// Upper bound on the number of physical GPU handles collected during
/// discovery, matching the vendor's fixed handle-array size.
pub const MAX_PHYSICAL_GPUS: usize = 64;
