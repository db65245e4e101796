//! Trait definitions for GPU operations
//!
//! These traits abstract over NVML to enable testing with mocks.

use crate::domain::{ClockDomain, ClockOffset, GpuInfo, PowerConstraints, PowerLimit};
use crate::error::NvmlError;

/// Trait for GPU device operations
///
/// This trait abstracts all GPU operations, allowing for mock implementations
/// in tests while using real NVML in production.
pub trait GpuDevice: Send + Sync {
    /// Get GPU information
    fn info(&self) -> Result<GpuInfo, NvmlError>;

    /// Get the GPU name
    fn name(&self) -> Result<String, NvmlError>;

    /// Get the GPU index
    fn index(&self) -> u32;

    // Power operations
    /// Get current power limit
    fn power_limit(&self) -> Result<PowerLimit, NvmlError>;

    /// Get power constraints (min/max/default)
    ///
    /// Returns `NotSupported` on GPUs without a manageable power budget;
    /// callers treat that as "skip power capping on this device".
    fn power_constraints(&self) -> Result<PowerConstraints, NvmlError>;

    /// Set power limit
    fn set_power_limit(&mut self, limit: PowerLimit) -> Result<(), NvmlError>;

    // Clock operations
    /// Get the current VF offset for a clock domain
    fn clock_offset(&self, domain: ClockDomain) -> Result<ClockOffset, NvmlError>;

    /// Set the VF offset for a clock domain
    fn set_clock_offset(&mut self, domain: ClockDomain, offset: ClockOffset)
        -> Result<(), NvmlError>;
}

/// Trait for managing multiple GPUs
///
/// This trait provides methods for discovering and accessing GPU devices.
pub trait GpuManager: Send + Sync {
    /// The device type returned by this manager
    type Device: GpuDevice;

    /// Get the number of GPU devices
    fn device_count(&self) -> Result<u32, NvmlError>;

    /// Get a device by index
    fn device_by_index(&self, index: u32) -> Result<Self::Device, NvmlError>;

    /// Get all devices, bounded by the vendor handle-array size
    ///
    /// An index that fails to resolve is skipped so one broken device
    /// cannot empty the list.
    fn all_devices(&self) -> Result<Vec<Self::Device>, NvmlError> {
        let count = (self.device_count()? as usize).min(crate::domain::MAX_PHYSICAL_GPUS);
        let mut devices = Vec::with_capacity(count);
        for i in 0..count as u32 {
            match self.device_by_index(i) {
                Ok(device) => devices.push(device),
                Err(e) => log::warn!("Skipping GPU index {}: {}", i, e),
            }
        }
        Ok(devices)
    }

    /// Get driver version
    fn driver_version(&self) -> Result<String, NvmlError>;

    /// Get NVML version
    fn nvml_version(&self) -> Result<String, NvmlError>;
}
