//! Tuning service
//!
//! Applies a tuning plan (power cap plus clock offsets) to a GPU device.

use crate::domain::{ClockDomain, ClockOffset, PowerCapPercent, PowerConstraints, PowerLimit};
use crate::error::{NvmlError, ServiceError};
use crate::nvml::GpuDevice;

/// The three adjustments applied uniformly to every discovered GPU
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunePlan {
    /// Power cap as a percentage of the default limit
    pub power_cap: PowerCapPercent,
    /// Graphics clock offset
    pub graphics_offset: ClockOffset,
    /// Memory clock offset
    pub memory_offset: ClockOffset,
}

impl TunePlan {
    /// Create a new tuning plan
    pub fn new(
        power_cap: PowerCapPercent,
        graphics_offset: ClockOffset,
        memory_offset: ClockOffset,
    ) -> Self {
        Self {
            power_cap,
            graphics_offset,
            memory_offset,
        }
    }

    /// The offset the plan carries for a given clock domain
    pub fn offset_for(&self, domain: ClockDomain) -> ClockOffset {
        match domain {
            ClockDomain::Graphics => self.graphics_offset,
            ClockDomain::Memory => self.memory_offset,
        }
    }
}

/// Result of a power cap attempt
///
/// Unsupported and out-of-range requests are skips, not failures: the
/// remaining operations on the device still proceed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerCapOutcome {
    /// The limit was submitted (or validated, in dry-run mode)
    Applied(PowerLimit),
    /// The GPU does not expose a manageable power budget
    SkippedUnsupported,
    /// The resolved limit fell outside the GPU's reported range
    SkippedOutOfRange {
        requested: PowerLimit,
        constraints: PowerConstraints,
    },
}

/// Service for applying a tuning plan to GPU devices
pub struct TuningService {
    plan: TunePlan,
    dry_run: bool,
}

impl TuningService {
    /// Create a new tuning service
    pub fn new(plan: TunePlan, dry_run: bool) -> Self {
        Self { plan, dry_run }
    }

    /// Get the configured plan
    pub fn plan(&self) -> &TunePlan {
        &self.plan
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply the power cap to a device
    ///
    /// Queries the device's constraints, resolves the percentage against the
    /// default limit and validates the result before submitting. A GPU that
    /// does not support power management, or a request outside its range,
    /// yields a skip outcome rather than an error.
    pub fn apply_power_cap<D: GpuDevice>(
        &self,
        device: &mut D,
    ) -> Result<PowerCapOutcome, ServiceError> {
        let constraints = match device.power_constraints() {
            Ok(c) => c,
            Err(NvmlError::NotSupported(msg)) => {
                log::warn!("Power capping unsupported on GPU {}: {}", device.index(), msg);
                return Ok(PowerCapOutcome::SkippedUnsupported);
            }
            Err(e) => return Err(e.into()),
        };

        let requested = self.plan.power_cap.resolve(&constraints);
        if requested.validate(&constraints).is_err() {
            log::warn!(
                "Power cap {} resolves to {} outside {} on GPU {}",
                self.plan.power_cap,
                requested,
                constraints,
                device.index()
            );
            return Ok(PowerCapOutcome::SkippedOutOfRange {
                requested,
                constraints,
            });
        }

        if self.dry_run {
            log::info!("DRY RUN: Would set power limit to {}", requested);
            return Ok(PowerCapOutcome::Applied(requested));
        }

        device.set_power_limit(requested)?;
        log::debug!("Applied power limit {} on GPU {}", requested, device.index());

        Ok(PowerCapOutcome::Applied(requested))
    }

    /// Apply the planned offset for one clock domain to a device
    pub fn apply_clock_offset<D: GpuDevice>(
        &self,
        device: &mut D,
        domain: ClockDomain,
    ) -> Result<ClockOffset, ServiceError> {
        let offset = self.plan.offset_for(domain);

        if self.dry_run {
            log::info!("DRY RUN: Would set {} clock offset to {}", domain, offset);
            return Ok(offset);
        }

        device.set_clock_offset(domain, offset)?;
        log::debug!(
            "Applied {} clock offset {} on GPU {}",
            domain,
            offset,
            device.index()
        );

        Ok(offset)
    }
}
