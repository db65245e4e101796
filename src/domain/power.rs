//! Power domain types
//!
//! Provides validated types for power limits, constraints, and the
//! percentage-based power cap.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Power limit in milliwatts (stored internally) but displayed as watts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PowerLimit(u32);

impl PowerLimit {
    /// Create a new power limit from watts
    pub const fn from_watts(watts: u32) -> Self {
        Self(watts * 1000)
    }

    /// Create a new power limit from milliwatts
    pub const fn from_milliwatts(mw: u32) -> Self {
        Self(mw)
    }

    /// Get the power limit in watts
    #[inline]
    pub const fn as_watts(&self) -> u32 {
        self.0 / 1000
    }

    /// Get the power limit in milliwatts
    #[inline]
    pub const fn as_milliwatts(&self) -> u32 {
        self.0
    }

    /// Validate this power limit against constraints
    pub fn validate(&self, constraints: &PowerConstraints) -> Result<(), DomainError> {
        if !constraints.contains(self) {
            return Err(DomainError::PowerCapOutOfRange {
                requested_mw: self.0,
                min_mw: constraints.min.0,
                max_mw: constraints.max.0,
            });
        }
        Ok(())
    }
}

impl fmt::Display for PowerLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}W", self.as_watts())
    }
}

/// Power constraints from GPU (min/max limits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerConstraints {
    /// Minimum power limit
    pub min: PowerLimit,
    /// Maximum power limit
    pub max: PowerLimit,
    /// Default power limit
    pub default: PowerLimit,
}

impl PowerConstraints {
    /// Create new power constraints
    pub fn new(min: PowerLimit, max: PowerLimit, default: PowerLimit) -> Self {
        Self { min, max, default }
    }

    /// Check if a power limit is within constraints
    pub fn contains(&self, limit: &PowerLimit) -> bool {
        limit.0 >= self.min.0 && limit.0 <= self.max.0
    }
}

impl fmt::Display for PowerConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (default: {})", self.min, self.max, self.default)
    }
}

/// Power cap expressed as a percentage of the GPU's default power limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCapPercent(f64);

impl PowerCapPercent {
    /// Create a new power cap percentage
    ///
    /// Rejects non-finite and negative values. Whether the percentage is
    /// actually achievable is decided against the GPU's reported constraints
    /// at apply time.
    pub fn new(percent: f64) -> Result<Self, DomainError> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(DomainError::InvalidPowerCapPercent(percent));
        }
        Ok(Self(percent))
    }

    /// Get the raw percentage value
    #[inline]
    pub fn as_percent(&self) -> f64 {
        self.0
    }

    /// Resolve the percentage to an absolute limit in the vendor's
    /// milliwatt unit, relative to the GPU's default power limit.
    pub fn resolve(&self, constraints: &PowerConstraints) -> PowerLimit {
        let mw = constraints.default.as_milliwatts() as f64 * self.0 / 100.0;
        PowerLimit::from_milliwatts(mw.round() as u32)
    }
}

impl fmt::Display for PowerCapPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> PowerConstraints {
        PowerConstraints::new(
            PowerLimit::from_watts(100),
            PowerLimit::from_watts(400),
            PowerLimit::from_watts(300),
        )
    }

    #[test]
    fn test_power_limit_from_watts() {
        let limit = PowerLimit::from_watts(300);
        assert_eq!(limit.as_watts(), 300);
        assert_eq!(limit.as_milliwatts(), 300_000);
    }

    #[test]
    fn test_power_limit_display() {
        let limit = PowerLimit::from_watts(350);
        assert_eq!(limit.to_string(), "350W");
    }

    #[test]
    fn test_power_constraints_contains() {
        let constraints = constraints();

        assert!(constraints.contains(&PowerLimit::from_watts(200)));
        assert!(constraints.contains(&PowerLimit::from_watts(100)));
        assert!(constraints.contains(&PowerLimit::from_watts(400)));
        assert!(!constraints.contains(&PowerLimit::from_watts(50)));
        assert!(!constraints.contains(&PowerLimit::from_watts(500)));
    }

    #[test]
    fn test_power_limit_validation() {
        let constraints = constraints();

        let valid = PowerLimit::from_watts(250);
        assert!(valid.validate(&constraints).is_ok());

        let too_low = PowerLimit::from_watts(50);
        assert!(too_low.validate(&constraints).is_err());

        let too_high = PowerLimit::from_watts(500);
        assert!(too_high.validate(&constraints).is_err());
    }

    #[test]
    fn test_power_cap_percent_rejects_garbage() {
        assert!(PowerCapPercent::new(f64::NAN).is_err());
        assert!(PowerCapPercent::new(f64::INFINITY).is_err());
        assert!(PowerCapPercent::new(-10.0).is_err());
        assert!(PowerCapPercent::new(60.0).is_ok());
    }

    #[test]
    fn test_power_cap_percent_resolution() {
        let cap = PowerCapPercent::new(60.0).unwrap();
        // 60% of the 300W default
        assert_eq!(cap.resolve(&constraints()).as_milliwatts(), 180_000);

        let full = PowerCapPercent::new(100.0).unwrap();
        assert_eq!(full.resolve(&constraints()).as_milliwatts(), 300_000);
    }

    #[test]
    fn test_resolved_cap_out_of_range() {
        // 60% of 300W = 180W is in range; 20% = 60W falls below the 100W floor
        let low = PowerCapPercent::new(20.0).unwrap();
        let resolved = low.resolve(&constraints());
        assert!(resolved.validate(&constraints()).is_err());

        // 150% = 450W exceeds the 400W ceiling
        let high = PowerCapPercent::new(150.0).unwrap();
        let resolved = high.resolve(&constraints());
        assert!(resolved.validate(&constraints()).is_err());
    }

    #[test]
    fn test_power_cap_percent_display() {
        let cap = PowerCapPercent::new(60.0).unwrap();
        assert_eq!(cap.to_string(), "60.00%");
    }
}
