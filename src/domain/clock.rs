//! Clock domain types
//!
//! Types for the two offsettable clock planes and the signed frequency
//! offset applied to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A clock plane that can be offset independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockDomain {
    /// Graphics (GPC) clock
    Graphics,
    /// Memory clock
    Memory,
}

impl ClockDomain {
    /// Human-readable label used in console reporting
    pub fn label(&self) -> &'static str {
        match self {
            ClockDomain::Graphics => "graphics",
            ClockDomain::Memory => "memory",
        }
    }
}

impl fmt::Display for ClockDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signed clock frequency offset, stored in kHz
///
/// Negative offsets underclock. NVML's VF offset entry points take MHz,
/// so `as_mhz` truncates toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockOffset(i32);

impl ClockOffset {
    /// Create a new offset from kHz
    pub const fn from_khz(khz: i32) -> Self {
        Self(khz)
    }

    /// Get the offset in kHz
    #[inline]
    pub const fn as_khz(&self) -> i32 {
        self.0
    }

    /// Get the offset in whole MHz (truncating toward zero)
    #[inline]
    pub const fn as_mhz(&self) -> i32 {
        self.0 / 1000
    }
}

impl fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kHz", self.0)
    }
}
