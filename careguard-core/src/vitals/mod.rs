//! Vital-Sign Monitoring
//!
//! Heart-rate readings arrive as integer BPM, either from a wearable or from
//! the simulators in [`simulation`]. Each reading gets a display status; only
//! the [`HeartRateEscalator`] decides whether it becomes an escalation.
//!
//! ## Status Bands
//!
//! ```text
//!   0      50      60            100      120          300
//!   ├──────┼───────┼─────────────┼────────┼────────────┤
//!   Critical Warning    Normal     Warning    Critical
//! ```
//!
//! Status is display-only. Escalation uses a separate, configurable
//! threshold (120 BPM) with its own 10 s cooldown.

mod escalator;
#[cfg(feature = "simulation")]
pub mod simulation;

pub use escalator::{step, EscalatorState, HeartRateEscalator, VitalsConfig};

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::vitals::{
    CRITICAL_HIGH_BPM, CRITICAL_LOW_BPM, DEFAULT_HEART_RATE_BPM, MAX_HEART_RATE_BPM,
    NORMAL_MAX_BPM, NORMAL_MIN_BPM,
};
use crate::errors::{CoreError, CoreResult};

/// Heart rate in beats per minute, at most [`MAX_HEART_RATE_BPM`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct HeartRate(u16);

impl HeartRate {
    /// Validate a raw reading
    pub const fn new(bpm: u16) -> CoreResult<Self> {
        if bpm > MAX_HEART_RATE_BPM {
            return Err(CoreError::HeartRateOutOfRange {
                bpm,
                max: MAX_HEART_RATE_BPM,
            });
        }
        Ok(Self(bpm))
    }

    /// Beats per minute
    pub const fn bpm(&self) -> u16 {
        self.0
    }

    /// Display band of this reading
    pub const fn status(&self) -> VitalStatus {
        VitalStatus::classify(self.0)
    }
}

impl Default for HeartRate {
    fn default() -> Self {
        Self(DEFAULT_HEART_RATE_BPM)
    }
}

impl TryFrom<u16> for HeartRate {
    type Error = CoreError;

    fn try_from(bpm: u16) -> CoreResult<Self> {
        Self::new(bpm)
    }
}

impl From<HeartRate> for u16 {
    fn from(rate: HeartRate) -> u16 {
        rate.0
    }
}

impl fmt::Display for HeartRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

/// Display status of a heart-rate reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VitalStatus {
    /// Within the resting range
    Normal,
    /// Outside the resting range but not critical
    Warning,
    /// Needs escalation
    Critical,
}

impl VitalStatus {
    /// Display band for a raw BPM value
    pub const fn classify(bpm: u16) -> Self {
        if bpm < CRITICAL_LOW_BPM || bpm > CRITICAL_HIGH_BPM {
            VitalStatus::Critical
        } else if bpm < NORMAL_MIN_BPM || bpm > NORMAL_MAX_BPM {
            VitalStatus::Warning
        } else {
            VitalStatus::Normal
        }
    }

    /// Wire name, lower case
    pub const fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Normal => "normal",
            VitalStatus::Warning => "warning",
            VitalStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
