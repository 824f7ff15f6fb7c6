//! Motion sensor availability probe

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::motion::{SENSOR_ACTIVE_AFTER_SAMPLES, SENSOR_PROBE_TIMEOUT_MS},
    time::{elapsed_ms, Timestamp},
};

/// Whether the platform is delivering motion samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorStatus {
    /// Waiting for the first samples
    Checking,
    /// Samples are arriving
    Active,
    /// No sample arrived within the probe timeout; permission is likely denied
    Blocked,
    /// The platform has no motion sensor
    Unsupported,
}

impl SensorStatus {
    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorStatus::Checking => "checking",
            SensorStatus::Active => "active",
            SensorStatus::Blocked => "blocked",
            SensorStatus::Unsupported => "unsupported",
        }
    }
}

impl core::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks sample arrival from the moment listening started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorWatch {
    started_at: Timestamp,
    samples: u32,
    supported: bool,
}

impl SensorWatch {
    /// Watch started listening at `started_at`
    pub const fn new(started_at: Timestamp) -> Self {
        Self {
            started_at,
            samples: 0,
            supported: true,
        }
    }

    /// Watch for a platform without a motion sensor
    pub const fn unsupported() -> Self {
        Self {
            started_at: 0,
            samples: 0,
            supported: false,
        }
    }

    /// Count one delivered sample
    pub fn record_sample(&mut self) {
        self.samples = self.samples.saturating_add(1);
    }

    /// Samples delivered so far
    pub const fn samples(&self) -> u32 {
        self.samples
    }

    /// Availability as of `now`
    pub fn status(&self, now: Timestamp) -> SensorStatus {
        if !self.supported {
            SensorStatus::Unsupported
        } else if self.samples >= SENSOR_ACTIVE_AFTER_SAMPLES {
            SensorStatus::Active
        } else if self.samples == 0 && elapsed_ms(self.started_at, now) >= SENSOR_PROBE_TIMEOUT_MS {
            SensorStatus::Blocked
        } else {
            SensorStatus::Checking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn becomes_active_after_a_few_samples() {
        let mut watch = SensorWatch::new(1_000);
        assert_eq!(watch.status(1_000), SensorStatus::Checking);

        watch.record_sample();
        watch.record_sample();
        assert_eq!(watch.status(5_000), SensorStatus::Checking);

        watch.record_sample();
        assert_eq!(watch.status(5_000), SensorStatus::Active);
    }

    #[test]
    fn silent_sensor_is_blocked() {
        let watch = SensorWatch::new(1_000);
        assert_eq!(watch.status(2_999), SensorStatus::Checking);
        assert_eq!(watch.status(3_000), SensorStatus::Blocked);
    }

    #[test]
    fn unsupported_platform() {
        let mut watch = SensorWatch::unsupported();
        watch.record_sample();
        assert_eq!(watch.status(0), SensorStatus::Unsupported);
    }
}
