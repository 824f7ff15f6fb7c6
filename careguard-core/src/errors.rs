//! Error Types for Detector Input and Configuration Failures
//!
//! Errors in the core are small, `Copy`, and carry only `&'static str`
//! reasons so they can be returned from the per-sample hot path without
//! allocation.
//!
//! ## Error Categories
//!
//! ### Malformed Input
//! - `InvalidSample`: an acceleration component is NaN or infinite
//! - `HeartRateOutOfRange`: a BPM reading above the physiological ceiling
//!
//! ### Configuration
//! - `InvalidConfig`: thresholds or windows that cannot describe a detector
//!
//! Missing sensor input is *not* an error. A classifier that never receives
//! samples simply stays in `Monitoring`; see [`crate::motion::SensorWatch`]
//! for surfacing sensor availability.
//!
//! Suppressed escalations inside a cooldown window are not errors either.
//! They are a no-op, visible only through trace logging.
//!
//! ```rust
//! use careguard_core::{AccelSample, CoreError, MotionClassifier};
//!
//! let mut classifier = MotionClassifier::default();
//! match classifier.observe(AccelSample::new(f32::NAN, 0.0, 9.8), 0) {
//!     Err(CoreError::InvalidSample) => {} // dropped, state untouched
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoreError {
    /// Acceleration sample with a non-finite component
    #[error("Invalid sample: acceleration components must be finite")]
    InvalidSample,

    /// Heart-rate reading above the accepted ceiling
    #[error("Heart rate {bpm} BPM exceeds maximum {max} BPM")]
    HeartRateOutOfRange {
        /// The rejected reading
        bpm: u16,
        /// Highest accepted reading
        max: u16,
    },

    /// Detector configuration that cannot be used
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for CoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSample =>
                defmt::write!(fmt, "Invalid sample"),
            Self::HeartRateOutOfRange { bpm, max } =>
                defmt::write!(fmt, "Heart rate {} > {}", bpm, max),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<CoreError>() <= 24);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_messages() {
        let err = CoreError::HeartRateOutOfRange { bpm: 400, max: 300 };
        assert_eq!(err.to_string(), "Heart rate 400 BPM exceeds maximum 300 BPM");

        let err = CoreError::InvalidConfig { reason: "window is zero" };
        assert_eq!(err.to_string(), "Invalid configuration: window is zero");
    }
}
