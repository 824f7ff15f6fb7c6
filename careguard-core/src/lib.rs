//! Detection core for CareGuard
//!
//! Turns raw accelerometer samples and heart-rate readings into escalations:
//! falls (free fall followed by impact, or a deliberate shake) and critical
//! heart rate. Both detectors are pure state machines behind a cooldown gate,
//! driven by the timestamps of their inputs and never by a clock.
//!
//! Key constraints:
//! - Runs without an allocator (`no_std` with default features off)
//! - No heap allocation in the per-sample path
//! - At most one escalation of a kind per cooldown window per subject
//!
//! ```rust
//! use careguard_core::{AccelSample, HeartRateEscalator, MotionClassifier};
//!
//! let mut motion = MotionClassifier::default();
//! let mut vitals = HeartRateEscalator::default();
//!
//! assert!(motion.observe(AccelSample::new(0.0, 0.0, 9.8), 0)?.is_none());
//! assert!(vitals.observe(72, 0)?.is_none());
//! assert!(vitals.observe(128, 700)?.is_some());
//! # Ok::<(), careguard_core::CoreError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[macro_use]
mod macros;

pub mod constants;
pub mod errors;
pub mod events;
pub mod gate;
pub mod motion;
pub mod time;
pub mod vitals;

// Public API
pub use errors::{CoreError, CoreResult};
pub use events::{Escalation, EscalationEvent, EscalationKind, RiskLevel, SubjectId};
pub use gate::CooldownGate;
pub use motion::{AccelSample, GForce, MotionClassifier, MotionConfig, MotionState};
pub use time::{TimeSource, Timestamp};
pub use vitals::{HeartRate, HeartRateEscalator, VitalStatus, VitalsConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
