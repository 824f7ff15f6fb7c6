//! Motion-Based Fall Detection
//!
//! ## Overview
//!
//! The motion classifier turns a stream of 3-axis accelerometer samples into
//! at most one `FallDetected` escalation per cooldown window. Two detectors
//! run on every sample and share a single cooldown gate:
//!
//! ```text
//!              ┌── free-fall → impact ──┐
//! sample → g ──┤                        ├── CooldownGate(15 s) ──→ Escalation
//!              └── shake counting ──────┘
//! ```
//!
//! ### Free-fall → impact
//! A dropped body reads close to 0 g while falling and spikes on landing.
//! The classifier enters `FreeFall` below 0.4 g and confirms a fall on a
//! spike above 2.5 g within one second. A free fall that lasts longer than a
//! second without impact is discarded.
//!
//! ### Shake counting
//! Three firm shakes (> 2.0 g, at least 500 ms apart) inside a rolling
//! two-second window also raise a fall. This is the path most phones actually
//! hit during testing, since real free fall is rare.
//!
//! ## G-Force
//!
//! Samples include gravity, so a device at rest reads 1.0 g:
//! ```text
//! g = round2( sqrt(x² + y² + z²) / 9.8 )
//! ```
//! Every threshold compares against the rounded value.
//!
//! ## State Machine
//!
//! ```text
//!             g < 0.4                     g > 2.5 within 1 s
//! Monitoring ─────────→ FreeFall ───────────────────────────→ FallConfirmed
//!     ↑                    │ > 1 s, no impact                      │
//!     ├────────────────────┘                                       ↓
//!     │   g > 2.0                 3rd shake                   CoolingDown
//!     ├──────────→ ShakeAccumulating ───────→ FallConfirmed        │
//!     │   window expires      │                                    │
//!     ├───────────────────────┘                                    │
//!     └──────────── g ∈ [0.8, 1.3], nothing mid-sequence ──────────┘
//! ```
//!
//! The transition function is pure: see [`step`]. [`MotionClassifier`]
//! wraps it with sample validation, display history and logging.

mod classifier;
mod sensor;
mod shake;
pub mod simulation;

pub use classifier::{
    step, expire, ClassifierState, MotionClassifier, MotionConfig, MotionReadout,
};
pub use sensor::{SensorStatus, SensorWatch};
pub use shake::ShakeCounter;

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::motion::{GFORCE_SCALE, STANDARD_GRAVITY};
use crate::errors::{CoreError, CoreResult};

/// One accelerometer sample in m/s², gravity included
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccelSample {
    /// X axis (m/s²)
    pub x: f32,
    /// Y axis (m/s²)
    pub y: f32,
    /// Z axis (m/s²)
    pub z: f32,
}

impl AccelSample {
    /// Sample from the three axes
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All components are finite numbers
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean magnitude in m/s²
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Acceleration magnitude normalized to Earth gravity, rounded to 0.01 g
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GForce(f32);

impl GForce {
    /// At rest
    pub const ONE: GForce = GForce(1.0);

    /// Normalize and round a sample
    pub fn from_sample(sample: &AccelSample) -> CoreResult<Self> {
        if !sample.is_valid() {
            return Err(CoreError::InvalidSample);
        }

        let raw = sample.magnitude() / STANDARD_GRAVITY;
        Ok(Self(libm::roundf(raw * GFORCE_SCALE) / GFORCE_SCALE))
    }

    /// Value in g
    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for GForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}g", self.0)
    }
}

/// Display state of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MotionState {
    /// Nothing in progress
    Monitoring = 0,
    /// Waiting for an impact after a drop below the free-fall threshold
    FreeFall = 1,
    /// At least one shake counted in the current window
    ShakeAccumulating = 2,
    /// The sample just processed raised a fall
    ///
    /// Also held past the cooldown, until the device settles, when no
    /// sample arrived while the gate was closed.
    FallConfirmed = 3,
    /// The fall gate is closed and further falls are suppressed
    CoolingDown = 4,
}

impl MotionState {
    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            MotionState::Monitoring => "monitoring",
            MotionState::FreeFall => "free-fall",
            MotionState::ShakeAccumulating => "shaking",
            MotionState::FallConfirmed => "fall-confirmed",
            MotionState::CoolingDown => "cooling-down",
        }
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotionState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}
