//! Constants for CareGuard Core
//!
//! All detector thresholds, windows and bands live here with the reasoning
//! behind each value. Detectors read them through their config structs so a
//! deployment can tune a device without touching the state machines.
//!
//! ## Organization
//!
//! - **Motion**: g-force thresholds and timing for fall and shake detection
//! - **Vitals**: heart-rate bands, escalation threshold and simulation steps
//! - **Time**: cadences of the inbound streams

/// Fall and shake detection thresholds and windows.
pub mod motion;

/// Heart-rate bands, escalation limits and simulation parameters.
pub mod vitals;

/// Stream cadences.
pub mod time;

pub use motion::{
    STANDARD_GRAVITY, FREE_FALL_THRESHOLD_G, IMPACT_THRESHOLD_G, SHAKE_THRESHOLD_G,
    FALL_COOLDOWN_MS, SHAKE_WINDOW_MS,
};

pub use vitals::{
    CRITICAL_HIGH_BPM, CRITICAL_LOW_BPM, MAX_HEART_RATE_BPM, HEART_RATE_COOLDOWN_MS,
};

pub use time::{
    AMBIENT_HEART_RATE_INTERVAL_MS, RAMP_TICK_INTERVAL_MS, COOLDOWN_TICK_INTERVAL_MS,
};
