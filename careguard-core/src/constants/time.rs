//! Stream Cadences
//!
//! Inbound streams are push-based; these intervals only describe how often
//! the reference sources and simulations push.

/// Ambient heart-rate reading interval (ms).
pub const AMBIENT_HEART_RATE_INTERVAL_MS: u64 = 2000;

/// Crisis simulation interval while the rate rises (ms).
pub const RAMP_TICK_INTERVAL_MS: u64 = 700;

/// Crisis simulation interval while the rate recovers (ms).
pub const COOLDOWN_TICK_INTERVAL_MS: u64 = 800;
