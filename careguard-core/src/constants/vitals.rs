//! Heart-Rate Bands and Escalation Limits
//!
//! Adult resting heart rate bands. The display status and the escalation
//! threshold are separate: only tachycardia above the critical
//! band escalates, bradycardia is display-only.

// ===== BANDS =====

/// Lowest BPM still displayed as `Normal`.
pub const NORMAL_MIN_BPM: u16 = 60;

/// Highest BPM still displayed as `Normal`.
pub const NORMAL_MAX_BPM: u16 = 100;

/// Readings below this are `Critical`.
pub const CRITICAL_LOW_BPM: u16 = 50;

/// Readings above this are `Critical` and may escalate.
pub const CRITICAL_HIGH_BPM: u16 = 120;

/// Readings above this are rejected as sensor faults.
pub const MAX_HEART_RATE_BPM: u16 = 300;

/// Rate shown before the first reading arrives.
pub const DEFAULT_HEART_RATE_BPM: u16 = 72;

// ===== ESCALATION =====

/// Cooldown after a heart-rate escalation (ms).
pub const HEART_RATE_COOLDOWN_MS: u64 = 10_000;

// ===== SIMULATION =====

/// Ramp step bounds while rising (BPM per tick, inclusive).
pub const RAMP_RISE_MIN_BPM: u16 = 5;
/// Upper bound of a rising step.
pub const RAMP_RISE_MAX_BPM: u16 = 12;

/// Ramp stops rising once the rate reaches this.
pub const RAMP_PEAK_BPM: u16 = 150;

/// Ramp step bounds while falling (BPM per tick, inclusive).
pub const RAMP_FALL_MIN_BPM: u16 = 5;
/// Upper bound of a falling step.
pub const RAMP_FALL_MAX_BPM: u16 = 14;

/// Ramp ends once the rate drops to this.
pub const RAMP_FLOOR_BPM: u16 = 80;

/// Resting value range picked when the ramp ends (inclusive).
pub const RAMP_REST_MIN_BPM: u16 = 70;
/// Upper bound of the resting value.
pub const RAMP_REST_MAX_BPM: u16 = 85;

/// Ambient resting fluctuation range (inclusive).
pub const AMBIENT_MIN_BPM: u16 = 60;
/// Upper bound of the ambient range.
pub const AMBIENT_MAX_BPM: u16 = 95;
