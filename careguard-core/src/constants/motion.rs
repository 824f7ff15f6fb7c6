//! Motion Detection Thresholds
//!
//! Values are expressed in g (acceleration normalized to Earth gravity) and
//! milliseconds. A phone lying still reads ~1.0 g because the sensor reports
//! acceleration *including* gravity.

// ===== NORMALIZATION =====

/// Standard gravity used to normalize acceleration magnitude (m/s²).
pub const STANDARD_GRAVITY: f32 = 9.8;

/// Rounding scale for g-force (two decimal places).
pub const GFORCE_SCALE: f32 = 100.0;

// ===== FREE-FALL / IMPACT =====

/// Below this the device is in unsupported motion (g).
///
/// A dropped phone reads close to 0 g; 0.4 g leaves margin for rotation and
/// air drag during a fall from standing height.
pub const FREE_FALL_THRESHOLD_G: f32 = 0.4;

/// Impact spike that confirms a fall after free fall (g).
pub const IMPACT_THRESHOLD_G: f32 = 2.5;

/// Longest free-fall-to-impact interval accepted as one fall (ms).
///
/// A fall from 1.5 m lasts ~550 ms; anything beyond a second without an
/// impact is treated as a false free fall.
pub const FREE_FALL_WINDOW_MS: u64 = 1000;

// ===== SHAKE =====

/// Single-shake threshold (g).
///
/// Mid-range Android phones report 2-4 g on a firm shake.
pub const SHAKE_THRESHOLD_G: f32 = 2.0;

/// Shakes needed within the window to raise a fall.
pub const SHAKE_COUNT_TRIGGER: u8 = 3;

/// Shake window, restarted on every counted shake (ms).
pub const SHAKE_WINDOW_MS: u64 = 2000;

/// Minimum spacing between two counted shakes (ms).
///
/// One physical shake produces several samples above threshold.
pub const SHAKE_DEBOUNCE_MS: u64 = 500;

// ===== ESCALATION =====

/// Cooldown after a fall escalation, shared by both detectors (ms).
pub const FALL_COOLDOWN_MS: u64 = 15_000;

// ===== DISPLAY =====

/// Lower edge of the resting band used to return to `Monitoring` (g).
pub const SETTLE_BAND_MIN_G: f32 = 0.8;

/// Upper edge of the resting band used to return to `Monitoring` (g).
pub const SETTLE_BAND_MAX_G: f32 = 1.3;

/// Number of recent g-force values kept for display.
pub const GFORCE_HISTORY_LEN: usize = 20;

// ===== SENSOR AVAILABILITY =====

/// Samples required before a sensor is reported active.
pub const SENSOR_ACTIVE_AFTER_SAMPLES: u32 = 3;

/// Time without any sample before a sensor is reported blocked (ms).
pub const SENSOR_PROBE_TIMEOUT_MS: u64 = 2000;
