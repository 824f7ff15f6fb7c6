//! Scripted accelerometer sequences for demos and tests

use super::AccelSample;
use crate::time::Timestamp;

/// One sample of a script, `delay_ms` after the script starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedSample {
    /// Offset from the script start
    pub delay_ms: u64,
    /// Reading to feed
    pub sample: AccelSample,
}

const fn at(delay_ms: u64, x: f32, y: f32, z: f32) -> ScriptedSample {
    ScriptedSample {
        delay_ms,
        sample: AccelSample::new(x, y, z),
    }
}

/// A phone dropped from standing height: tilt, free fall, impact, rest
///
/// Fed through a fresh classifier this raises exactly one fall, on the
/// impact at 1200 ms.
pub const FALL_SEQUENCE: [ScriptedSample; 11] = [
    at(0, 0.5, 0.3, 9.5),
    at(200, 0.3, 0.2, 8.0),
    at(400, 0.1, 0.1, 4.0),
    at(600, 0.1, 0.05, 1.5),
    at(800, 0.05, 0.02, 0.5),
    at(1000, 0.02, 0.01, 0.2),
    at(1200, 8.0, 12.0, 28.0),
    at(1400, 5.0, 3.0, 18.0),
    at(1600, 1.0, 0.5, 11.0),
    at(2000, 0.1, 0.1, 9.8),
    at(3000, 0.05, 0.05, 9.8),
];

/// Delay of the impact sample in [`FALL_SEQUENCE`]
pub const FALL_SEQUENCE_IMPACT_MS: u64 = 1200;

/// Anchor a script at `start`, yielding `(timestamp, sample)` pairs
pub fn replay(
    script: &[ScriptedSample],
    start: Timestamp,
) -> impl Iterator<Item = (Timestamp, AccelSample)> + '_ {
    script
        .iter()
        .map(move |step| (start.saturating_add(step.delay_ms), step.sample))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_ordered() {
        assert!(FALL_SEQUENCE
            .windows(2)
            .all(|pair| pair[0].delay_ms < pair[1].delay_ms));
        assert!(FALL_SEQUENCE
            .iter()
            .any(|step| step.delay_ms == FALL_SEQUENCE_IMPACT_MS));
    }

    #[test]
    fn replay_offsets_timestamps() {
        let stamps: heapless::Vec<Timestamp, 11> =
            replay(&FALL_SEQUENCE, 10_000).map(|(t, _)| t).collect();
        assert_eq!(stamps[0], 10_000);
        assert_eq!(stamps[10], 13_000);
    }
}
