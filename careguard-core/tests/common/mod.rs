//! Shared sample generators for integration tests

#![allow(dead_code)]

use careguard_core::{
    motion::simulation::{replay, FALL_SEQUENCE},
    time::Timestamp,
    AccelSample, Escalation, MotionClassifier,
};

/// Device lying still
pub const REST: AccelSample = AccelSample::new(0.0, 0.0, 9.8);

/// A firm shake, 2.5 g
pub const SHAKE: AccelSample = AccelSample::new(0.0, 0.0, 24.5);

/// Resting samples at 50 Hz for `duration_ms`
pub fn resting(start: Timestamp, duration_ms: u64) -> Vec<(Timestamp, AccelSample)> {
    (0..duration_ms / 20).map(|i| (start + i * 20, REST)).collect()
}

/// One shake sample at each timestamp, resting samples in between
pub fn shakes_at(times: &[Timestamp]) -> Vec<(Timestamp, AccelSample)> {
    let end = times.last().copied().unwrap_or(0) + 200;
    let mut samples = resting(0, end);
    samples.retain(|(t, _)| !times.contains(t));
    samples.extend(times.iter().map(|&t| (t, SHAKE)));
    samples.sort_by_key(|(t, _)| *t);
    samples
}

/// The documented fall, anchored at `start`
pub fn documented_fall(start: Timestamp) -> Vec<(Timestamp, AccelSample)> {
    replay(&FALL_SEQUENCE, start).collect()
}

/// Feed samples through a classifier, collecting every escalation
pub fn run(
    classifier: &mut MotionClassifier,
    samples: &[(Timestamp, AccelSample)],
) -> Vec<Escalation> {
    samples
        .iter()
        .filter_map(|&(t, sample)| classifier.observe(sample, t).expect("finite sample"))
        .collect()
}
