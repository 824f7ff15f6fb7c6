//! Property tests for the cooldown guarantees

mod common;

use careguard_core::{
    constants::{FALL_COOLDOWN_MS, HEART_RATE_COOLDOWN_MS},
    AccelSample, EscalationKind, HeartRateEscalator, MotionClassifier, RiskLevel,
};
use proptest::prelude::*;

fn sample_strategy() -> impl Strategy<Value = AccelSample> {
    prop_oneof![
        // rest and tilt
        (-2.0f32..2.0, -2.0f32..2.0, 8.0f32..11.0).prop_map(|(x, y, z)| AccelSample::new(x, y, z)),
        // free fall
        (-0.5f32..0.5, -0.5f32..0.5, -0.5f32..3.0).prop_map(|(x, y, z)| AccelSample::new(x, y, z)),
        // impacts and shakes
        (-20.0f32..20.0, -20.0f32..20.0, 15.0f32..40.0).prop_map(|(x, y, z)| AccelSample::new(x, y, z)),
    ]
}

fn stream_strategy() -> impl Strategy<Value = Vec<(u64, AccelSample)>> {
    prop::collection::vec((0u64..400, sample_strategy()), 1..400).prop_map(|steps| {
        let mut t = 0;
        steps
            .into_iter()
            .map(|(gap, sample)| {
                t += gap;
                (t, sample)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn at_most_one_fall_per_cooldown(stream in stream_strategy()) {
        let mut classifier = MotionClassifier::default();
        let times: Vec<u64> = stream
            .iter()
            .filter_map(|&(t, sample)| classifier.observe(sample, t).unwrap())
            .map(|escalation| {
                assert_eq!(escalation.kind, EscalationKind::FallDetected);
                escalation.detected_at
            })
            .collect();

        for pair in times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= FALL_COOLDOWN_MS);
        }
    }

    #[test]
    fn at_most_one_heart_rate_escalation_per_cooldown(
        readings in prop::collection::vec((0u64..3_000, 40u16..200), 1..200)
    ) {
        let mut escalator = HeartRateEscalator::default();
        let mut t = 0;
        let mut times = Vec::new();
        for (gap, bpm) in readings {
            t += gap;
            if let Some(escalation) = escalator.observe(bpm, t).unwrap() {
                prop_assert!(bpm > 120);
                times.push(escalation.detected_at);
            }
        }

        for pair in times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= HEART_RATE_COOLDOWN_MS);
        }
    }

    #[test]
    fn classification_is_a_pure_function(id in any::<u8>()) {
        let kind = EscalationKind::Custom(id);
        prop_assert_eq!(RiskLevel::classify(kind), RiskLevel::Low);
        prop_assert_eq!(RiskLevel::classify(kind), RiskLevel::classify(kind));
    }
}
