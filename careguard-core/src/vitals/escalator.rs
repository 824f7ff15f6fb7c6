//! Heart-rate escalation with cooldown

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::vitals::{CRITICAL_HIGH_BPM, HEART_RATE_COOLDOWN_MS, MAX_HEART_RATE_BPM},
    errors::{CoreError, CoreResult},
    events::{Escalation, EscalationKind},
    gate::CooldownGate,
    time::Timestamp,
};

use super::HeartRate;

/// Escalation threshold and cooldown
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VitalsConfig {
    /// Readings strictly above this escalate (BPM)
    pub critical_bpm: u16,
    /// Suppression window after an escalation (ms)
    pub cooldown_ms: u64,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            critical_bpm: CRITICAL_HIGH_BPM,
            cooldown_ms: HEART_RATE_COOLDOWN_MS,
        }
    }
}

impl VitalsConfig {
    /// Set the escalation threshold
    pub fn with_critical_bpm(mut self, bpm: u16) -> Self {
        self.critical_bpm = bpm;
        self
    }

    /// Set the re-escalation window
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Reject a threshold outside the valid heart-rate range
    pub fn validate(&self) -> CoreResult<()> {
        if self.critical_bpm == 0 || self.critical_bpm >= MAX_HEART_RATE_BPM {
            return Err(CoreError::InvalidConfig {
                reason: "critical heart rate must be between 1 and 299 BPM",
            });
        }
        Ok(())
    }
}

/// Last reading plus the escalation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalatorState {
    previous: Option<HeartRate>,
    gate: CooldownGate,
}

impl EscalatorState {
    /// No previous reading, gate of `cooldown_ms`
    pub const fn new(cooldown_ms: u64) -> Self {
        Self {
            previous: None,
            gate: CooldownGate::new(cooldown_ms),
        }
    }

    /// Reading seen before the latest one
    pub const fn previous(&self) -> Option<HeartRate> {
        self.previous
    }

    /// Gate guarding heart-rate escalations
    pub const fn gate(&self) -> &CooldownGate {
        &self.gate
    }
}

/// Pure transition for one reading
///
/// A reading above the threshold escalates unless it is lower than the one
/// before it (the rate is already recovering) or the gate is closed. A rate
/// that stays elevated therefore escalates again once the window has passed.
pub fn step(
    config: &VitalsConfig,
    mut state: EscalatorState,
    rate: HeartRate,
    now: Timestamp,
) -> (EscalatorState, Option<Escalation>) {
    let recovering = matches!(state.previous, Some(previous) if rate < previous);
    state.previous = Some(rate);

    if rate.bpm() <= config.critical_bpm || recovering {
        return (state, None);
    }

    if !state.gate.try_pass(now) {
        log_trace!(
            "heart rate {} suppressed: cooldown {} ms remaining",
            rate,
            state.gate.remaining_ms(now)
        );
        return (state, None);
    }

    let escalation = Escalation::new(EscalationKind::HeartRateCritical, now).with_heart_rate(rate);
    (state, Some(escalation))
}

/// Heart-rate escalator for one subject
#[derive(Debug, Clone)]
pub struct HeartRateEscalator {
    config: VitalsConfig,
    state: EscalatorState,
}

impl Default for HeartRateEscalator {
    fn default() -> Self {
        Self::build(VitalsConfig::default())
    }
}

impl HeartRateEscalator {
    /// Escalator with validated thresholds
    pub fn with_config(config: VitalsConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: VitalsConfig) -> Self {
        Self {
            state: EscalatorState::new(config.cooldown_ms),
            config,
        }
    }

    /// Process one raw BPM reading
    ///
    /// Readings above the physiological ceiling are rejected and leave the
    /// escalator untouched.
    pub fn observe(&mut self, bpm: u16, now: Timestamp) -> CoreResult<Option<Escalation>> {
        let rate = HeartRate::new(bpm)?;
        let (next, escalation) = step(&self.config, self.state, rate, now);
        self.state = next;

        if escalation.is_some() {
            log_debug!("heart rate {} crossed {} BPM at {}", rate, self.config.critical_bpm, now);
        }
        Ok(escalation)
    }

    /// Latest accepted reading
    pub fn last_reading(&self) -> Option<HeartRate> {
        self.state.previous
    }

    /// Copy of the reducer state
    pub fn snapshot(&self) -> EscalatorState {
        self.state
    }

    /// Thresholds in use
    pub fn config(&self) -> &VitalsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_escalations(readings: &[(u16, Timestamp)]) -> usize {
        let mut escalator = HeartRateEscalator::default();
        readings
            .iter()
            .filter_map(|&(bpm, t)| escalator.observe(bpm, t).unwrap())
            .count()
    }

    #[test]
    fn monotonic_crossing_fires_once() {
        let readings: heapless::Vec<(u16, Timestamp), 16> = (0..10u16)
            .map(|i| (100 + i * 6, u64::from(i) * 700))
            .collect();
        assert_eq!(count_escalations(&readings), 1);
    }

    #[test]
    fn escalation_carries_the_reading() {
        let mut escalator = HeartRateEscalator::default();
        assert!(escalator.observe(118, 0).unwrap().is_none());

        let escalation = escalator.observe(126, 700).unwrap().unwrap();
        assert_eq!(escalation.kind, EscalationKind::HeartRateCritical);
        assert_eq!(escalation.heart_rate.map(|r| r.bpm()), Some(126));
        assert_eq!(escalation.detected_at, 700);
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(count_escalations(&[(110, 0), (120, 700)]), 0);
    }

    #[test]
    fn oscillation_inside_window_fires_once() {
        let readings = [
            (118, 0),
            (125, 1_000),
            (119, 2_000),
            (124, 3_000),
            (117, 4_000),
            (130, 5_000),
        ];
        assert_eq!(count_escalations(&readings), 1);
    }

    #[test]
    fn sustained_elevation_refires_after_window() {
        let readings = [(130, 0), (131, 5_000), (131, 10_000)];
        assert_eq!(count_escalations(&readings), 2);
    }

    #[test]
    fn falling_reading_does_not_fire() {
        let readings = [(150, 0), (140, 12_000)];
        assert_eq!(count_escalations(&readings), 1);
    }

    #[test]
    fn out_of_range_leaves_state() {
        let mut escalator = HeartRateEscalator::default();
        escalator.observe(90, 0).unwrap();
        let before = escalator.snapshot();

        assert!(escalator.observe(400, 100).is_err());
        assert_eq!(escalator.snapshot(), before);
    }

    #[test]
    fn config_validation() {
        assert!(VitalsConfig::default().validate().is_ok());
        assert!(HeartRateEscalator::with_config(VitalsConfig::default().with_critical_bpm(0)).is_err());
    }
}
