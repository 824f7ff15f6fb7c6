//! Fall classifier: free-fall/impact and shake detection behind one gate

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::motion::{
        FALL_COOLDOWN_MS, FREE_FALL_THRESHOLD_G, FREE_FALL_WINDOW_MS, GFORCE_HISTORY_LEN,
        IMPACT_THRESHOLD_G, SETTLE_BAND_MAX_G, SETTLE_BAND_MIN_G, SHAKE_COUNT_TRIGGER,
        SHAKE_DEBOUNCE_MS, SHAKE_THRESHOLD_G, SHAKE_WINDOW_MS,
    },
    errors::{CoreError, CoreResult},
    events::{Escalation, EscalationKind},
    gate::CooldownGate,
    time::{elapsed_ms, Timestamp},
};

use super::{AccelSample, GForce, MotionState, ShakeCounter};

/// Thresholds and windows for both fall detectors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Enter free fall below this (g)
    pub free_fall_threshold_g: f32,
    /// Impact that confirms a fall after free fall (g)
    pub impact_threshold_g: f32,
    /// Maximum free-fall-to-impact interval (ms)
    pub free_fall_window_ms: u64,
    /// Single-shake threshold (g)
    pub shake_threshold_g: f32,
    /// Shakes needed to raise a fall
    pub shake_count_trigger: u8,
    /// Shake window, restarted per counted shake (ms)
    pub shake_window_ms: u64,
    /// Minimum spacing between counted shakes (ms)
    pub shake_debounce_ms: u64,
    /// Suppression window after a fall (ms)
    pub cooldown_ms: u64,
    /// Resting band used to return to `Monitoring` (g)
    pub settle_band_g: (f32, f32),
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            free_fall_threshold_g: FREE_FALL_THRESHOLD_G,
            impact_threshold_g: IMPACT_THRESHOLD_G,
            free_fall_window_ms: FREE_FALL_WINDOW_MS,
            shake_threshold_g: SHAKE_THRESHOLD_G,
            shake_count_trigger: SHAKE_COUNT_TRIGGER,
            shake_window_ms: SHAKE_WINDOW_MS,
            shake_debounce_ms: SHAKE_DEBOUNCE_MS,
            cooldown_ms: FALL_COOLDOWN_MS,
            settle_band_g: (SETTLE_BAND_MIN_G, SETTLE_BAND_MAX_G),
        }
    }
}

impl MotionConfig {
    /// Set the fall cooldown window
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Set the shake threshold and required count
    pub fn with_shake(mut self, threshold_g: f32, count: u8) -> Self {
        self.shake_threshold_g = threshold_g;
        self.shake_count_trigger = count;
        self
    }

    /// Check the thresholds describe a usable detector
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.free_fall_threshold_g < self.settle_band_g.0
            && self.settle_band_g.0 <= self.settle_band_g.1
            && self.settle_band_g.1 < self.shake_threshold_g
            && self.settle_band_g.1 < self.impact_threshold_g)
        {
            return Err(CoreError::InvalidConfig {
                reason: "thresholds must satisfy free-fall < settle band < shake, impact",
            });
        }
        if self.shake_count_trigger == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "shake count trigger must be at least 1",
            });
        }
        if self.free_fall_window_ms == 0 || self.shake_window_ms == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "detection windows must be non-zero",
            });
        }
        Ok(())
    }

    fn is_settled(&self, g: f32) -> bool {
        g >= self.settle_band_g.0 && g <= self.settle_band_g.1
    }
}

/// Complete classifier state, owned by one subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierState {
    state: MotionState,
    free_fall_since: Option<Timestamp>,
    shake: ShakeCounter,
    gate: CooldownGate,
}

impl ClassifierState {
    /// Idle state with a gate of `cooldown_ms`
    pub const fn new(cooldown_ms: u64) -> Self {
        Self {
            state: MotionState::Monitoring,
            free_fall_since: None,
            shake: ShakeCounter::new(),
            gate: CooldownGate::new(cooldown_ms),
        }
    }

    /// State shown to the user
    pub const fn motion_state(&self) -> MotionState {
        self.state
    }

    /// Start of the pending free fall, if any
    pub const fn free_fall_since(&self) -> Option<Timestamp> {
        self.free_fall_since
    }

    /// Shake accumulation
    pub const fn shake(&self) -> &ShakeCounter {
        &self.shake
    }

    /// Gate shared by impact and shake falls
    pub const fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    /// Raise a fall through the shared gate
    ///
    /// State updates made before calling this stay in place whether or not
    /// the gate lets the escalation through.
    fn fire(&mut self, now: Timestamp) -> Option<Escalation> {
        if self.gate.try_pass(now) {
            self.state = MotionState::FallConfirmed;
            Some(Escalation::new(EscalationKind::FallDetected, now))
        } else {
            log_trace!(
                "fall suppressed at {}: cooldown {} ms remaining",
                now,
                self.gate.remaining_ms(now)
            );
            self.state = MotionState::CoolingDown;
            None
        }
    }

    fn display_state(&self, config: &MotionConfig, g: f32, now: Timestamp) -> MotionState {
        if self.free_fall_since.is_some() {
            return MotionState::FreeFall;
        }
        if self.shake.count() > 0 {
            return MotionState::ShakeAccumulating;
        }
        if self.gate.is_cooling(now) {
            return MotionState::CoolingDown;
        }
        if config.is_settled(g) {
            return MotionState::Monitoring;
        }
        match self.state {
            // unsettled after a fall with no cooldown window
            MotionState::FallConfirmed => MotionState::FallConfirmed,
            // the sequence or cooldown that put us here has ended
            _ => MotionState::Monitoring,
        }
    }
}

/// Drop a stale free fall and an expired shake window
pub fn expire(config: &MotionConfig, mut state: ClassifierState, now: Timestamp) -> ClassifierState {
    if let Some(since) = state.free_fall_since {
        if elapsed_ms(since, now) > config.free_fall_window_ms {
            log_debug!("free fall at {} ended without impact", since);
            state.free_fall_since = None;
        }
    }

    if state.shake.is_expired(now, config.shake_window_ms) {
        log_debug!("shake window expired with {} shakes", state.shake.count());
        state.shake.reset();
    }

    state
}

/// Pure transition: `(state, g, now) -> (state', escalation)`
pub fn step(
    config: &MotionConfig,
    state: ClassifierState,
    g: GForce,
    now: Timestamp,
) -> (ClassifierState, Option<Escalation>) {
    let mut next = expire(config, state, now);
    let g = g.value();

    // free fall -> impact
    if next.free_fall_since.is_none() && g < config.free_fall_threshold_g {
        next.free_fall_since = Some(now);
    }

    if let Some(since) = next.free_fall_since {
        if g > config.impact_threshold_g && elapsed_ms(since, now) < config.free_fall_window_ms {
            next.free_fall_since = None;
            let escalation = next.fire(now);
            return (next, escalation);
        }
    }

    // shake counting
    if g > config.shake_threshold_g && next.shake.is_debounced(now, config.shake_debounce_ms) {
        let count = next.shake.record(now);
        if count >= config.shake_count_trigger {
            next.shake.reset();
            next.free_fall_since = None;
            let escalation = next.fire(now);
            return (next, escalation);
        }
    }

    next.state = next.display_state(config, g, now);
    (next, None)
}

/// Snapshot for display
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionReadout {
    /// Display state
    pub state: MotionState,
    /// Latest g-force
    pub g: GForce,
    /// Highest g-force since the last peak reset
    pub peak_g: GForce,
    /// Shakes counted in the current window
    pub shake_count: u8,
    /// Time until falls can fire again
    pub cooldown_remaining_ms: u64,
}

/// Fall classifier for one subject
///
/// ```rust
/// use careguard_core::{AccelSample, MotionClassifier, MotionState};
///
/// let mut classifier = MotionClassifier::default();
/// let escalation = classifier.observe(AccelSample::new(0.0, 0.0, 9.8), 0)?;
///
/// assert!(escalation.is_none());
/// assert_eq!(classifier.state(), MotionState::Monitoring);
/// # Ok::<(), careguard_core::CoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotionClassifier {
    config: MotionConfig,
    state: ClassifierState,
    history: heapless::Deque<GForce, GFORCE_HISTORY_LEN>,
    last_g: GForce,
    peak_g: GForce,
    last_seen: Timestamp,
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::build(MotionConfig::default())
    }
}

impl MotionClassifier {
    /// Create a classifier with custom thresholds
    pub fn with_config(config: MotionConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MotionConfig) -> Self {
        Self {
            state: ClassifierState::new(config.cooldown_ms),
            config,
            history: heapless::Deque::new(),
            last_g: GForce::ONE,
            peak_g: GForce::ONE,
            last_seen: 0,
        }
    }

    /// Process one sample to completion
    ///
    /// Non-finite samples are rejected without touching any state.
    pub fn observe(&mut self, sample: AccelSample, now: Timestamp) -> CoreResult<Option<Escalation>> {
        let g = GForce::from_sample(&sample)?;

        if self.history.is_full() {
            self.history.pop_front();
        }
        // cannot fail after the pop above
        let _ = self.history.push_back(g);
        self.last_g = g;
        if g > self.peak_g {
            self.peak_g = g;
        }
        self.last_seen = now;

        let (next, escalation) = step(&self.config, self.state, g, now);
        if next.motion_state() != self.state.motion_state() {
            log_debug!(
                "motion state {} -> {} at {} ({})",
                self.state.motion_state(),
                next.motion_state(),
                now,
                g
            );
        }
        self.state = next;

        Ok(escalation)
    }

    /// Expire timers without a new sample
    ///
    /// Sensors may go quiet mid-sequence; this lets the display state catch
    /// up. Never raises an escalation.
    pub fn poll(&mut self, now: Timestamp) -> MotionState {
        let mut next = expire(&self.config, self.state, now);
        next.state = next.display_state(&self.config, self.last_g.value(), now);
        self.state = next;
        self.state.motion_state()
    }

    /// Display state after the last sample or poll
    pub fn state(&self) -> MotionState {
        self.state.motion_state()
    }

    /// Full reducer state, e.g. for persistence or replay
    pub fn snapshot(&self) -> ClassifierState {
        self.state
    }

    /// Thresholds in use
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Recent g-force values, oldest first
    pub fn history(&self) -> impl Iterator<Item = &GForce> {
        self.history.iter()
    }

    /// Display snapshot as of the last sample
    pub fn readout(&self) -> MotionReadout {
        MotionReadout {
            state: self.state.motion_state(),
            g: self.last_g,
            peak_g: self.peak_g,
            shake_count: self.state.shake.count(),
            cooldown_remaining_ms: self.state.gate.remaining_ms(self.last_seen),
        }
    }

    /// Restart peak tracking from the latest reading
    pub fn reset_peak(&mut self) {
        self.peak_g = self.last_g;
    }
}
