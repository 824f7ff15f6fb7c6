//! Heart-rate simulators for demos and tests
//!
//! Randomness is always injected, so a seeded generator replays the same
//! crisis every time.

use rand::Rng;

use crate::constants::{
    time::{AMBIENT_HEART_RATE_INTERVAL_MS, COOLDOWN_TICK_INTERVAL_MS, RAMP_TICK_INTERVAL_MS},
    vitals::{
        AMBIENT_MAX_BPM, AMBIENT_MIN_BPM, MAX_HEART_RATE_BPM, RAMP_FALL_MAX_BPM,
        RAMP_FALL_MIN_BPM, RAMP_FLOOR_BPM, RAMP_PEAK_BPM, RAMP_REST_MAX_BPM, RAMP_REST_MIN_BPM,
        RAMP_RISE_MAX_BPM, RAMP_RISE_MIN_BPM,
    },
};

/// Phase that produced a ramp tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampPhase {
    /// Rate climbing toward the peak
    Rising,
    /// Rate recovering toward the floor
    Falling,
    /// Final resting reading
    Settled,
}

/// One simulated reading, `offset_ms` after the ramp started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampTick {
    /// Time since the ramp started
    pub offset_ms: u64,
    /// Simulated reading
    pub bpm: u16,
    /// Phase that produced it
    pub phase: RampPhase,
}

/// Simulated crisis: climb past the critical band, then recover
///
/// Rises 5..=12 BPM every 700 ms until at least 150, falls 5..=14 BPM every
/// 800 ms until at most 80, then emits one resting reading (70..=85) and
/// ends.
#[derive(Debug)]
pub struct CrisisRamp<R> {
    rng: R,
    current: u16,
    offset_ms: u64,
    phase: RampPhase,
    done: bool,
}

impl<R: Rng> CrisisRamp<R> {
    /// Ramp starting from `start_bpm`, capped at the maximum valid rate
    pub fn new(start_bpm: u16, rng: R) -> Self {
        Self {
            rng,
            current: start_bpm.min(MAX_HEART_RATE_BPM),
            offset_ms: 0,
            phase: RampPhase::Rising,
            done: false,
        }
    }

    /// Latest simulated reading
    pub fn current_bpm(&self) -> u16 {
        self.current
    }
}

impl<R: Rng> Iterator for CrisisRamp<R> {
    type Item = RampTick;

    fn next(&mut self) -> Option<RampTick> {
        if self.done {
            return None;
        }

        let phase = match self.phase {
            RampPhase::Rising => {
                self.offset_ms += RAMP_TICK_INTERVAL_MS;
                let rise = self.rng.gen_range(RAMP_RISE_MIN_BPM..=RAMP_RISE_MAX_BPM);
                self.current = self.current.saturating_add(rise).min(MAX_HEART_RATE_BPM);
                if self.current >= RAMP_PEAK_BPM {
                    self.phase = RampPhase::Falling;
                }
                RampPhase::Rising
            }
            RampPhase::Falling | RampPhase::Settled => {
                self.offset_ms += COOLDOWN_TICK_INTERVAL_MS;
                let fall = self.rng.gen_range(RAMP_FALL_MIN_BPM..=RAMP_FALL_MAX_BPM);
                self.current = self.current.saturating_sub(fall);
                if self.current <= RAMP_FLOOR_BPM {
                    self.current = self.rng.gen_range(RAMP_REST_MIN_BPM..=RAMP_REST_MAX_BPM);
                    self.phase = RampPhase::Settled;
                    self.done = true;
                }
                self.phase
            }
        };

        Some(RampTick {
            offset_ms: self.offset_ms,
            bpm: self.current,
            phase,
        })
    }
}

/// Ambient resting reading (60..=95 BPM)
pub fn resting_rate<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.gen_range(AMBIENT_MIN_BPM..=AMBIENT_MAX_BPM)
}

/// Endless resting readings, one every 2 s from `start`
///
/// Yields `(timestamp, bpm)` pairs ready for a heart-rate escalator.
pub fn ambient<R: Rng>(mut rng: R, start: u64) -> impl Iterator<Item = (u64, u16)> {
    (1u64..).map(move |tick| {
        (start + tick * AMBIENT_HEART_RATE_INTERVAL_MS, resting_rate(&mut rng))
    })
}
