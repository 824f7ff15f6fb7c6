//! Cooldown gate shared by escalation paths
//!
//! A gate closes when an escalation passes through it and reopens once its
//! window has elapsed. Every path that can raise the same escalation kind
//! for a subject must go through the same gate; that is what guarantees at
//! most one escalation per window even when two detectors agree on the same
//! sample.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::{elapsed_ms, Timestamp};

/// One-shot gate with a fixed cooldown window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CooldownGate {
    window_ms: u64,
    closed_at: Option<Timestamp>,
}

impl CooldownGate {
    /// Open gate that closes for `window_ms` after each pass
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            closed_at: None,
        }
    }

    /// True while a previous escalation's window is still running
    pub fn is_cooling(&self, now: Timestamp) -> bool {
        match self.closed_at {
            Some(at) => elapsed_ms(at, now) < self.window_ms,
            None => false,
        }
    }

    /// Milliseconds until the gate reopens
    pub fn remaining_ms(&self, now: Timestamp) -> u64 {
        match self.closed_at {
            Some(at) => self.window_ms.saturating_sub(elapsed_ms(at, now)),
            None => 0,
        }
    }

    /// Pass through the gate if it is open, closing it behind
    ///
    /// Returns `false` (and leaves the running window untouched) when the
    /// gate is still cooling.
    pub fn try_pass(&mut self, now: Timestamp) -> bool {
        if self.is_cooling(now) {
            return false;
        }
        self.closed_at = Some(now);
        true
    }

    /// Reopen immediately
    pub fn reset(&mut self) {
        self.closed_at = None;
    }

    /// Length of the suppression window
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_once_per_window() {
        let mut gate = CooldownGate::new(15_000);

        assert!(gate.try_pass(1_000));
        assert!(!gate.try_pass(1_000));
        assert!(!gate.try_pass(15_999));
        assert_eq!(gate.remaining_ms(10_000), 6_000);

        assert!(gate.try_pass(16_000));
        assert!(gate.is_cooling(16_001));
    }

    #[test]
    fn suppressed_pass_does_not_extend_window() {
        let mut gate = CooldownGate::new(10_000);
        assert!(gate.try_pass(0));
        assert!(!gate.try_pass(9_000));
        assert!(gate.try_pass(10_000));
    }

    #[test]
    fn reset_reopens() {
        let mut gate = CooldownGate::new(10_000);
        gate.try_pass(0);
        gate.reset();
        assert!(!gate.is_cooling(1));
        assert_eq!(gate.remaining_ms(1), 0);
    }
}
