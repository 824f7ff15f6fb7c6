//! Shake counting window

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::{elapsed_ms, Timestamp};

/// Counted shakes in the current window
///
/// The window is restarted on every counted shake, so three shakes
/// trigger as long as no two consecutive ones are more than a window apart.
/// `window_started_at` survives a reset: it is also the debounce reference
/// for the next shake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShakeCounter {
    count: u8,
    window_started_at: Option<Timestamp>,
}

impl ShakeCounter {
    /// Empty counter
    pub const fn new() -> Self {
        Self {
            count: 0,
            window_started_at: None,
        }
    }

    /// Shakes counted in the current window
    pub const fn count(&self) -> u8 {
        self.count
    }

    /// When the current window opened
    pub const fn window_started_at(&self) -> Option<Timestamp> {
        self.window_started_at
    }

    /// Enough time has passed since the last counted shake
    pub fn is_debounced(&self, now: Timestamp, debounce_ms: u64) -> bool {
        match self.window_started_at {
            Some(last) => elapsed_ms(last, now) >= debounce_ms,
            None => true,
        }
    }

    /// Window ran out with shakes still pending
    pub fn is_expired(&self, now: Timestamp, window_ms: u64) -> bool {
        match self.window_started_at {
            Some(started) if self.count > 0 => elapsed_ms(started, now) >= window_ms,
            _ => false,
        }
    }

    /// Count one shake and restart the window
    pub fn record(&mut self, now: Timestamp) -> u8 {
        self.count = self.count.saturating_add(1);
        self.window_started_at = Some(now);
        self.count
    }

    /// Clear the count and window, keeping the debounce reference
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
