//! Time management for detectors
//!
//! Detectors never read a clock themselves. Every `observe` call carries the
//! timestamp of the sample, which keeps transitions pure and lets tests drive
//! time explicitly. Clock sources only matter at the edges, where the
//! monitor stamps inbound readings and outbound events:
//! - System clock (wall time, std only)
//! - Mock clock shared between a test and the component under test

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource: Send {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Milliseconds between two timestamps, zero if the clock went backwards
#[inline]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Controllable clock that can be advanced through a shared reference
///
/// Wrap it in an `Arc` to hand one copy to a monitor and keep another in
/// the test driving it.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct MockTimeSource {
    now: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "std")]
impl MockTimeSource {
    /// Clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: std::sync::atomic::AtomicU64::new(start),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.now.store(timestamp, std::sync::atomic::Ordering::SeqCst);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(feature = "std")]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "std")]
impl<T: TimeSource + Sync + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_on_backwards_clock() {
        assert_eq!(elapsed_ms(1000, 1500), 500);
        assert_eq!(elapsed_ms(1500, 1000), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn mock_time_shared_through_arc() {
        let clock = std::sync::Arc::new(MockTimeSource::new(0));
        let handle = clock.clone();

        handle.advance(250);
        assert_eq!(clock.now(), 250);

        handle.set(10_000);
        assert_eq!(TimeSource::now(&clock), 10_000);
    }
}
