//! Monitor configuration
//!
//! All fields are optional in JSON; anything missing takes the default.
//!
//! ```json
//! {
//!   "motion": { "cooldown_ms": 20000 },
//!   "vitals": { "critical_bpm": 130 },
//!   "feed_limit": 50
//! }
//! ```

use careguard_core::{CoreError, CoreResult, MotionConfig, VitalsConfig};
use serde::{Deserialize, Serialize};

use crate::{store::DEFAULT_BROADCAST_CAPACITY, DispatchError, DispatchResult};

/// Events loaded into a caregiver feed
pub const DEFAULT_FEED_LIMIT: usize = 100;

/// Configuration for one patient monitor and its caregivers' feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub motion: MotionConfig,
    pub vitals: VitalsConfig,
    pub feed_limit: usize,
    pub broadcast_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            vitals: VitalsConfig::default(),
            feed_limit: DEFAULT_FEED_LIMIT,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> DispatchResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DispatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> DispatchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DispatchError::Config(e.to_string()))
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_vitals(mut self, vitals: VitalsConfig) -> Self {
        self.vitals = vitals;
        self
    }

    pub fn with_feed_limit(mut self, limit: usize) -> Self {
        self.feed_limit = limit;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.motion.validate()?;
        self.vitals.validate()?;
        if self.feed_limit == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "feed limit must be at least 1",
            });
        }
        if self.broadcast_capacity == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "broadcast capacity must be at least 1",
            });
        }
        Ok(())
    }
}
