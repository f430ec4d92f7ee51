use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do when a tick fires while the previous one is still fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the new tick.
    #[default]
    Skip,

    /// Abort the outstanding tick and start the new one.
    Supersede,

    /// Let ticks overlap; the last response to arrive is rendered.
    Allow,
}

impl OverlapPolicy {
    /// Name used in config files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Supersede => "supersede",
            Self::Allow => "allow",
        }
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Interval between ticks in milliseconds.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Overlap handling for slow fetches.
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl PollerConfig {
    /// Tick interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval() -> u64 {
    5000
}
