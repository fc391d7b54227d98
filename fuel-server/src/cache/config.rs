//! Configuration for the price cache.

use std::time::Duration;

/// Default time between refreshes (30 minutes).
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// What to do when the startup bulk load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Log the failure and serve an empty cache until a refresh succeeds.
    #[default]
    ServeEmpty,

    /// Return the error so the process can exit.
    FailFast,
}

/// Configuration for the price cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Minimum time between incremental refreshes.
    pub refresh_interval: Duration,

    /// Behaviour when the initial full load fails.
    pub startup_policy: StartupPolicy,
}

impl CacheConfig {
    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the startup policy.
    pub fn with_startup_policy(mut self, policy: StartupPolicy) -> Self {
        self.startup_policy = policy;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            startup_policy: StartupPolicy::default(),
        }
    }
}
