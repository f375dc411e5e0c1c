//! Registry configuration

use std::time::Duration;

/// Configuration for the channel registry and its sweep task
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How often the background sweep runs
    pub sweep_interval: Duration,

    /// Maximum heartbeat age before a channel is evicted
    pub expiry_threshold: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(5),
            expiry_threshold: Duration::from_secs(15),
        }
    }
}

impl RegistryConfig {
    /// Set the sweep interval
    ///
    /// A zero interval is bumped to one millisecond since the sweep ticker
    /// cannot run with a zero period.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the heartbeat expiry threshold
    pub fn expiry_threshold(mut self, threshold: Duration) -> Self {
        self.expiry_threshold = threshold;
        self
    }
}
