//! Channel registry implementation
//!
//! The central registry that maps live channels to their endpoints and
//! evicts channels whose heartbeats stop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::channel::ChannelId;
use super::config::RegistryConfig;
use super::entry::{ChannelEntry, ChannelInfo};
use super::error::RegistryError;

/// Central registry for all live channels
///
/// Thread-safe via a single `RwLock` over the whole map. Every operation
/// completes without awaiting anything but the lock, so one coarse lock is
/// enough; lookups take the read side and run concurrently.
pub struct ChannelRegistry {
    /// Map of channel ID to channel entry
    channels: RwLock<HashMap<ChannelId, ChannelEntry>>,

    /// Configuration
    config: RegistryConfig,
}

impl ChannelRegistry {
    /// Create a new channel registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new channel registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a channel
    ///
    /// Inserts or replaces the entry for `id` and starts its heartbeat clock
    /// from now. Re-registering a live channel swaps its endpoint and resets
    /// the timer.
    pub async fn register(&self, id: ChannelId, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        let mut channels = self.channels.write().await;
        let now = Instant::now();

        match channels.insert(id, ChannelEntry::new(endpoint.clone(), now)) {
            Some(previous) if previous.endpoint != endpoint => {
                tracing::info!(
                    channel = %id,
                    endpoint = %endpoint,
                    previous = %previous.endpoint,
                    "Channel re-registered with new endpoint"
                );
            }
            Some(_) => {
                tracing::debug!(channel = %id, "Channel re-registered");
            }
            None => {
                tracing::info!(channel = %id, endpoint = %endpoint, "Channel registered");
            }
        }
    }

    /// Unregister a channel
    ///
    /// Returns `true` if a live entry was removed. Unregistering an absent
    /// channel is a no-op.
    pub async fn unregister(&self, id: ChannelId) -> bool {
        let removed = self.channels.write().await.remove(&id);

        match removed {
            Some(entry) => {
                tracing::info!(
                    channel = %id,
                    endpoint = %entry.endpoint,
                    "Channel unregistered"
                );
                true
            }
            None => {
                tracing::debug!(channel = %id, "Unregister for unknown channel");
                false
            }
        }
    }

    /// Resolve a channel to its current endpoint
    pub async fn resolve(&self, id: ChannelId) -> Result<String, RegistryError> {
        let channels = self.channels.read().await;

        channels
            .get(&id)
            .map(|entry| entry.endpoint.clone())
            .ok_or(RegistryError::ChannelNotFound(id))
    }

    /// Refresh the heartbeat of a live channel
    ///
    /// A heartbeat never creates a channel; it fails with
    /// [`RegistryError::ChannelNotFound`] if `id` is not registered.
    pub async fn heartbeat(&self, id: ChannelId) -> Result<(), RegistryError> {
        let mut channels = self.channels.write().await;

        let entry = channels
            .get_mut(&id)
            .ok_or(RegistryError::ChannelNotFound(id))?;
        entry.touch(Instant::now());

        tracing::trace!(channel = %id, "Heartbeat");
        Ok(())
    }

    /// Evict every channel whose heartbeat is older than `threshold` at `now`
    ///
    /// The whole pass runs under one write lock and judges every entry
    /// against the same `now`. A heartbeat that landed after `now` was taken
    /// counts as age zero and is kept. Returns the evicted IDs in ascending
    /// order.
    pub async fn sweep_expired(&self, now: Instant, threshold: Duration) -> Vec<ChannelId> {
        let mut channels = self.channels.write().await;

        let mut evicted: Vec<ChannelId> = channels
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, threshold))
            .map(|(id, _)| *id)
            .collect();

        for id in &evicted {
            if let Some(entry) = channels.remove(id) {
                tracing::debug!(
                    channel = %id,
                    endpoint = %entry.endpoint,
                    age_ms = entry.age(now).as_millis() as u64,
                    "Channel expired"
                );
            }
        }

        evicted.sort_unstable();
        evicted
    }

    /// Check if a channel is live
    pub async fn contains(&self, id: ChannelId) -> bool {
        self.channels.read().await.contains_key(&id)
    }

    /// Get the last heartbeat time of a live channel
    pub async fn last_heartbeat(&self, id: ChannelId) -> Option<Instant> {
        self.channels
            .read()
            .await
            .get(&id)
            .map(|entry| entry.last_heartbeat)
    }

    /// Get a snapshot of a live channel
    pub async fn channel_info(&self, id: ChannelId) -> Option<ChannelInfo> {
        let channels = self.channels.read().await;
        let now = Instant::now();

        channels.get(&id).map(|entry| ChannelInfo {
            endpoint: entry.endpoint.clone(),
            heartbeat_age: entry.age(now),
            registered_for: now.saturating_duration_since(entry.registered_at),
        })
    }

    /// Get total number of live channels
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Spawn background sweep task
    ///
    /// Every `sweep_interval` the task takes one timestamp and evicts all
    /// channels older than `expiry_threshold` relative to it. Returns a
    /// handle that can be used to abort the task.
    pub fn spawn_sweep_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        // The ticker panics on a zero period
        let interval = registry.config.sweep_interval.max(Duration::from_millis(1));
        let threshold = registry.config.expiry_threshold;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let evicted = registry.sweep_expired(Instant::now(), threshold).await;

                if !evicted.is_empty() {
                    tracing::info!(
                        count = evicted.len(),
                        channels = ?evicted,
                        threshold_secs = threshold.as_secs_f64(),
                        "Evicted channels with stale heartbeats"
                    );
                }
            }
        })
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
