//! Channel entry types
//!
//! This module defines the per-channel state stored in the registry.

use std::time::Duration;

use tokio::time::Instant;

/// Entry for a single live channel in the registry
///
/// The endpoint and heartbeat are always written together; there is no way
/// to hold one without the other.
#[derive(Debug, Clone)]
pub struct ChannelEntry {
    /// Where consumers of this channel are redirected
    pub endpoint: String,

    /// Time of the last register or heartbeat
    pub last_heartbeat: Instant,

    /// When the current registration was made
    pub registered_at: Instant,
}

impl ChannelEntry {
    pub(super) fn new(endpoint: String, now: Instant) -> Self {
        Self {
            endpoint,
            last_heartbeat: now,
            registered_at: now,
        }
    }

    /// Refresh the heartbeat
    pub(super) fn touch(&mut self, now: Instant) {
        self.last_heartbeat = now;
    }

    /// Heartbeat age as seen from `now`
    ///
    /// Saturates to zero when the heartbeat is newer than `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_heartbeat)
    }

    /// Check whether this entry is older than `threshold` as seen from `now`
    pub fn is_expired(&self, now: Instant, threshold: Duration) -> bool {
        self.age(now) > threshold
    }
}

/// Point-in-time view of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Current endpoint
    pub endpoint: String,
    /// Heartbeat age when the view was taken
    pub heartbeat_age: Duration,
    /// Time since the current registration
    pub registered_for: Duration,
}
