//! Registry error types
//!
//! Error types for channel registry operations.

use super::channel::ChannelId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Channel has no live entry (never registered, ended, or expired)
    ChannelNotFound(ChannelId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::ChannelNotFound(id) => write!(f, "Channel not found: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}
