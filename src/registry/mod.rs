//! Channel registry with heartbeat-based expiry
//!
//! The registry maps channel IDs to the endpoint consumers should be
//! redirected to. Each entry carries the time of its last heartbeat; a
//! background sweep evicts entries whose heartbeat is older than the
//! configured threshold.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<ChannelRegistry>
//!                   ┌────────────────────────────┐
//!                   │ channels: RwLock<HashMap<  │
//!                   │   ChannelId,               │
//!                   │   ChannelEntry {           │
//!                   │     endpoint,              │
//!                   │     last_heartbeat,        │
//!                   │   }                        │
//!                   │ >>                         │
//!                   └─────────────┬──────────────┘
//!                                 │
//!        ┌────────────────────────┼────────────────────────┐
//!        │                        │                        │
//!        ▼                        ▼                        ▼
//!  [State handlers]        [WHEP handler]           [Sweep task]
//!  register()              resolve()                sweep_expired()
//!  heartbeat()             (read lock)              (one write-locked
//!  unregister()                                      pass per tick)
//! ```
//!
//! # Consistency
//!
//! Endpoint and heartbeat live in the same [`ChannelEntry`] under a single
//! lock, so a channel can never be observed with one and not the other.

pub mod channel;
pub mod config;
pub mod entry;
pub mod error;
pub mod store;

pub use channel::{ChannelId, ParseChannelIdError};
pub use config::RegistryConfig;
pub use entry::{ChannelEntry, ChannelInfo};
pub use error::RegistryError;
pub use store::ChannelRegistry;
