//! Stream redirection router
//!
//! Keeps a live map of numeric channel IDs to playback endpoints and
//! redirects WHEP consumers to whichever endpoint currently serves a channel.
//! Origins register a channel, keep it alive with heartbeats, and end it
//! explicitly; channels that stop heartbeating are evicted by a background
//! sweep.
//!
//! # Example
//!
//! ```no_run
//! use rtrouter::{RegistryConfig, RouterServer, ServerConfig};
//!
//! # async fn run() -> rtrouter::Result<()> {
//! let config = ServerConfig::default().auth_key("secretkey");
//! let server = RouterServer::new(config, RegistryConfig::default());
//! server.run().await
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod server;

pub use error::{Error, Result};
pub use registry::{ChannelId, ChannelRegistry, RegistryConfig, RegistryError};
pub use server::{RouterServer, ServerConfig};
