//! HTTP server
//!
//! Exposes the channel registry over HTTP:
//! - WHEP consumers are redirected to a channel's current endpoint
//! - Origins register, heartbeat, and end channels through the state routes

pub mod config;
pub mod error;
pub mod listener;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use listener::RouterServer;
pub use routes::{router, AppState};
