//! rtrouter: redirects WHEP consumers to the live endpoint of a channel
//!
//! Configuration comes from flags with environment fallbacks:
//!
//! ```text
//! RTR_KEY=secret RTR_HTTP_PORT=8080 rtrouter
//! rtrouter --key secret --heartbeat-timeout-secs 30
//! ```

use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use rtrouter::{RegistryConfig, RouterServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "rtrouter")]
#[command(about = "Stream redirection registry with heartbeat-based expiry")]
struct Cli {
    /// Key proving the caller is an origin server allowed to register streams
    #[arg(long, env = "RTR_KEY", hide_env_values = true)]
    key: String,

    /// HTTP port to listen on
    #[arg(long, env = "RTR_HTTP_PORT", default_value_t = 8080)]
    port: u16,

    /// Address to bind to
    #[arg(long, env = "RTR_HTTP_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Seconds between expiry sweeps
    #[arg(long, env = "RTR_SWEEP_INTERVAL_SECS", default_value_t = 5)]
    sweep_interval_secs: u64,

    /// Seconds without a heartbeat before a channel is evicted
    #[arg(long, env = "RTR_HEARTBEAT_TIMEOUT_SECS", default_value_t = 15)]
    heartbeat_timeout_secs: u64,

    /// Seconds before an HTTP request is aborted
    #[arg(long, env = "RTR_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::with_addr(SocketAddr::new(self.host, self.port))
            .auth_key(self.key.clone())
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::default()
            .sweep_interval(Duration::from_secs(self.sweep_interval_secs))
            .expiry_threshold(Duration::from_secs(self.heartbeat_timeout_secs))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtrouter=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let server = RouterServer::new(cli.server_config(), cli.registry_config());

    info!(addr = %server.bind_addr(), "Starting rtrouter");

    match server.run_until(shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Router failed");
            ExitCode::FAILURE
        }
    }
}
