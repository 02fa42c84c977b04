//! Movement RPC server.
//!
//! Serves the movement RPCs over HTTP until Ctrl-C, then drains in-flight
//! requests and exits.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use workout_server::endpoint::MovementSet;
use workout_server::logging::{self, Environment};
use workout_server::network::{NetworkConfig, NetworkModule, TlsConfig, DEFAULT_PORT};
use workout_server::service::{new_movement_service, ServerConfig};
use workout_server::storage::InMemoryMovementStore;
use workout_server::transport::MovementTransport;

#[derive(Debug, Parser)]
#[command(name = "workout-server")]
#[command(about = "Workout manager movement RPC server")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "WORKOUT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 picks a free port).
    #[arg(long, env = "WORKOUT_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Deployment environment: local, dev, qa, uat or prod.
    #[arg(long, env = "WORKOUT_ENV", default_value = "local")]
    env: Environment,

    /// Deadline applied to RPCs whose caller sets none, in milliseconds.
    #[arg(long, env = "WORKOUT_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    request_timeout_ms: u64,

    /// RPCs allowed to run at once before new ones are shed.
    #[arg(long, env = "WORKOUT_MAX_CONCURRENT_REQUESTS", default_value_t = 1000)]
    max_concurrent_requests: u32,

    /// Serve Prometheus metrics on this address.
    #[arg(long, env = "WORKOUT_METRICS_ADDR")]
    metrics_addr: Option<SocketAddr>,

    /// PEM certificate; enables TLS together with `--tls-key`.
    #[arg(long, env = "WORKOUT_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    #[arg(long, env = "WORKOUT_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

impl Args {
    fn network_config(&self) -> NetworkConfig {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            // The HTTP cap must never undercut the RPC deadline.
            request_timeout: Duration::from_millis(self.request_timeout_ms)
                .max(NetworkConfig::default().request_timeout),
            ..NetworkConfig::default()
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            node_id: format!("{}:{}", self.host, self.port),
            default_request_timeout_ms: self.request_timeout_ms,
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C, shutting down");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.env);

    if let Some(addr) = args.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        info!(%addr, "Prometheus metrics exporter listening");
    }

    let server_config = args.server_config();
    let service = new_movement_service(Arc::new(InMemoryMovementStore::new()));
    let transport = MovementTransport::new(MovementSet::new(service, &server_config));

    let mut network = NetworkModule::new(args.network_config(), transport);
    let port = network.start().await?;
    info!(
        env = %args.env,
        node_id = %server_config.node_id,
        port,
        "workout server started"
    );

    network.serve(shutdown_signal()).await?;
    info!("workout server stopped");
    Ok(())
}
