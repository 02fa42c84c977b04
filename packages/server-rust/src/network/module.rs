//! HTTP server lifecycle for the movement RPCs.
//!
//! Binding (`start`) is separate from serving (`serve`) so a caller using
//! port 0 can read the real port before the first request arrives.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    create_movement_handler, delete_movement_handler, get_movement_handler, health_handler,
    list_movements_handler, liveness_handler, readiness_handler, AppState,
};
use super::middleware::{track_in_flight, with_http_layers};
use super::shutdown::ShutdownController;
use crate::transport::{
    MovementTransport, CREATE_MOVEMENT_PATH, DELETE_MOVEMENT_PATH, GET_MOVEMENT_PATH,
    LIST_MOVEMENTS_PATH,
};

/// Owns the HTTP server lifecycle for the movement RPCs.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
    transport: Arc<MovementTransport>,
}

impl NetworkModule {
    /// Nothing is bound until `start()`.
    #[must_use]
    pub fn new(config: NetworkConfig, transport: MovementTransport) -> Self {
        Self {
            config,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
            transport: Arc::new(transport),
        }
    }

    /// Handle for health checks and for triggering a drain from outside.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Health and RPC routes under the HTTP middleware.
    ///
    /// Routes:
    /// - `GET /health` -- state, in-flight count, uptime
    /// - `GET /health/live` -- liveness probe
    /// - `GET /health/ready` -- readiness probe
    /// - `POST /rpc/{CreateMovement,GetMovement,ListMovements,DeleteMovement}`
    ///
    /// Only the RPC routes are gated on the shutdown state.
    pub fn build_router(&self) -> Router {
        let state = AppState::new(Arc::clone(&self.shutdown), Arc::clone(&self.transport));

        let rpc = Router::new()
            .route(CREATE_MOVEMENT_PATH, post(create_movement_handler))
            .route(GET_MOVEMENT_PATH, post(get_movement_handler))
            .route(LIST_MOVEMENTS_PATH, post(list_movements_handler))
            .route(DELETE_MOVEMENT_PATH, post(delete_movement_handler))
            .route_layer(axum::middleware::from_fn_with_state(
                Arc::clone(&self.shutdown),
                track_in_flight,
            ));

        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .merge(rpc);

        with_http_layers(routes, &self.config).with_state(state)
    }

    /// Binds `host:port` and keeps the listener for `serve()`.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Fails when the address is unavailable or already in use.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves RPCs until `shutdown` resolves, then drains.
    ///
    /// On the shutdown signal the controller moves to Draining, so readiness
    /// fails and new RPCs get 503. In-flight RPCs get up to `drain_timeout`
    /// to finish before remaining connections are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a fatal I/O error or the
    /// TLS material cannot be loaded.
    ///
    /// # Panics
    ///
    /// Panics when called without a prior `start()`.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .take()
            .expect("start() must be called before serve()");
        let shutdown_ctrl = self.shutdown;
        let config = self.config;

        // Flip to Draining as soon as the caller asks us to stop.
        let signal = {
            let ctrl = Arc::clone(&shutdown_ctrl);
            async move {
                shutdown.await;
                info!("shutdown requested, draining");
                ctrl.begin_drain();
            }
        };

        shutdown_ctrl.set_ready();

        if let Some(ref tls_config) = config.tls {
            serve_tls(listener, router, tls_config, &config, signal).await?;
        } else {
            serve_plain(listener, router, &shutdown_ctrl, &config, signal).await?;
        }

        drain(&shutdown_ctrl, &config).await;
        Ok(())
    }
}

/// Serves plain HTTP using axum's built-in server.
///
/// axum's graceful shutdown waits for every open connection, so the wait is
/// capped at `drain_timeout` once the signal has fired.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown_ctrl: &ShutdownController,
    config: &NetworkConfig,
    signal: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP");

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .into_future();
    let drain_deadline = async {
        shutdown_ctrl.draining().await;
        tokio::time::sleep(config.drain_timeout).await;
    };

    tokio::select! {
        result = server => result?,
        () = drain_deadline => warn!("drain timeout expired, closing remaining connections"),
    }
    Ok(())
}

/// Serves TLS using `axum-server` with rustls.
///
/// Reuses the pre-bound TCP listener by converting it to a `std::net::TcpListener`.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &TlsConfig,
    config: &NetworkConfig,
    signal: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|err| anyhow::anyhow!("loading TLS material: {err}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    let drain_timeout = config.drain_timeout;

    tokio::spawn(async move {
        signal.await;
        shutdown_handle.graceful_shutdown(Some(drain_timeout));
    });

    info!(%addr, "Serving TLS");

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

/// Marks the controller as draining and waits for in-flight RPCs.
async fn drain(shutdown_ctrl: &ShutdownController, config: &NetworkConfig) {
    shutdown_ctrl.begin_drain();

    let in_flight = shutdown_ctrl.in_flight_count();
    if in_flight > 0 {
        info!(in_flight, "waiting for in-flight requests");
    }

    if shutdown_ctrl.wait_for_drain(config.drain_timeout).await {
        info!("All requests drained");
    } else {
        warn!(
            in_flight = shutdown_ctrl.in_flight_count(),
            "Drain timeout expired with in-flight requests remaining"
        );
    }
}
