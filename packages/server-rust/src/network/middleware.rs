//! HTTP middleware for the movement RPC server.
//!
//! [`with_http_layers`] wraps every route; [`track_in_flight`] wraps the RPC
//! routes only, so health probes keep answering while the server drains.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::config::NetworkConfig;
use super::shutdown::ShutdownController;
use crate::transport::REQUEST_TIMEOUT_HEADER;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` in the HTTP-level middleware.
///
/// Outermost first:
/// 1. `SetRequestId` keeps a caller's `x-request-id` or assigns a UUID v4
/// 2. `Trace` opens an `http` span tagged with that id
/// 3. `Compression` gzips responses when the caller accepts it
/// 4. `Cors` from `cors_origins`
/// 5. `Timeout` answers 504 once `request_timeout` elapses
/// 6. `PropagateRequestId` echoes the id on the response
///
/// RPC deadlines and load shedding live in the endpoint pipeline.
pub fn with_http_layers<S>(router: Router<S>, config: &NetworkConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(http_span))
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.cors_origins))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                config.request_timeout,
            ))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}

fn http_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http",
        method = %request.method(),
        path = request.uri().path(),
        request_id,
    )
}

/// `"*"` anywhere in `origins` allows any origin; otherwise only the origins
/// that parse as header values are allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(REQUEST_TIMEOUT_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Admits an RPC only while the server accepts requests, holding an
/// in-flight guard until the response is produced.
///
/// Rejected calls get `503 Service Unavailable`.
pub async fn track_in_flight(
    State(shutdown): State<Arc<ShutdownController>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(_guard) = shutdown.admit() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "server is draining").into_response();
    };
    next.run(request).await
}
