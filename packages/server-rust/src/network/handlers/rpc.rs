//! `POST /rpc/<Operation>` handlers.
//!
//! Each handler picks the codec from `Content-Type`, decodes the body into
//! the wire request, builds a `RequestContext` for the call, and hands off to
//! the `MovementTransport`. The response is encoded with the request's codec.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use workout_core::messages as wire;
use workout_core::{CodecError, RequestContext, WireCodec};

use super::AppState;
use crate::endpoint::EndpointError;
use crate::network::middleware::REQUEST_ID_HEADER;
use crate::transport::{MovementTransport, REQUEST_TIMEOUT_HEADER};

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Failures surfaced as HTTP status codes before any envelope exists.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl TransportError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Codec(CodecError::UnsupportedContentType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Codec(CodecError::Decode(_)) => StatusCode::BAD_REQUEST,
            Self::Codec(CodecError::Encode(_) | CodecError::UnknownCodec { .. })
            | Self::Endpoint(EndpointError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Endpoint(EndpointError::Overloaded) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Endpoint(EndpointError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "rpc rejected");
        }
        (status, self.to_string()).into_response()
    }
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Builds the context for one call: a fresh call id, the request id as
/// trace id, and the caller's deadline when one was sent.
fn request_context(state: &AppState, headers: &HeaderMap) -> RequestContext {
    let trace_id = header_str(headers, REQUEST_ID_HEADER)
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), ToString::to_string);
    let ctx = RequestContext::new(state.next_call_id(), trace_id);

    match header_str(headers, REQUEST_TIMEOUT_HEADER).and_then(|ms| ms.parse::<u64>().ok()) {
        Some(ms) => ctx.with_timeout(Duration::from_millis(ms)),
        None => ctx,
    }
}

async fn serve_rpc<Req, Resp, F, Fut>(
    state: AppState,
    headers: HeaderMap,
    body: Bytes,
    call: F,
) -> Result<Response, TransportError>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(Arc<MovementTransport>, RequestContext, Req) -> Fut,
    Fut: Future<Output = Result<Resp, EndpointError>>,
{
    let codec = WireCodec::from_content_type(header_str(&headers, CONTENT_TYPE.as_str()))?;
    let request: Req = codec.decode(&body)?;

    let ctx = request_context(&state, &headers);
    // Dropped with the handler future, so a caller hanging up cancels the call.
    let _cancel = ctx.cancel_on_drop();

    let response = call(Arc::clone(&state.transport), ctx, request).await?;
    let encoded = codec.encode(&response)?;
    Ok(([(CONTENT_TYPE, codec.content_type())], encoded).into_response())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn create_movement_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, TransportError> {
    serve_rpc(
        state,
        headers,
        body,
        |transport, ctx, req: wire::CreateMovementRequest| async move {
            transport.create_movement(ctx, req).await
        },
    )
    .await
}

pub async fn get_movement_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, TransportError> {
    serve_rpc(
        state,
        headers,
        body,
        |transport, ctx, req: wire::GetMovementRequest| async move {
            transport.get_movement(ctx, req).await
        },
    )
    .await
}

pub async fn list_movements_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, TransportError> {
    serve_rpc(
        state,
        headers,
        body,
        |transport, ctx, req: wire::ListMovementsRequest| async move {
            transport.list_movements(ctx, req).await
        },
    )
    .await
}

pub async fn delete_movement_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, TransportError> {
    serve_rpc(
        state,
        headers,
        body,
        |transport, ctx, req: wire::DeleteMovementRequest| async move {
            transport.delete_movement(ctx, req).await
        },
    )
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::network::ShutdownController;
    use crate::test_support::scripted_transport;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(ShutdownController::new()),
            Arc::new(scripted_transport()),
        )
    }

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    async fn body_bytes(resp: Response) -> Bytes {
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[test]
    fn status_mapping() {
        let unsupported = TransportError::from(CodecError::UnsupportedContentType {
            content_type: "text/plain".to_string(),
        });
        assert_eq!(unsupported.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            TransportError::from(CodecError::Decode("eof".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TransportError::from(EndpointError::Overloaded).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TransportError::from(EndpointError::Timeout { timeout_ms: 5 }).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            TransportError::from(EndpointError::Internal("x".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn context_takes_request_id_and_deadline() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-1"));
        headers.insert(REQUEST_TIMEOUT_HEADER, HeaderValue::from_static("1500"));

        let ctx = request_context(&state, &headers);
        assert_eq!(ctx.trace_id, "req-1");
        assert_eq!(ctx.call_id, 1);
        assert!(ctx.deadline().is_some());

        let next = request_context(&state, &HeaderMap::new());
        assert_eq!(next.call_id, 2);
        assert!(!next.trace_id.is_empty());
        assert!(next.deadline().is_none());
    }

    #[test]
    fn oversized_timeout_header_is_accepted() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_TIMEOUT_HEADER,
            HeaderValue::from_static("18446744073709551615"),
        );

        let ctx = request_context(&state, &headers);
        assert_eq!(ctx.check(), Ok(()));
    }

    #[tokio::test]
    async fn json_list_round_trip() {
        let resp = list_movements_handler(
            State(test_state()),
            headers("application/json"),
            Bytes::from_static(b"{}"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            WireCodec::JSON_CONTENT_TYPE
        );

        let decoded: wire::ListMovementsResponse =
            serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(decoded.data.len(), 2);
        assert!(decoded.error.is_empty());
    }

    #[tokio::test]
    async fn msgpack_get_round_trip() {
        let body = WireCodec::MsgPack
            .encode(&wire::GetMovementRequest {
                id: "m-1".to_string(),
            })
            .unwrap();
        let resp = get_movement_handler(
            State(test_state()),
            headers("application/msgpack"),
            Bytes::from(body),
        )
        .await
        .unwrap();

        let decoded: wire::GetMovementResponse = WireCodec::MsgPack
            .decode(&body_bytes(resp).await)
            .unwrap();
        assert_eq!(decoded.data.map(|m| m.name), Some("squat".to_string()));
    }

    #[tokio::test]
    async fn rejects_unsupported_media_type() {
        let err = create_movement_handler(
            State(test_state()),
            headers("text/plain"),
            Bytes::from_static(b"hello"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let err = delete_movement_handler(
            State(test_state()),
            headers("application/json"),
            Bytes::from_static(b"{not json"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
