//! HTTP client for the movement RPC binding.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use workout_core::messages::{
    CreateMovementRequest, CreateMovementResponse, DeleteMovementRequest, DeleteMovementResponse,
    GetMovementRequest, GetMovementResponse, ListMovementsRequest, ListMovementsResponse,
};
use workout_core::{CodecError, WireCodec};

use super::{
    CREATE_MOVEMENT_PATH, DELETE_MOVEMENT_PATH, GET_MOVEMENT_PATH, LIST_MOVEMENTS_PATH,
    REQUEST_TIMEOUT_HEADER,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Calls the four movement RPCs over HTTP.
///
/// Business failures come back inside the response's `error` field; only
/// transport-level failures (non-2xx status, I/O, undecodable body) surface
/// as `ClientError`.
#[derive(Debug, Clone)]
pub struct MovementClient {
    http: reqwest::Client,
    base_url: String,
    codec: WireCodec,
    timeout: Option<Duration>,
}

impl MovementClient {
    /// Creates a JSON client for the server at `base_url` (e.g. `http://127.0.0.1:8070`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            codec: WireCodec::Json,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: WireCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Asks the server to give up on each call after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn codec(&self) -> WireCodec {
        self.codec
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn create_movement(
        &self,
        req: &CreateMovementRequest,
    ) -> Result<CreateMovementResponse, ClientError> {
        self.call(CREATE_MOVEMENT_PATH, req).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_movement(
        &self,
        req: &GetMovementRequest,
    ) -> Result<GetMovementResponse, ClientError> {
        self.call(GET_MOVEMENT_PATH, req).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_movements(
        &self,
        req: &ListMovementsRequest,
    ) -> Result<ListMovementsResponse, ClientError> {
        self.call(LIST_MOVEMENTS_PATH, req).await
    }

    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn delete_movement(
        &self,
        req: &DeleteMovementRequest,
    ) -> Result<DeleteMovementResponse, ClientError> {
        self.call(DELETE_MOVEMENT_PATH, req).await
    }

    async fn call<Req, Resp>(&self, path: &str, req: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = self.codec.encode(req)?;
        let mut builder = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header(CONTENT_TYPE, self.codec.content_type())
            .header(ACCEPT, self.codec.content_type())
            .body(body);
        if let Some(timeout) = self.timeout {
            builder = builder.header(REQUEST_TIMEOUT_HEADER, timeout.as_millis().to_string());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(self.codec.decode(&bytes)?)
    }
}
