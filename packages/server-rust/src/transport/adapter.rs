//! Translation between wire messages and typed endpoint calls.
//!
//! The adapter only ever talks to endpoints. Decoding is total: any
//! well-formed wire request maps to a typed request, with absent fields
//! already defaulted to empty by the message schema. Encoding renders a
//! service failure as a non-empty `error` string and never drops it.

use tower::ServiceExt;
use workout_core::messages::{self as wire, MovementMessage};
use workout_core::{Movement, MovementId, RequestContext};

use crate::endpoint::{
    CreateMovementRequest, CreateMovementResponse, DeleteMovementRequest, DeleteMovementResponse,
    Endpoint, EndpointError, GetMovementRequest, GetMovementResponse, Invocation,
    ListMovementsRequest, ListMovementsResponse, MovementSet,
};
use crate::service::MovementError;

// ---------------------------------------------------------------------------
// RpcServer
// ---------------------------------------------------------------------------

/// One endpoint bound to its wire decode and encode functions.
pub struct RpcServer<Req, Resp, WireReq, WireResp> {
    endpoint: Endpoint<Req, Resp>,
    decode: fn(WireReq) -> Req,
    encode: fn(Resp) -> WireResp,
}

impl<Req, Resp, WireReq, WireResp> Clone for RpcServer<Req, Resp, WireReq, WireResp> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            decode: self.decode,
            encode: self.encode,
        }
    }
}

impl<Req, Resp, WireReq, WireResp> RpcServer<Req, Resp, WireReq, WireResp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    #[must_use]
    pub fn new(
        endpoint: Endpoint<Req, Resp>,
        decode: fn(WireReq) -> Req,
        encode: fn(Resp) -> WireResp,
    ) -> Self {
        Self {
            endpoint,
            decode,
            encode,
        }
    }

    /// Decodes `wire`, runs the endpoint, and encodes its response.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's own error (overload, timeout) unchanged. No
    /// retry is attempted.
    pub async fn serve(&self, ctx: RequestContext, wire: WireReq) -> Result<WireResp, EndpointError> {
        let request = (self.decode)(wire);
        let response = self
            .endpoint
            .clone()
            .oneshot(Invocation::new(ctx, request))
            .await?;
        Ok((self.encode)(response))
    }
}

// ---------------------------------------------------------------------------
// MovementTransport
// ---------------------------------------------------------------------------

/// The four movement operations exposed over wire messages.
#[derive(Clone)]
pub struct MovementTransport {
    create: RpcServer<
        CreateMovementRequest,
        CreateMovementResponse,
        wire::CreateMovementRequest,
        wire::CreateMovementResponse,
    >,
    get: RpcServer<
        GetMovementRequest,
        GetMovementResponse,
        wire::GetMovementRequest,
        wire::GetMovementResponse,
    >,
    list: RpcServer<
        ListMovementsRequest,
        ListMovementsResponse,
        wire::ListMovementsRequest,
        wire::ListMovementsResponse,
    >,
    delete: RpcServer<
        DeleteMovementRequest,
        DeleteMovementResponse,
        wire::DeleteMovementRequest,
        wire::DeleteMovementResponse,
    >,
}

impl MovementTransport {
    #[must_use]
    pub fn new(endpoints: MovementSet) -> Self {
        let MovementSet {
            create,
            get,
            list,
            delete,
        } = endpoints;
        Self {
            create: RpcServer::new(create, decode_create_request, encode_create_response),
            get: RpcServer::new(get, decode_get_request, encode_get_response),
            list: RpcServer::new(list, decode_list_request, encode_list_response),
            delete: RpcServer::new(delete, decode_delete_request, encode_delete_response),
        }
    }

    /// # Errors
    ///
    /// Returns an `EndpointError` if the endpoint pipeline rejected the call.
    pub async fn create_movement(
        &self,
        ctx: RequestContext,
        req: wire::CreateMovementRequest,
    ) -> Result<wire::CreateMovementResponse, EndpointError> {
        self.create.serve(ctx, req).await
    }

    /// # Errors
    ///
    /// Returns an `EndpointError` if the endpoint pipeline rejected the call.
    pub async fn get_movement(
        &self,
        ctx: RequestContext,
        req: wire::GetMovementRequest,
    ) -> Result<wire::GetMovementResponse, EndpointError> {
        self.get.serve(ctx, req).await
    }

    /// # Errors
    ///
    /// Returns an `EndpointError` if the endpoint pipeline rejected the call.
    pub async fn list_movements(
        &self,
        ctx: RequestContext,
        req: wire::ListMovementsRequest,
    ) -> Result<wire::ListMovementsResponse, EndpointError> {
        self.list.serve(ctx, req).await
    }

    /// # Errors
    ///
    /// Returns an `EndpointError` if the endpoint pipeline rejected the call.
    pub async fn delete_movement(
        &self,
        ctx: RequestContext,
        req: wire::DeleteMovementRequest,
    ) -> Result<wire::DeleteMovementResponse, EndpointError> {
        self.delete.serve(ctx, req).await
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[must_use]
pub fn decode_create_request(req: wire::CreateMovementRequest) -> CreateMovementRequest {
    CreateMovementRequest {
        tenant_id: req.tenant_id,
        name: req.name,
        category_id: req.category_id,
    }
}

#[must_use]
pub fn decode_get_request(req: wire::GetMovementRequest) -> GetMovementRequest {
    GetMovementRequest {
        id: MovementId::from(req.id),
    }
}

#[must_use]
pub fn decode_list_request(req: wire::ListMovementsRequest) -> ListMovementsRequest {
    ListMovementsRequest {
        category_name: req.category_name,
    }
}

#[must_use]
pub fn decode_delete_request(req: wire::DeleteMovementRequest) -> DeleteMovementRequest {
    DeleteMovementRequest {
        id: MovementId::from(req.id),
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

#[must_use]
pub fn movement_to_wire(movement: &Movement) -> MovementMessage {
    MovementMessage {
        id: movement.id().to_string(),
        tenant_id: movement.tenant_id().to_string(),
        name: movement.name().to_string(),
        category_id: movement.category_id().to_string(),
    }
}

/// Renders an optional failure as the wire `error` field. Empty means success.
#[must_use]
pub fn err_to_string(err: Option<&MovementError>) -> String {
    err.map(ToString::to_string).unwrap_or_default()
}

#[must_use]
pub fn encode_create_response(resp: CreateMovementResponse) -> wire::CreateMovementResponse {
    wire::CreateMovementResponse {
        data: resp.data().map(movement_to_wire),
        error: err_to_string(resp.error()),
    }
}

#[must_use]
pub fn encode_get_response(resp: GetMovementResponse) -> wire::GetMovementResponse {
    wire::GetMovementResponse {
        data: resp.data().map(movement_to_wire),
        error: err_to_string(resp.error()),
    }
}

#[must_use]
pub fn encode_list_response(resp: ListMovementsResponse) -> wire::ListMovementsResponse {
    wire::ListMovementsResponse {
        data: resp
            .data()
            .map(|movements| movements.iter().map(movement_to_wire).collect())
            .unwrap_or_default(),
        error: err_to_string(resp.error()),
    }
}

#[must_use]
pub fn encode_delete_response(resp: DeleteMovementResponse) -> wire::DeleteMovementResponse {
    wire::DeleteMovementResponse {
        error: err_to_string(resp.error()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
