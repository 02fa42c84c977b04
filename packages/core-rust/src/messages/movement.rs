//! Movement RPC request/response messages.
//!
//! Every string field defaults to empty when absent so decoding never fails on
//! a well-formed message. Response `error` strings are empty on success.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared shapes
// ---------------------------------------------------------------------------

/// Wire representation of a movement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementMessage {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub category_id: String,
}

fn failure(error: &str) -> Option<&str> {
    if error.is_empty() {
        None
    } else {
        Some(error)
    }
}

// ---------------------------------------------------------------------------
// CreateMovement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMovementRequest {
    pub tenant_id: String,
    pub name: String,
    pub category_id: String,
}

/// `data` is absent when the call failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<MovementMessage>,
    #[serde(default)]
    pub error: String,
}

impl CreateMovementResponse {
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        failure(&self.error)
    }
}

// ---------------------------------------------------------------------------
// GetMovement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetMovementRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMovementResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<MovementMessage>,
    #[serde(default)]
    pub error: String,
}

impl GetMovementResponse {
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        failure(&self.error)
    }
}

// ---------------------------------------------------------------------------
// ListMovements
// ---------------------------------------------------------------------------

/// An empty `category_name` lists every movement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListMovementsRequest {
    pub category_name: String,
}

/// `data` is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMovementsResponse {
    #[serde(default)]
    pub data: Vec<MovementMessage>,
    #[serde(default)]
    pub error: String,
}

impl ListMovementsResponse {
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        failure(&self.error)
    }
}

// ---------------------------------------------------------------------------
// DeleteMovement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteMovementRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteMovementResponse {
    pub error: String,
}

impl DeleteMovementResponse {
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        failure(&self.error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
