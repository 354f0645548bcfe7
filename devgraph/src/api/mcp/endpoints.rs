//! MCP endpoint API implementation

use crate::api::common::{is_empty_or_none, Nullable};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

const ENDPOINTS_PATH: &str = "/api/v1/mcp/endpoints";

/// MCP endpoint as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct McpEndpoint {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub devgraph_auth: Option<bool>,
    #[serde(default)]
    pub supports_resources: Option<bool>,
    #[serde(default)]
    pub oauth_service_id: Option<Uuid>,
    #[serde(default)]
    pub immutable: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub allowed_tools: Option<Vec<String>>,
    #[serde(default)]
    pub denied_tools: Option<Vec<String>>,
}

/// Request body for creating MCP endpoints
#[derive(Debug, Serialize)]
pub struct CreateMcpEndpointRequest {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_empty_or_none")]
    pub headers: Option<HashMap<String, String>>,
    pub devgraph_auth: bool,
    pub supports_resources: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_service_id: Option<Uuid>,
    pub immutable: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "is_empty_or_none")]
    pub allowed_tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_empty_or_none")]
    pub denied_tools: Option<Vec<String>>,
}

/// Request body for updating MCP endpoints. Omitted fields stay unchanged.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UpdateMcpEndpointRequest {
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub name: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub headers: Nullable<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub devgraph_auth: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub supports_resources: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub oauth_service_id: Nullable<Uuid>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub immutable: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub active: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub allowed_tools: Nullable<Vec<String>>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub denied_tools: Nullable<Vec<String>>,
}

/// Endpoints API for MCP endpoint operations
pub struct EndpointsApi<'a> {
    client: &'a Client,
}

impl<'a> EndpointsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/mcp/endpoints
    pub async fn create(&self, request: &CreateMcpEndpointRequest) -> Result<McpEndpoint, ApiError> {
        self.client.post(ENDPOINTS_PATH, request).await
    }

    /// GET /api/v1/mcp/endpoints/{id}
    pub async fn get(&self, id: &Uuid) -> Result<McpEndpoint, ApiError> {
        self.client
            .get(&format!("{}/{}", ENDPOINTS_PATH, id))
            .await
    }

    /// PATCH /api/v1/mcp/endpoints/{id}
    pub async fn update(
        &self,
        id: &Uuid,
        request: &UpdateMcpEndpointRequest,
    ) -> Result<McpEndpoint, ApiError> {
        self.client
            .patch(&format!("{}/{}", ENDPOINTS_PATH, id), request)
            .await
    }

    /// DELETE /api/v1/mcp/endpoints/{id}
    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", ENDPOINTS_PATH, id))
            .await
    }
}
