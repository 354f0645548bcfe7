//! Discovery provider API implementation
//!
//! `config` is an arbitrary JSON object whose shape depends on the provider
//! type. Responses mask secrets inside it.

use crate::api::common::Nullable;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PROVIDERS_PATH: &str = "/api/v1/discovery/providers";

pub type ProviderConfig = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryProvider {
    pub id: Uuid,
    pub name: String,
    pub provider_type: String,
    pub enabled: bool,
    pub interval: i64,
    #[serde(default)]
    pub config: Option<ProviderConfig>,
}

/// Request body for creating discovery providers
#[derive(Debug, Serialize)]
pub struct CreateDiscoveryProviderRequest {
    pub name: String,
    pub provider_type: String,
    pub config: ProviderConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

/// Request body for updating discovery providers
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UpdateDiscoveryProviderRequest {
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub name: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub enabled: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub interval: Nullable<i64>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub config: Nullable<ProviderConfig>,
}

/// Providers API for discovery provider operations
pub struct ProvidersApi<'a> {
    client: &'a Client,
}

impl<'a> ProvidersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/discovery/providers
    pub async fn create(
        &self,
        request: &CreateDiscoveryProviderRequest,
    ) -> Result<DiscoveryProvider, ApiError> {
        self.client.post(PROVIDERS_PATH, request).await
    }

    /// GET /api/v1/discovery/providers/{id}
    pub async fn get(&self, id: &Uuid) -> Result<DiscoveryProvider, ApiError> {
        self.client.get(&format!("{}/{}", PROVIDERS_PATH, id)).await
    }

    /// PATCH /api/v1/discovery/providers/{id}
    pub async fn update(
        &self,
        id: &Uuid,
        request: &UpdateDiscoveryProviderRequest,
    ) -> Result<DiscoveryProvider, ApiError> {
        self.client
            .patch(&format!("{}/{}", PROVIDERS_PATH, id), request)
            .await
    }

    /// DELETE /api/v1/discovery/providers/{id}
    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", PROVIDERS_PATH, id))
            .await
    }
}
