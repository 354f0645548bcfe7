//! OAuth service API implementation

use crate::api::common::Nullable;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SERVICES_PATH: &str = "/api/v1/oauth/services";

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthService {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub client_id: String,
    pub authorization_url: String,
    pub token_url: String,
    #[serde(default)]
    pub userinfo_url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub homepage_url: Option<String>,
    #[serde(default)]
    pub default_scopes: Vec<String>,
    #[serde(default)]
    pub supported_grant_types: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating OAuth services
#[derive(Debug, Serialize)]
pub struct CreateOAuthServiceRequest {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub authorization_url: String,
    pub token_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    pub default_scopes: Vec<String>,
    pub supported_grant_types: Vec<String>,
    pub is_active: bool,
}

/// Request body for updating OAuth services
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UpdateOAuthServiceRequest {
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub display_name: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_id: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub client_secret: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub authorization_url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub token_url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub userinfo_url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub icon_url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub homepage_url: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub default_scopes: Nullable<Vec<String>>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub supported_grant_types: Nullable<Vec<String>>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub is_active: Nullable<bool>,
}

/// Services API for OAuth service operations
pub struct ServicesApi<'a> {
    client: &'a Client,
}

impl<'a> ServicesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/oauth/services
    pub async fn create(&self, request: &CreateOAuthServiceRequest) -> Result<OAuthService, ApiError> {
        self.client.post(SERVICES_PATH, request).await
    }

    /// GET /api/v1/oauth/services/{id}
    pub async fn get(&self, id: &Uuid) -> Result<OAuthService, ApiError> {
        self.client.get(&format!("{}/{}", SERVICES_PATH, id)).await
    }

    /// PATCH /api/v1/oauth/services/{id}
    pub async fn update(
        &self,
        id: &Uuid,
        request: &UpdateOAuthServiceRequest,
    ) -> Result<OAuthService, ApiError> {
        self.client
            .patch(&format!("{}/{}", SERVICES_PATH, id), request)
            .await
    }

    /// DELETE /api/v1/oauth/services/{id}
    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", SERVICES_PATH, id))
            .await
    }
}
