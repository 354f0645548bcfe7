//! Model API implementation
//!
//! Models are addressed by name rather than id.

use crate::api::common::Nullable;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MODELS_PATH: &str = "/api/v1/models";

#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub provider_id: Uuid,
    #[serde(default)]
    pub default: Option<bool>,
}

/// Request body for creating models
#[derive(Debug, Serialize)]
pub struct CreateModelRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider_id: Uuid,
    pub default: bool,
}

/// Request body for updating models
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UpdateModelRequest {
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub provider_id: Nullable<Uuid>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub default: Nullable<bool>,
}

/// Model API for model operations
pub struct ModelApi<'a> {
    client: &'a Client,
}

impl<'a> ModelApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn model_path(name: &str) -> String {
        format!("{}/{}", MODELS_PATH, urlencoding::encode(name))
    }

    /// POST /api/v1/models
    pub async fn create(&self, request: &CreateModelRequest) -> Result<Model, ApiError> {
        self.client.post(MODELS_PATH, request).await
    }

    /// GET /api/v1/models/{name}
    pub async fn get(&self, name: &str) -> Result<Model, ApiError> {
        self.client.get(&Self::model_path(name)).await
    }

    /// PATCH /api/v1/models/{name}
    pub async fn update(&self, name: &str, request: &UpdateModelRequest) -> Result<Model, ApiError> {
        self.client.patch(&Self::model_path(name), request).await
    }

    /// DELETE /api/v1/models/{name}
    pub async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::model_path(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names_are_percent_encoded() {
        assert_eq!(ModelApi::model_path("gpt-4o"), "/api/v1/models/gpt-4o");
        assert_eq!(
            ModelApi::model_path("org/model name"),
            "/api/v1/models/org%2Fmodel%20name"
        );
    }
}
