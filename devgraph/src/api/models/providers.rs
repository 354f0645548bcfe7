//! Model provider API implementation
//!
//! Providers are polymorphic on `type`. Requests and responses are tagged
//! unions; a response tag this client does not know decodes to
//! [`ModelProvider::Unknown`] so callers can report it instead of failing
//! deserialisation.

use crate::api::common::Nullable;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PROVIDERS_PATH: &str = "/api/v1/models/providers";

/// Provider types the API accepts
pub const PROVIDER_TYPES: [&str; 3] = ["openai", "anthropic", "xai"];

/// Fields shared by every provider variant in responses
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelProviderDetails {
    pub id: Uuid,
    pub name: String,
    /// Usually masked or omitted by the API
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub default: Option<bool>,
}

/// Model provider response, discriminated by `type`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelProvider {
    #[serde(rename = "openai")]
    OpenAi(ModelProviderDetails),
    Anthropic(ModelProviderDetails),
    #[serde(rename = "xai")]
    XAi(ModelProviderDetails),
    #[serde(other)]
    Unknown,
}

impl ModelProvider {
    /// Variant tag and payload, or None for an unrecognised tag
    pub fn details(&self) -> Option<(&'static str, &ModelProviderDetails)> {
        match self {
            ModelProvider::OpenAi(d) => Some(("openai", d)),
            ModelProvider::Anthropic(d) => Some(("anthropic", d)),
            ModelProvider::XAi(d) => Some(("xai", d)),
            ModelProvider::Unknown => None,
        }
    }
}

/// Fields shared by every provider variant in create requests
#[derive(Debug, Clone, Serialize)]
pub struct ModelProviderCreate {
    pub name: String,
    pub api_key: String,
    pub default: bool,
}

/// Request body for creating model providers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CreateModelProviderRequest {
    #[serde(rename = "openai")]
    OpenAi(ModelProviderCreate),
    #[serde(rename = "anthropic")]
    Anthropic(ModelProviderCreate),
    #[serde(rename = "xai")]
    XAi(ModelProviderCreate),
}

impl CreateModelProviderRequest {
    /// Select the request variant for a provider type
    pub fn for_type(provider_type: &str, body: ModelProviderCreate) -> Option<Self> {
        match provider_type {
            "openai" => Some(Self::OpenAi(body)),
            "anthropic" => Some(Self::Anthropic(body)),
            "xai" => Some(Self::XAi(body)),
            _ => None,
        }
    }
}

/// Request body for updating model providers
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UpdateModelProviderRequest {
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub name: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub api_key: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_omitted")]
    pub default: Nullable<bool>,
}

/// Providers API for model provider operations
pub struct ProvidersApi<'a> {
    client: &'a Client,
}

impl<'a> ProvidersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/models/providers
    pub async fn create(
        &self,
        request: &CreateModelProviderRequest,
    ) -> Result<ModelProvider, ApiError> {
        self.client.post(PROVIDERS_PATH, request).await
    }

    /// GET /api/v1/models/providers/{id}
    pub async fn get(&self, id: &Uuid) -> Result<ModelProvider, ApiError> {
        self.client
            .get(&format!("{}/{}", PROVIDERS_PATH, id))
            .await
    }

    /// PATCH /api/v1/models/providers/{id}
    pub async fn update(
        &self,
        id: &Uuid,
        request: &UpdateModelProviderRequest,
    ) -> Result<ModelProvider, ApiError> {
        self.client
            .patch(&format!("{}/{}", PROVIDERS_PATH, id), request)
            .await
    }

    /// DELETE /api/v1/models/providers/{id}
    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", PROVIDERS_PATH, id))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_is_tagged_by_type() {
        let request = CreateModelProviderRequest::for_type(
            "anthropic",
            ModelProviderCreate {
                name: "p1".to_string(),
                api_key: "k1".to_string(),
                default: false,
            },
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"type":"anthropic","name":"p1","api_key":"k1","default":false})
        );

        assert!(CreateModelProviderRequest::for_type(
            "cohere",
            ModelProviderCreate {
                name: "p1".to_string(),
                api_key: "k1".to_string(),
                default: false,
            },
        )
        .is_none());
    }

    #[test]
    fn test_response_variants_decode_by_tag() {
        let provider: ModelProvider = serde_json::from_str(
            r#"{"type":"xai","id":"6f1c1a4e-8d4b-4c4e-9b7e-2f5d3c1a0b9e","name":"grok","api_key":"****"}"#,
        )
        .unwrap();

        let (tag, details) = provider.details().unwrap();
        assert_eq!(tag, "xai");
        assert_eq!(details.name, "grok");
        assert_eq!(details.default, None);
    }

    #[test]
    fn test_unknown_tag_decodes_to_unknown() {
        let provider: ModelProvider = serde_json::from_str(
            r#"{"type":"mistral","id":"6f1c1a4e-8d4b-4c4e-9b7e-2f5d3c1a0b9e","name":"m"}"#,
        )
        .unwrap();
        assert_eq!(provider, ModelProvider::Unknown);
        assert!(provider.details().is_none());
    }
}
