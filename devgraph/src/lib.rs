pub mod api;
pub mod provider_data;
pub mod resources;

pub use provider_data::DevgraphProviderData;

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::plan::validate_config;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, Provider, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    ValidateProviderConfigRequest, ValidateProviderConfigResponse,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tracing::info;

pub const HOST_ENV: &str = "DEVGRAPH_HOST";
pub const ACCESS_TOKEN_ENV: &str = "DEVGRAPH_ACCESS_TOKEN";
pub const ENVIRONMENT_ENV: &str = "DEVGRAPH_ENVIRONMENT";

pub struct DevgraphProvider {
    version: String,
    provider_data: Option<DevgraphProviderData>,
}

impl Default for DevgraphProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

impl DevgraphProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            provider_data: None,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn provider_data(&self) -> Option<&DevgraphProviderData> {
        self.provider_data.as_ref()
    }
}

pub fn provider_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Interact with the Devgraph API")
        .attribute(
            AttributeBuilder::new("host", AttributeType::String)
                .description(
                    "URI for the Devgraph API. May also be provided via the DEVGRAPH_HOST \
                     environment variable",
                )
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("access_token", AttributeType::String)
                .description(
                    "Access token for the Devgraph API. May also be provided via the \
                     DEVGRAPH_ACCESS_TOKEN environment variable",
                )
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("environment", AttributeType::String)
                .description(
                    "Devgraph environment ID sent with every request. May also be provided \
                     via the DEVGRAPH_ENVIRONMENT environment variable",
                )
                .optional()
                .build(),
        )
        .build()
}

/// Configured value if set, even when empty, otherwise the environment
/// variable. Unknown configuration cannot be resolved until apply.
fn resolve_setting(
    config: &DynamicValue,
    name: &str,
    env_var: &str,
    unknown_summary: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    match config.get_dynamic(&AttributePath::new(name)) {
        Dynamic::String(value) => Some(value),
        Dynamic::Unknown => {
            diagnostics.push(
                Diagnostic::error(
                    unknown_summary,
                    format!(
                        "The provider cannot create the Devgraph API client as there is an unknown configuration value for the {}. Either target apply the source of the value first, set the value statically in the configuration, or use the {} environment variable.",
                        name, env_var
                    ),
                )
                .with_attribute(AttributePath::new(name)),
            );
            None
        }
        _ => std::env::var(env_var).ok(),
    }
}

#[async_trait]
impl Provider for DevgraphProvider {
    fn type_name(&self) -> &str {
        "devgraph"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: provider_schema(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];
        let config = &request.config;

        let host = resolve_setting(config, "host", HOST_ENV, "Unknown Devgraph API Host", &mut diagnostics)
            .filter(|host| !host.is_empty());
        let token = resolve_setting(
            config,
            "access_token",
            ACCESS_TOKEN_ENV,
            "Unknown Devgraph Access Token",
            &mut diagnostics,
        )
        .filter(|token| !token.is_empty());
        let environment = resolve_setting(
            config,
            "environment",
            ENVIRONMENT_ENV,
            "Unknown Devgraph Environment",
            &mut diagnostics,
        );

        if !diagnostics.is_empty() {
            return ConfigureProviderResponse {
                diagnostics,
                provider_data: None,
            };
        }

        if host.is_none() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing Devgraph API Host",
                    "The provider cannot create the Devgraph API client as there is a missing or empty value for the Devgraph API host. Set the host value in the configuration or use the DEVGRAPH_HOST environment variable.",
                )
                .with_attribute(AttributePath::new("host")),
            );
        }
        if token.is_none() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing Devgraph Access Token",
                    "The provider cannot create the Devgraph API client as there is a missing or empty value for the Devgraph access token. Set the access_token value in the configuration or use the DEVGRAPH_ACCESS_TOKEN environment variable.",
                )
                .with_attribute(AttributePath::new("access_token")),
            );
        }

        let (host, token) = match (host, token) {
            (Some(host), Some(token)) => (host, token),
            _ => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        match api::Client::new(&host, &token, environment.as_deref()) {
            Ok(client) => {
                info!(
                    request_id = %ctx.request_id(),
                    host = %host,
                    environment = environment.as_deref().unwrap_or(""),
                    terraform_version = %request.terraform_version,
                    "configured Devgraph client"
                );
                let data = DevgraphProviderData::new(client);
                self.provider_data = Some(data.clone());
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(Arc::new(data) as Arc<dyn Any + Send + Sync>),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Unable to Create Devgraph API Client",
                    format!(
                        "An unexpected error occurred when creating the Devgraph API client: {}",
                        e
                    ),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: validate_config(&provider_schema(), &request.config),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "devgraph_mcp_endpoint".to_string(),
            Box::new(|| {
                Box::new(resources::McpEndpointResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "devgraph_model_provider".to_string(),
            Box::new(|| {
                Box::new(resources::ModelProviderResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "devgraph_model".to_string(),
            Box::new(|| Box::new(resources::ModelResource::new()) as Box<dyn ResourceWithConfigure>),
        );
        factories.insert(
            "devgraph_environment".to_string(),
            Box::new(|| {
                Box::new(resources::EnvironmentResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "devgraph_oauth_service".to_string(),
            Box::new(|| {
                Box::new(resources::OAuthServiceResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "devgraph_discovery_provider".to_string(),
            Box::new(|| {
                Box::new(resources::DiscoveryProviderResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "devgraph_chat_suggestion".to_string(),
            Box::new(|| {
                Box::new(resources::ChatSuggestionResource::new()) as Box<dyn ResourceWithConfigure>
            }),
        );
        factories
    }
}
