//! Discovery provider resource implementation
//!
//! `config` is a JSON document in Terraform and a JSON object on the wire.
//! The API masks secrets inside it on every response, so state always keeps
//! the configured document.

use super::{
    api_failure, client, configure_provider_data, diff, optional_bool, optional_number,
    optional_string, required_string, Operation,
};
use crate::api::discovery::providers::{
    CreateDiscoveryProviderRequest, DiscoveryProvider, ProviderConfig,
    UpdateDiscoveryProviderRequest,
};
use crate::api::{ApiError, Nullable};
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan::validate_config;
use tfplug::plan_modifier::{RequiresReplaceIfChanged, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{JsonObjectValidator, NumberRange, WholeNumber};
use tracing::{info, warn};
use uuid::Uuid;

const ENTITY: &str = "discovery provider";

pub const DEFAULT_INTERVAL: i64 = 300;
pub const MIN_INTERVAL: i64 = 60;

fn parse_config(raw: &str) -> Result<ProviderConfig, Diagnostic> {
    serde_json::from_str(raw).map_err(|e| {
        Diagnostic::error(
            "Invalid Config JSON",
            format!("Could not parse config as JSON: {}", e),
        )
        .with_attribute(AttributePath::new("config"))
    })
}

fn whole_interval(seconds: f64) -> Result<i64, Diagnostic> {
    if seconds.fract() != 0.0 {
        return Err(Diagnostic::error(
            "Invalid interval",
            format!("Interval must be a whole number of seconds, got {}", seconds),
        )
        .with_attribute(AttributePath::new("interval")));
    }
    Ok(seconds as i64)
}

fn parse_provider_id(raw: &str) -> Result<Uuid, Diagnostic> {
    Uuid::parse_str(raw).map_err(|e| {
        Diagnostic::error(
            "Invalid provider ID",
            format!("Could not parse provider ID as UUID: {}", e),
        )
    })
}

#[derive(Default)]
pub struct DiscoveryProviderResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl DiscoveryProviderResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(
        planned: &DynamicValue,
    ) -> Result<CreateDiscoveryProviderRequest, Diagnostic> {
        let config = parse_config(&required_string(planned, "config")?)?;

        Ok(CreateDiscoveryProviderRequest {
            name: required_string(planned, "name")?,
            provider_type: required_string(planned, "provider_type")?,
            config,
            enabled: optional_bool(planned, "enabled"),
            interval: optional_number(planned, "interval")
                .map(whole_interval)
                .transpose()?,
        })
    }

    fn build_update_request(
        planned: &DynamicValue,
        prior: &DynamicValue,
    ) -> Result<UpdateDiscoveryProviderRequest, Diagnostic> {
        let config = match diff(planned, prior, "config", |v| v.as_str().map(str::to_string)) {
            Nullable::Value(raw) => Nullable::Value(parse_config(&raw)?),
            Nullable::Null => Nullable::Null,
            Nullable::Omit => Nullable::Omit,
        };

        let interval = match diff(planned, prior, "interval", Dynamic::as_number) {
            Nullable::Value(seconds) => Nullable::Value(whole_interval(seconds)?),
            Nullable::Null => Nullable::Null,
            Nullable::Omit => Nullable::Omit,
        };

        Ok(UpdateDiscoveryProviderRequest {
            name: diff(planned, prior, "name", |v| v.as_str().map(str::to_string)),
            enabled: diff(planned, prior, "enabled", Dynamic::as_bool),
            interval,
            config,
        })
    }

    fn apply_response(state: &mut DynamicValue, provider: &DiscoveryProvider) {
        let _ = state.set_string(&AttributePath::new("id"), provider.id.to_string());
        let _ = state.set_string(&AttributePath::new("name"), provider.name.clone());
        let _ = state.set_string(
            &AttributePath::new("provider_type"),
            provider.provider_type.clone(),
        );
        let _ = state.set_bool(&AttributePath::new("enabled"), provider.enabled);
        let _ = state.set_number(&AttributePath::new("interval"), provider.interval as f64);
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description(
            "Manages a discovery provider in Devgraph. Discovery providers continuously discover \
             entities and relations from external systems (GitHub, GitLab, Argo, etc.)",
        )
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the discovery provider")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("Human-readable name for this provider instance (e.g., 'GitHub Production')")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("provider_type", AttributeType::String)
                .description("Type of provider (github, gitlab, argo, vercel, docker, file, fossa, meta)")
                .required()
                .plan_modifier(RequiresReplaceIfChanged::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("enabled", AttributeType::Bool)
                .description("Whether this provider is active and should run discovery")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("interval", AttributeType::Number)
                .description("How often to run discovery, in seconds (minimum 60)")
                .optional()
                .computed()
                .default(StaticDefault::number(DEFAULT_INTERVAL as f64))
                .validator(NumberRange::at_least(MIN_INTERVAL as f64))
                .validator(WholeNumber::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("config", AttributeType::String)
                .description(
                    "Provider configuration as JSON string. The configuration schema depends on \
                     the provider_type. Sensitive values (tokens, API keys) will be encrypted",
                )
                .required()
                .sensitive()
                .validator(JsonObjectValidator::create())
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for DiscoveryProviderResource {
    fn type_name(&self) -> &str {
        "devgraph_discovery_provider"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: validate_config(&schema(), &request.config),
        }
    }

    async fn create(
        &self,
        ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let prepared = client(&self.provider_data).and_then(|client| {
            Self::build_create_request(&request.planned_state).map(|body| (client, body))
        });
        let (client, create_request) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics,
                };
            }
        };

        match client.discovery().providers().create(&create_request).await {
            Ok(provider) => {
                info!(
                    request_id = %ctx.request_id(),
                    id = %provider.id,
                    provider_type = %provider.provider_type,
                    "created discovery provider"
                );
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &provider);
                CreateResourceResponse {
                    new_state,
                    private: vec![],
                    diagnostics,
                }
            }
            Err(ApiError::NotFound(_)) => {
                diagnostics.push(Diagnostic::error(
                    "Provider type not found",
                    format!(
                        "The provider type '{}' was not found. Check that it's a valid provider type (github, gitlab, argo, vercel, docker, file, fossa).",
                        create_request.provider_type
                    ),
                ));
                CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(api_failure(Operation::Create, ENTITY, &e));
                CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics,
                }
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let raw_id = optional_string(&request.current_state, "id").unwrap_or_default();
        let prepared = client(&self.provider_data)
            .and_then(|client| parse_provider_id(&raw_id).map(|id| (client, id)));
        let (client, id) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match client.discovery().providers().get(&id).await {
            Ok(provider) => {
                let mut new_state = request.current_state;
                Self::apply_response(&mut new_state, &provider);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(request_id = %ctx.request_id(), id = %id, "discovery provider no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: vec![],
                }
            }
            Err(e) => {
                diagnostics.push(api_failure(Operation::Read { id: &raw_id }, ENTITY, &e));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                }
            }
        }
    }

    async fn update(
        &self,
        ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let raw_id = optional_string(&request.prior_state, "id").unwrap_or_default();
        let prepared = client(&self.provider_data).and_then(|client| {
            let id = parse_provider_id(&raw_id)?;
            let body = Self::build_update_request(&request.planned_state, &request.prior_state)?;
            Ok((client, id, body))
        });
        let (client, id, update_request) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        match client.discovery().providers().update(&id, &update_request).await {
            Ok(provider) => {
                info!(request_id = %ctx.request_id(), id = %id, "updated discovery provider");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &provider);
                UpdateResourceResponse {
                    new_state,
                    private: vec![],
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(api_failure(Operation::Update, ENTITY, &e));
                UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                }
            }
        }
    }

    async fn delete(
        &self,
        ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let raw_id = optional_string(&request.prior_state, "id").unwrap_or_default();
        let prepared = client(&self.provider_data)
            .and_then(|client| parse_provider_id(&raw_id).map(|id| (client, id)));
        let (client, id) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.discovery().providers().delete(&id).await {
            Ok(()) => info!(request_id = %ctx.request_id(), id = %id, "deleted discovery provider"),
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for DiscoveryProviderResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        configure_provider_data(&mut self.provider_data, request)
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }
}

#[async_trait]
impl ResourceWithImportState for DiscoveryProviderResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}
