//! Model provider resource implementation
//!
//! The API models providers as a union tagged by `type`. The resource keeps
//! one flat schema and picks the request variant from the configured type.
//! `api_key` never comes back unmasked, so state always holds the value from
//! the plan.

use super::{
    api_failure, client, configure_provider_data, diff, optional_bool, optional_string,
    parse_uuid, required_string, Operation,
};
use crate::api::models::providers::{
    CreateModelProviderRequest, ModelProvider, ModelProviderCreate, UpdateModelProviderRequest,
    PROVIDER_TYPES,
};
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
use tfplug::validator::StringOneOf;
use tracing::{info, warn};

const ENTITY: &str = "model provider";

#[derive(Default)]
pub struct ModelProviderResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl ModelProviderResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(planned: &DynamicValue) -> Result<CreateModelProviderRequest, Diagnostic> {
        let provider_type = required_string(planned, "type")?;
        let body = ModelProviderCreate {
            name: required_string(planned, "name")?,
            api_key: required_string(planned, "api_key")?,
            default: optional_bool(planned, "default").unwrap_or(false),
        };

        CreateModelProviderRequest::for_type(&provider_type, body).ok_or_else(|| {
            Diagnostic::error(
                "Invalid provider type",
                format!(
                    "Provider type must be one of: {}. Got: {}",
                    PROVIDER_TYPES.join(", "),
                    provider_type
                ),
            )
            .with_attribute(AttributePath::new("type"))
        })
    }

    /// Copy the variant payload into state, leaving `api_key` alone
    fn apply_response(state: &mut DynamicValue, provider: &ModelProvider) -> Result<(), Diagnostic> {
        let (provider_type, details) = provider.details().ok_or_else(|| {
            Diagnostic::error(
                "Unexpected response type",
                format!(
                    "Expected a model provider of type {}",
                    PROVIDER_TYPES.join(", ")
                ),
            )
        })?;

        let _ = state.set_string(&AttributePath::new("id"), details.id.to_string());
        let _ = state.set_string(&AttributePath::new("type"), provider_type.to_string());
        let _ = state.set_string(&AttributePath::new("name"), details.name.clone());
        if let Some(default) = details.default {
            let _ = state.set_bool(&AttributePath::new("default"), default);
        }
        Ok(())
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages a Model Provider configuration in Devgraph")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the model provider")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("type", AttributeType::String)
                .description("The type of model provider (openai, anthropic, xai)")
                .required()
                .validator(StringOneOf::create(&PROVIDER_TYPES))
                .plan_modifier(RequiresReplaceIfChanged::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the model provider")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("api_key", AttributeType::String)
                .description("The API key for the model provider")
                .required()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("default", AttributeType::Bool)
                .description("Whether this is the default model provider")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for ModelProviderResource {
    fn type_name(&self) -> &str {
        "devgraph_model_provider"
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

        let created = client
            .models()
            .providers()
            .create(&create_request)
            .await
            .map_err(|e| api_failure(Operation::Create, ENTITY, &e))
            .and_then(|provider| {
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &provider)?;
                Ok(new_state)
            });

        match created {
            Ok(new_state) => {
                info!(
                    request_id = %ctx.request_id(),
                    id = %new_state.get_string(&AttributePath::new("id")).unwrap_or_default(),
                    "created model provider"
                );
                CreateResourceResponse {
                    new_state,
                    private: vec![],
                    diagnostics,
                }
            }
            Err(diag) => {
                diagnostics.push(diag);
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
        let prepared = client(&self.provider_data).and_then(|client| {
            parse_uuid(&raw_id, "Invalid Model Provider ID").map(|id| (client, id))
        });
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

        match client.models().providers().get(&id).await {
            Ok(provider) => {
                let mut new_state = request.current_state.clone();
                if let Err(diag) = Self::apply_response(&mut new_state, &provider) {
                    diagnostics.push(diag);
                    new_state = request.current_state;
                }
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(request_id = %ctx.request_id(), id = %id, "model provider no longer exists, removing from state");
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
            parse_uuid(&raw_id, "Invalid Model Provider ID").map(|id| (client, id))
        });
        let (client, id) = match prepared {
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

        let as_string = |v: &Dynamic| v.as_str().map(str::to_string);
        let update_request = UpdateModelProviderRequest {
            name: diff(&request.planned_state, &request.prior_state, "name", as_string),
            api_key: diff(&request.planned_state, &request.prior_state, "api_key", as_string),
            default: diff(&request.planned_state, &request.prior_state, "default", Dynamic::as_bool),
        };

        let updated = client
            .models()
            .providers()
            .update(&id, &update_request)
            .await
            .map_err(|e| api_failure(Operation::Update, ENTITY, &e))
            .and_then(|provider| {
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &provider)?;
                Ok(new_state)
            });

        match updated {
            Ok(new_state) => {
                info!(request_id = %ctx.request_id(), id = %id, "updated model provider");
                UpdateResourceResponse {
                    new_state,
                    private: vec![],
                    diagnostics,
                }
            }
            Err(diag) => {
                diagnostics.push(diag);
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
        let prepared = client(&self.provider_data).and_then(|client| {
            parse_uuid(&raw_id, "Invalid Model Provider ID").map(|id| (client, id))
        });
        let (client, id) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.models().providers().delete(&id).await {
            Ok(()) => info!(request_id = %ctx.request_id(), id = %id, "deleted model provider"),
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ModelProviderResource {
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
impl ResourceWithImportState for ModelProviderResource {
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
