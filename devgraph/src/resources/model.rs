//! Model resource implementation
//!
//! Models are addressed by their name, so `name` is the import key and
//! changing it replaces the model.

use super::{
    api_failure, client, configure_provider_data, diff, optional_bool, optional_string,
    parse_uuid, required_string, Operation,
};
use crate::api::models::model::{CreateModelRequest, Model, UpdateModelRequest};
use crate::api::Nullable;
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
use tfplug::validator::UuidValidator;
use tracing::{info, warn};

const ENTITY: &str = "model";

#[derive(Default)]
pub struct ModelResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl ModelResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(planned: &DynamicValue) -> Result<CreateModelRequest, Diagnostic> {
        let name = required_string(planned, "name")?;
        let provider_id = parse_uuid(&required_string(planned, "provider_id")?, "Invalid Provider ID")?;

        Ok(CreateModelRequest {
            name,
            description: optional_string(planned, "description"),
            provider_id,
            default: optional_bool(planned, "default").unwrap_or(false),
        })
    }

    fn build_update_request(
        planned: &DynamicValue,
        prior: &DynamicValue,
    ) -> Result<UpdateModelRequest, Diagnostic> {
        let as_string = |v: &Dynamic| v.as_str().map(str::to_string);

        let provider_id = match diff(planned, prior, "provider_id", as_string) {
            Nullable::Value(raw) => Nullable::Value(parse_uuid(&raw, "Invalid Provider ID")?),
            Nullable::Null => Nullable::Null,
            Nullable::Omit => Nullable::Omit,
        };

        Ok(UpdateModelRequest {
            description: diff(planned, prior, "description", as_string),
            provider_id,
            default: diff(planned, prior, "default", Dynamic::as_bool),
        })
    }

    fn apply_response(state: &mut DynamicValue, model: &Model) {
        let _ = state.set_string(&AttributePath::new("id"), model.id.to_string());
        let _ = state.set_string(&AttributePath::new("name"), model.name.clone());
        if let Some(description) = &model.description {
            let _ = state.set_string(&AttributePath::new("description"), description.clone());
        }
        let _ = state.set_string(&AttributePath::new("provider_id"), model.provider_id.to_string());
        if let Some(default) = model.default {
            let _ = state.set_bool(&AttributePath::new("default"), default);
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages a Model configuration in Devgraph")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the model")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the model (e.g., 'gpt-4', 'claude-3-opus')")
                .required()
                .plan_modifier(RequiresReplaceIfChanged::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("A description of the model")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("provider_id", AttributeType::String)
                .description("The ID of the model provider this model belongs to")
                .required()
                .validator(UuidValidator::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("default", AttributeType::Bool)
                .description("Whether this is the default model")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for ModelResource {
    fn type_name(&self) -> &str {
        "devgraph_model"
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

        match client.models().models().create(&create_request).await {
            Ok(model) => {
                info!(request_id = %ctx.request_id(), model = %model.name, "created model");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &model);
                CreateResourceResponse {
                    new_state,
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

        let prepared = client(&self.provider_data).and_then(|client| {
            required_string(&request.current_state, "name").map(|name| (client, name))
        });
        let (client, name) = match prepared {
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

        match client.models().models().get(&name).await {
            Ok(model) => {
                let mut new_state = request.current_state;
                Self::apply_response(&mut new_state, &model);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(request_id = %ctx.request_id(), model = %name, "model no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: vec![],
                }
            }
            Err(e) => {
                diagnostics.push(api_failure(Operation::Read { id: &name }, ENTITY, &e));
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

        let prepared = client(&self.provider_data).and_then(|client| {
            let name = required_string(&request.prior_state, "name")?;
            let body = Self::build_update_request(&request.planned_state, &request.prior_state)?;
            Ok((client, name, body))
        });
        let (client, name, update_request) = match prepared {
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

        match client.models().models().update(&name, &update_request).await {
            Ok(model) => {
                info!(request_id = %ctx.request_id(), model = %name, "updated model");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &model);
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

        let prepared = client(&self.provider_data).and_then(|client| {
            required_string(&request.prior_state, "name").map(|name| (client, name))
        });
        let (client, name) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.models().models().delete(&name).await {
            Ok(()) => info!(request_id = %ctx.request_id(), model = %name, "deleted model"),
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ModelResource {
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
impl ResourceWithImportState for ModelResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("name"), &request, &mut response);
        response
    }
}

#[cfg(test)]
#[path = "./model_test.rs"]
mod model_test;
