//! MCP endpoint resource implementation

use super::{
    api_failure, client, configure_provider_data, diff, optional_bool, optional_string,
    optional_string_list, optional_string_map, parse_uuid, required_string, string_map,
    Operation,
};
use crate::api::mcp::endpoints::{CreateMcpEndpointRequest, McpEndpoint, UpdateMcpEndpointRequest};
use crate::api::Nullable;
use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan::validate_config;
use tfplug::plan_modifier::UseStateForUnknown;
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

const ENTITY: &str = "MCP endpoint";

#[derive(Default)]
pub struct McpEndpointResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl McpEndpointResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(config: &DynamicValue) -> Result<CreateMcpEndpointRequest, Diagnostic> {
        let oauth_service_id = optional_string(config, "oauth_service_id")
            .map(|raw| parse_uuid(&raw, "Invalid OAuth Service ID"))
            .transpose()?;

        Ok(CreateMcpEndpointRequest {
            name: required_string(config, "name")?,
            url: required_string(config, "url")?,
            description: optional_string(config, "description"),
            headers: optional_string_map(config, "headers"),
            devgraph_auth: optional_bool(config, "devgraph_auth").unwrap_or(false),
            supports_resources: optional_bool(config, "supports_resources").unwrap_or(false),
            oauth_service_id,
            immutable: optional_bool(config, "immutable").unwrap_or(false),
            active: optional_bool(config, "active").unwrap_or(true),
            allowed_tools: optional_string_list(config, "allowed_tools"),
            denied_tools: optional_string_list(config, "denied_tools"),
        })
    }

    fn build_update_request(
        planned: &DynamicValue,
        prior: &DynamicValue,
    ) -> Result<UpdateMcpEndpointRequest, Diagnostic> {
        let as_string = |v: &Dynamic| v.as_str().map(str::to_string);

        let oauth_service_id = match diff(planned, prior, "oauth_service_id", as_string) {
            Nullable::Value(raw) => Nullable::Value(parse_uuid(&raw, "Invalid OAuth Service ID")?),
            Nullable::Null => Nullable::Null,
            Nullable::Omit => Nullable::Omit,
        };

        Ok(UpdateMcpEndpointRequest {
            name: diff(planned, prior, "name", as_string),
            url: diff(planned, prior, "url", as_string),
            description: diff(planned, prior, "description", as_string),
            headers: diff(planned, prior, "headers", Dynamic::as_string_map),
            devgraph_auth: diff(planned, prior, "devgraph_auth", Dynamic::as_bool),
            supports_resources: diff(planned, prior, "supports_resources", Dynamic::as_bool),
            oauth_service_id,
            immutable: diff(planned, prior, "immutable", Dynamic::as_bool),
            active: diff(planned, prior, "active", Dynamic::as_bool),
            allowed_tools: diff(planned, prior, "allowed_tools", Dynamic::as_string_list),
            denied_tools: diff(planned, prior, "denied_tools", Dynamic::as_string_list),
        })
    }

    /// Copy server-side values into state. Tool lists always come from config.
    fn apply_response(state: &mut DynamicValue, endpoint: &McpEndpoint) {
        let _ = state.set_string(&AttributePath::new("id"), endpoint.id.to_string());
        let _ = state.set_string(&AttributePath::new("name"), endpoint.name.clone());
        let _ = state.set_string(&AttributePath::new("url"), endpoint.url.clone());

        if let Some(description) = &endpoint.description {
            let _ = state.set_string(&AttributePath::new("description"), description.clone());
        }

        if let Some(headers) = endpoint.headers.as_ref().filter(|h| !h.is_empty()) {
            let _ = state.set_map(&AttributePath::new("headers"), string_map(headers));
        }

        for (name, value) in [
            ("devgraph_auth", endpoint.devgraph_auth),
            ("supports_resources", endpoint.supports_resources),
            ("immutable", endpoint.immutable),
            ("active", endpoint.active),
        ] {
            if let Some(v) = value {
                let _ = state.set_bool(&AttributePath::new(name), v);
            }
        }

        if let Some(id) = endpoint.oauth_service_id.filter(|id| !id.is_nil()) {
            let _ = state.set_string(&AttributePath::new("oauth_service_id"), id.to_string());
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages an MCP (Model Context Protocol) endpoint configuration in Devgraph")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the MCP endpoint")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the MCP endpoint")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("url", AttributeType::String)
                .description("The URL of the MCP endpoint")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("A description of the MCP endpoint")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("headers", AttributeType::Map(Box::new(AttributeType::String)))
                .description("Custom headers to send with requests to the MCP endpoint")
                .optional()
                .computed()
                .default(StaticDefault::map(HashMap::new()))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("devgraph_auth", AttributeType::Bool)
                .description("Whether to use Devgraph authentication for this endpoint")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("supports_resources", AttributeType::Bool)
                .description("Whether this MCP endpoint supports resources")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("oauth_service_id", AttributeType::String)
                .description("The OAuth service ID to use for authentication")
                .optional()
                .validator(UuidValidator::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("immutable", AttributeType::Bool)
                .description("Whether this endpoint configuration is immutable")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("active", AttributeType::Bool)
                .description("Whether this MCP endpoint is active")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("allowed_tools", AttributeType::List(Box::new(AttributeType::String)))
                .description("List of allowed tool names for this endpoint")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("denied_tools", AttributeType::List(Box::new(AttributeType::String)))
                .description("List of denied tool names for this endpoint")
                .optional()
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for McpEndpointResource {
    fn type_name(&self) -> &str {
        "devgraph_mcp_endpoint"
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

        let client = match client(&self.provider_data) {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let create_request = match Self::build_create_request(&request.planned_state) {
            Ok(req) => req,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    private: vec![],
                    diagnostics,
                };
            }
        };

        match client.mcp().endpoints().create(&create_request).await {
            Ok(endpoint) => {
                info!(request_id = %ctx.request_id(), id = %endpoint.id, "created MCP endpoint");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &endpoint);
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

        let client = match client(&self.provider_data) {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        let raw_id = optional_string(&request.current_state, "id").unwrap_or_default();
        let id = match parse_uuid(&raw_id, "Invalid MCP Endpoint ID") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                };
            }
        };

        match client.mcp().endpoints().get(&id).await {
            Ok(endpoint) => {
                let mut new_state = request.current_state;
                Self::apply_response(&mut new_state, &endpoint);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(request_id = %ctx.request_id(), id = %id, "MCP endpoint no longer exists, removing from state");
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

        let client = match client(&self.provider_data) {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let raw_id = optional_string(&request.prior_state, "id").unwrap_or_default();
        let prepared = parse_uuid(&raw_id, "Invalid MCP Endpoint ID").and_then(|id| {
            Self::build_update_request(&request.planned_state, &request.prior_state)
                .map(|body| (id, body))
        });
        let (id, update_request) = match prepared {
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

        match client.mcp().endpoints().update(&id, &update_request).await {
            Ok(endpoint) => {
                info!(request_id = %ctx.request_id(), id = %endpoint.id, "updated MCP endpoint");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &endpoint);
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

        let client = match client(&self.provider_data) {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let raw_id = optional_string(&request.prior_state, "id").unwrap_or_default();
        let id = match parse_uuid(&raw_id, "Invalid MCP Endpoint ID") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.mcp().endpoints().delete(&id).await {
            Ok(()) => {
                info!(request_id = %ctx.request_id(), id = %id, "deleted MCP endpoint");
            }
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for McpEndpointResource {
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
impl ResourceWithImportState for McpEndpointResource {
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

#[cfg(test)]
#[path = "./mcp_endpoint_test.rs"]
mod mcp_endpoint_test;
