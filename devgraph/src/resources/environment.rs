//! Environment resource implementation
//!
//! The API only supports create and list. Reads scan the list, updates and
//! deletes are refused with an explanation.

use super::{
    api_failure, client, configure_provider_data, optional_string, optional_string_list,
    required_string, Operation,
};
use crate::api::environments::{CreateEnvironmentRequest, Environment};
use async_trait::async_trait;
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
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tracing::{info, warn};

const ENTITY: &str = "environment";

#[derive(Default)]
pub struct EnvironmentResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl EnvironmentResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(planned: &DynamicValue) -> Result<CreateEnvironmentRequest, Diagnostic> {
        Ok(CreateEnvironmentRequest {
            name: required_string(planned, "name")?,
            stripe_subscription_id: required_string(planned, "stripe_subscription_id")?,
            instance_url: required_string(planned, "instance_url")?,
            invited_users: optional_string_list(planned, "invited_users").unwrap_or_default(),
        })
    }

    fn apply_response(state: &mut DynamicValue, environment: &Environment) {
        let _ = state.set_string(&AttributePath::new("id"), environment.id.to_string());
        let _ = state.set_string(&AttributePath::new("name"), environment.name.clone());
        let _ = state.set_string(&AttributePath::new("slug"), environment.slug.clone());
        let _ = state.set_string(
            &AttributePath::new("clerk_organization_id"),
            environment.clerk_organization_id.clone(),
        );
        let _ = state.set_string(
            &AttributePath::new("customer_id"),
            environment.customer_id.clone(),
        );
        let _ = state.set_string(
            &AttributePath::new("subscription_id"),
            environment.subscription_id.to_string(),
        );
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages an environment in Devgraph")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the environment")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the environment")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("slug", AttributeType::String)
                .description("The URL-friendly slug of the environment")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("clerk_organization_id", AttributeType::String)
                .description("The Clerk organization ID associated with this environment")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("customer_id", AttributeType::String)
                .description("The customer ID associated with this environment")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("subscription_id", AttributeType::String)
                .description("The subscription ID associated with this environment")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("invited_users", AttributeType::List(Box::new(AttributeType::String)))
                .description("List of email addresses to invite to this environment")
                .optional()
                .computed()
                .default(StaticDefault::list(vec![]))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("stripe_subscription_id", AttributeType::String)
                .description("The Stripe subscription ID for this environment")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("instance_url", AttributeType::String)
                .description("The instance URL for this environment")
                .required()
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for EnvironmentResource {
    fn type_name(&self) -> &str {
        "devgraph_environment"
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

        match client.environments().create(&create_request).await {
            Ok(environment) => {
                info!(request_id = %ctx.request_id(), id = %environment.id, slug = %environment.slug, "created environment");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &environment);
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

        let id = optional_string(&request.current_state, "id").unwrap_or_default();
        match client.environments().find(&id).await {
            Ok(Some(environment)) => {
                let mut new_state = request.current_state;
                Self::apply_response(&mut new_state, &environment);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Ok(None) => {
                warn!(request_id = %ctx.request_id(), id = %id, "environment not listed, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: vec![],
                }
            }
            Err(e) => {
                diagnostics.push(api_failure(Operation::Read { id: &id }, ENTITY, &e));
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
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.prior_state,
            private: vec![],
            diagnostics: vec![Diagnostic::error(
                "Update not supported",
                "Environments cannot be updated after creation. Please destroy and recreate the resource.",
            )],
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        _request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        DeleteResourceResponse {
            diagnostics: vec![Diagnostic::error(
                "Delete not supported",
                "Environments cannot be deleted through the API. Please manage environment deletion through the Devgraph console.",
            )],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for EnvironmentResource {
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
impl ResourceWithImportState for EnvironmentResource {
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
