//! OAuth service resource implementation
//!
//! `name` is the service identifier on the Devgraph side: it forces
//! replacement and is never taken back from the API. `client_secret` is write
//! only, state keeps the configured value.

use super::{
    api_failure, client, configure_provider_data, diff, optional_bool, optional_string,
    optional_string_list, parse_uuid, required_string, set_optional_string, string_list,
    Operation,
};
use crate::api::oauth::services::{CreateOAuthServiceRequest, OAuthService, UpdateOAuthServiceRequest};
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
use tfplug::validator::UrlValidator;
use tracing::{info, warn};

const ENTITY: &str = "OAuth service";

/// URL attributes and the error summary used when one fails to parse
const URL_ATTRIBUTES: [(&str, &str); 5] = [
    ("authorization_url", "Invalid authorization URL"),
    ("token_url", "Invalid token URL"),
    ("userinfo_url", "Invalid userinfo URL"),
    ("icon_url", "Invalid icon URL"),
    ("homepage_url", "Invalid homepage URL"),
];

fn check_url(raw: &str, summary: &str) -> Result<String, Diagnostic> {
    url::Url::parse(raw)
        .map(|_| raw.to_string())
        .map_err(|e| Diagnostic::error(summary, e.to_string()))
}

fn url_summary(name: &str) -> &'static str {
    URL_ATTRIBUTES
        .iter()
        .find(|(attr, _)| *attr == name)
        .map(|(_, summary)| *summary)
        .unwrap_or("Invalid URL")
}

#[derive(Default)]
pub struct OAuthServiceResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl OAuthServiceResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn optional_url(planned: &DynamicValue, name: &str) -> Result<Option<String>, Diagnostic> {
        optional_string(planned, name)
            .map(|raw| check_url(&raw, url_summary(name)))
            .transpose()
    }

    fn build_create_request(planned: &DynamicValue) -> Result<CreateOAuthServiceRequest, Diagnostic> {
        let authorization_url = check_url(
            &required_string(planned, "authorization_url")?,
            url_summary("authorization_url"),
        )?;
        let token_url = check_url(&required_string(planned, "token_url")?, url_summary("token_url"))?;

        Ok(CreateOAuthServiceRequest {
            name: required_string(planned, "name")?,
            display_name: required_string(planned, "display_name")?,
            description: optional_string(planned, "description"),
            client_id: required_string(planned, "client_id")?,
            client_secret: required_string(planned, "client_secret")?,
            authorization_url,
            token_url,
            userinfo_url: Self::optional_url(planned, "userinfo_url")?,
            icon_url: Self::optional_url(planned, "icon_url")?,
            homepage_url: Self::optional_url(planned, "homepage_url")?,
            default_scopes: optional_string_list(planned, "default_scopes").unwrap_or_default(),
            supported_grant_types: optional_string_list(planned, "supported_grant_types")
                .unwrap_or_default(),
            is_active: optional_bool(planned, "is_active").unwrap_or(true),
        })
    }

    fn build_update_request(
        planned: &DynamicValue,
        prior: &DynamicValue,
    ) -> Result<UpdateOAuthServiceRequest, Diagnostic> {
        let as_string = |v: &Dynamic| v.as_str().map(str::to_string);
        let url_diff = |name: &str| -> Result<Nullable<String>, Diagnostic> {
            Ok(match diff(planned, prior, name, as_string) {
                Nullable::Value(raw) => Nullable::Value(check_url(&raw, url_summary(name))?),
                other => other,
            })
        };

        Ok(UpdateOAuthServiceRequest {
            display_name: diff(planned, prior, "display_name", as_string),
            description: diff(planned, prior, "description", as_string),
            client_id: diff(planned, prior, "client_id", as_string),
            client_secret: diff(planned, prior, "client_secret", as_string),
            authorization_url: url_diff("authorization_url")?,
            token_url: url_diff("token_url")?,
            userinfo_url: url_diff("userinfo_url")?,
            icon_url: url_diff("icon_url")?,
            homepage_url: url_diff("homepage_url")?,
            default_scopes: diff(planned, prior, "default_scopes", Dynamic::as_string_list),
            supported_grant_types: diff(
                planned,
                prior,
                "supported_grant_types",
                Dynamic::as_string_list,
            ),
            is_active: diff(planned, prior, "is_active", Dynamic::as_bool),
        })
    }

    /// Merge the API view into state. `name` and `client_secret` stay as
    /// planned; `created_at` is only filled when not yet known.
    fn apply_response(state: &mut DynamicValue, service: &OAuthService) {
        let _ = state.set_string(&AttributePath::new("id"), service.id.to_string());
        let _ = state.set_string(&AttributePath::new("display_name"), service.display_name.clone());
        let _ = state.set_string(&AttributePath::new("client_id"), service.client_id.clone());
        let _ = state.set_string(
            &AttributePath::new("authorization_url"),
            service.authorization_url.clone(),
        );
        let _ = state.set_string(&AttributePath::new("token_url"), service.token_url.clone());
        let _ = state.set_bool(&AttributePath::new("is_active"), service.is_active);

        set_optional_string(state, "description", service.description.clone());
        set_optional_string(state, "userinfo_url", service.userinfo_url.clone());
        set_optional_string(state, "icon_url", service.icon_url.clone());
        set_optional_string(state, "homepage_url", service.homepage_url.clone());

        let _ = state.set_list(
            &AttributePath::new("default_scopes"),
            string_list(&service.default_scopes),
        );
        let _ = state.set_list(
            &AttributePath::new("supported_grant_types"),
            string_list(&service.supported_grant_types),
        );

        let created_at = AttributePath::new("created_at");
        if state.is_null_at(&created_at) || state.is_unknown_at(&created_at) {
            let _ = state.set_string(&created_at, service.created_at.clone());
        }
        let _ = state.set_string(&AttributePath::new("updated_at"), service.updated_at.clone());
    }
}

fn url_attribute(name: &str, description: &str, required: bool) -> tfplug::schema::Attribute {
    let builder = AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .validator(UrlValidator::create());
    if required {
        builder.required().build()
    } else {
        builder.optional().build()
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages an OAuth Service configuration in Devgraph")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the OAuth service")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the OAuth service (used as identifier)")
                .required()
                .plan_modifier(RequiresReplaceIfChanged::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("display_name", AttributeType::String)
                .description("The display name of the OAuth service")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("Description of the OAuth service")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("client_id", AttributeType::String)
                .description("The OAuth client ID")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("client_secret", AttributeType::String)
                .description("The OAuth client secret")
                .required()
                .sensitive()
                .build(),
        )
        .attribute(url_attribute(
            "authorization_url",
            "The OAuth authorization endpoint URL",
            true,
        ))
        .attribute(url_attribute("token_url", "The OAuth token endpoint URL", true))
        .attribute(url_attribute("userinfo_url", "The OAuth userinfo endpoint URL", false))
        .attribute(
            AttributeBuilder::new("default_scopes", AttributeType::List(Box::new(AttributeType::String)))
                .description("Default OAuth scopes to request")
                .optional()
                .computed()
                .default(StaticDefault::list(vec![]))
                .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "supported_grant_types",
                AttributeType::List(Box::new(AttributeType::String)),
            )
            .description("Supported OAuth grant types")
            .optional()
            .computed()
            .default(StaticDefault::list(vec![]))
            .build(),
        )
        .attribute(
            AttributeBuilder::new("is_active", AttributeType::Bool)
                .description("Whether the OAuth service is active")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .attribute(url_attribute("icon_url", "URL to the service icon", false))
        .attribute(url_attribute("homepage_url", "URL to the service homepage", false))
        .attribute(
            AttributeBuilder::new("created_at", AttributeType::String)
                .description("Timestamp when the OAuth service was created")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("updated_at", AttributeType::String)
                .description("Timestamp when the OAuth service was last updated")
                .computed()
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for OAuthServiceResource {
    fn type_name(&self) -> &str {
        "devgraph_oauth_service"
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

        match client.oauth().services().create(&create_request).await {
            Ok(service) => {
                info!(request_id = %ctx.request_id(), id = %service.id, service = %create_request.name, "created OAuth service");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &service);
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

        let raw_id = optional_string(&request.current_state, "id").unwrap_or_default();
        let prepared = client(&self.provider_data).and_then(|client| {
            parse_uuid(&raw_id, "Invalid OAuth Service ID").map(|id| (client, id))
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

        match client.oauth().services().get(&id).await {
            Ok(service) => {
                let mut new_state = request.current_state;
                // Imported state has no name yet; only then is the API value used
                if new_state.is_null_at(&AttributePath::new("name")) {
                    let _ = new_state.set_string(&AttributePath::new("name"), service.name.clone());
                }
                Self::apply_response(&mut new_state, &service);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(request_id = %ctx.request_id(), id = %id, "OAuth service no longer exists, removing from state");
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
            let id = parse_uuid(&raw_id, "Invalid OAuth Service ID")?;
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

        match client.oauth().services().update(&id, &update_request).await {
            Ok(service) => {
                info!(request_id = %ctx.request_id(), id = %id, "updated OAuth service");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &service);
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
        let prepared = client(&self.provider_data).and_then(|client| {
            parse_uuid(&raw_id, "Invalid OAuth Service ID").map(|id| (client, id))
        });
        let (client, id) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.oauth().services().delete(&id).await {
            Ok(()) => info!(request_id = %ctx.request_id(), id = %id, "deleted OAuth service"),
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for OAuthServiceResource {
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
impl ResourceWithImportState for OAuthServiceResource {
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
#[path = "./oauth_service_test.rs"]
mod oauth_service_test;
