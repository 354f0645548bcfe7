//! Chat suggestion resource implementation
//!
//! Suggestions have no get or update endpoint. Reads scan the list and every
//! change replaces the suggestion.

use super::{
    api_failure, client, configure_provider_data, optional_bool, optional_string, parse_uuid,
    required_string, Operation,
};
use crate::api::chat::suggestions::{ChatSuggestion, CreateChatSuggestionRequest};
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

const ENTITY: &str = "chat suggestion";
const INVALID_ID: &str = "Invalid suggestion ID";

#[derive(Default)]
pub struct ChatSuggestionResource {
    provider_data: Option<crate::DevgraphProviderData>,
}

impl ChatSuggestionResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_create_request(
        planned: &DynamicValue,
    ) -> Result<CreateChatSuggestionRequest, Diagnostic> {
        Ok(CreateChatSuggestionRequest {
            title: required_string(planned, "title")?,
            label: required_string(planned, "label")?,
            action: required_string(planned, "action")?,
            active: optional_bool(planned, "active").unwrap_or(true),
        })
    }

    fn apply_response(state: &mut DynamicValue, suggestion: &ChatSuggestion) {
        let _ = state.set_string(&AttributePath::new("id"), suggestion.id.to_string());
        let _ = state.set_string(&AttributePath::new("title"), suggestion.title.clone());
        let _ = state.set_string(&AttributePath::new("label"), suggestion.label.clone());
        let _ = state.set_string(&AttributePath::new("action"), suggestion.action.clone());
        if let Some(active) = suggestion.active {
            let _ = state.set_bool(&AttributePath::new("active"), active);
        }
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description(
            "Manages a chat suggestion in Devgraph. Chat suggestions are quick-start prompts \
             shown to users in the chat interface",
        )
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the chat suggestion")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("title", AttributeType::String)
                .description("The title of the suggestion displayed to users")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("label", AttributeType::String)
                .description("A short label or category for the suggestion")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("action", AttributeType::String)
                .description("The action or prompt text used when the suggestion is clicked")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("active", AttributeType::Bool)
                .description("Whether this suggestion is active and should be shown to users")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for ChatSuggestionResource {
    fn type_name(&self) -> &str {
        "devgraph_chat_suggestion"
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

        match client.chat().suggestions().create(&create_request).await {
            Ok(suggestion) => {
                info!(request_id = %ctx.request_id(), id = %suggestion.id, "created chat suggestion");
                let mut new_state = request.planned_state;
                Self::apply_response(&mut new_state, &suggestion);
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
        let prepared = client(&self.provider_data)
            .and_then(|client| parse_uuid(&raw_id, INVALID_ID).map(|id| (client, id)));
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

        match client.chat().suggestions().find(&id.to_string()).await {
            Ok(Some(suggestion)) => {
                let mut new_state = request.current_state;
                Self::apply_response(&mut new_state, &suggestion);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                    private: request.private,
                }
            }
            Ok(None) => {
                warn!(request_id = %ctx.request_id(), id = %id, "chat suggestion not listed, removing from state");
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
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.prior_state,
            private: vec![],
            diagnostics: vec![Diagnostic::error(
                "Update not supported",
                "Chat suggestions cannot be updated. Please destroy and recreate the resource to make changes.",
            )],
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
            .and_then(|client| parse_uuid(&raw_id, INVALID_ID).map(|id| (client, id)));
        let (client, id) = match prepared {
            Ok(prepared) => prepared,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        match client.chat().suggestions().delete(&id).await {
            Ok(()) => info!(request_id = %ctx.request_id(), id = %id, "deleted chat suggestion"),
            Err(e) => diagnostics.push(api_failure(Operation::Delete, ENTITY, &e)),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ChatSuggestionResource {
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
impl ResourceWithImportState for ChatSuggestionResource {
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
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::{create_test_provider_data, plan_create, value};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const SUGGESTION_ID: &str = "0f1e2d3c-4b5a-4697-8877-665544332211";

    fn configured(url: &str) -> ChatSuggestionResource {
        ChatSuggestionResource {
            provider_data: Some(create_test_provider_data(url)),
        }
    }

    fn suggestion_json(id: &str, active: bool) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Find owners",
            "label": "ownership",
            "action": "Who owns the billing service?",
            "active": active
        })
    }

    #[tokio::test]
    async fn test_create_defaults_active_to_true() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/chat/suggestions")
            .match_body(Matcher::Json(json!({
                "title": "Find owners",
                "label": "ownership",
                "action": "Who owns the billing service?",
                "active": true
            })))
            .with_status(201)
            .with_body(suggestion_json(SUGGESTION_ID, true).to_string())
            .create_async()
            .await;

        let resource = configured(&server.url());
        let planned = plan_create(
            &schema(),
            json!({
                "title": "Find owners",
                "label": "ownership",
                "action": "Who owns the billing service?"
            }),
        );

        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("id")).unwrap(),
            SUGGESTION_ID
        );
    }

    #[tokio::test]
    async fn test_read_picks_matching_entry_from_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/chat/suggestions")
            .with_body(
                json!([
                    suggestion_json("00000000-0000-4000-8000-000000000001", true),
                    suggestion_json(SUGGESTION_ID, false)
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    current_state: value(json!({"id": SUGGESTION_ID, "active": true})),
                    private: vec![],
                },
            )
            .await;

        let state = response.new_state.unwrap();
        assert!(!state.get_bool(&AttributePath::new("active")).unwrap());
        assert_eq!(state.get_string(&AttributePath::new("label")).unwrap(), "ownership");
    }

    #[tokio::test]
    async fn test_read_drops_suggestion_missing_from_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/chat/suggestions")
            .with_body("[]")
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    current_state: value(json!({"id": SUGGESTION_ID})),
                    private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_update_is_refused() {
        let resource = configured("http://localhost:1");
        let prior = value(suggestion_json(SUGGESTION_ID, true));
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    prior_state: prior.clone(),
                    planned_state: value(suggestion_json(SUGGESTION_ID, false)),
                    config: value(suggestion_json(SUGGESTION_ID, false)),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Update not supported");
        assert_eq!(response.new_state, prior);
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    prior_state: value(json!({"id": "find-owners"})),
                    planned_private: vec![],
                },
            )
            .await;

        mock.assert_async().await;
        assert_eq!(response.diagnostics[0].summary, INVALID_ID);
    }

    #[tokio::test]
    async fn test_delete_calls_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "DELETE",
                format!("/api/v1/chat/suggestions/{}", SUGGESTION_ID).as_str(),
            )
            .with_status(204)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "devgraph_chat_suggestion".to_string(),
                    prior_state: value(suggestion_json(SUGGESTION_ID, true)),
                    planned_private: vec![],
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
    }
}
