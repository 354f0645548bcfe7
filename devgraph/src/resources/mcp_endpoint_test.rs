#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::resources::test_helpers::{
        create_test_provider_data, plan_create, plan_update, value,
    };
    use mockito::{Matcher, Server};
    use serde_json::json;

    const ENDPOINT_ID: &str = "0d6f3b1e-5c8a-4f5e-9a43-7d2c1e9b8a10";

    fn configured(url: &str) -> McpEndpointResource {
        McpEndpointResource {
            provider_data: Some(create_test_provider_data(url)),
        }
    }

    fn endpoint_body(name: &str, description: Option<&str>) -> String {
        json!({
            "id": ENDPOINT_ID,
            "name": name,
            "url": "https://mcp.example.com/sse",
            "description": description,
            "headers": {"X-Team": "core"},
            "devgraph_auth": false,
            "supports_resources": false,
            "oauth_service_id": null,
            "immutable": false,
            "active": true
        })
        .to_string()
    }

    #[test]
    fn test_schema_flags() {
        let schema = schema();
        assert!(schema.attribute("name").unwrap().required);
        assert!(schema.attribute("id").unwrap().computed);
        let headers = schema.attribute("headers").unwrap();
        assert!(headers.optional && headers.computed);
        assert!(!schema.attribute("allowed_tools").unwrap().computed);
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_oauth_service_id() {
        let resource = McpEndpointResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    config: value(json!({
                        "name": "docs",
                        "url": "https://mcp.example.com/sse",
                        "oauth_service_id": "not-a-uuid"
                    })),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].attribute,
            Some(AttributePath::new("oauth_service_id"))
        );
    }

    #[tokio::test]
    async fn test_create_sends_only_populated_collections() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/mcp/endpoints")
            .match_body(Matcher::Json(json!({
                "name": "docs",
                "url": "https://mcp.example.com/sse",
                "headers": {"X-Team": "core"},
                "devgraph_auth": false,
                "supports_resources": false,
                "immutable": false,
                "active": true,
                "allowed_tools": ["search"]
            })))
            .with_status(201)
            .with_body(endpoint_body("docs", None))
            .create_async()
            .await;

        let resource = configured(&server.url());
        let planned = plan_create(
            &schema(),
            json!({
                "name": "docs",
                "url": "https://mcp.example.com/sse",
                "headers": {"X-Team": "core"},
                "allowed_tools": ["search"],
                "denied_tools": []
            }),
        );

        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        mock.assert_async().await;

        let state = response.new_state;
        assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), ENDPOINT_ID);
        assert!(state.is_null_at(&AttributePath::new("description")));
        assert!(state.is_null_at(&AttributePath::new("oauth_service_id")));
        assert!(state.get_bool(&AttributePath::new("active")).unwrap());
    }

    #[tokio::test]
    async fn test_create_with_invalid_oauth_service_id_makes_no_call() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/mcp/endpoints")
            .expect(0)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let planned = plan_create(
            &schema(),
            json!({
                "name": "docs",
                "url": "https://mcp.example.com/sse",
                "oauth_service_id": "nope"
            }),
        );

        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Invalid OAuth Service ID");
        assert!(response.new_state.is_null());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_keeps_state_in_sync() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", format!("/api/v1/mcp/endpoints/{}", ENDPOINT_ID).as_str())
            .with_body(endpoint_body("docs", Some("Docs search")))
            .create_async()
            .await;

        let resource = configured(&server.url());
        let current = value(json!({
            "id": ENDPOINT_ID,
            "name": "docs",
            "url": "https://mcp.example.com/sse",
            "description": "Docs search",
            "headers": {"X-Team": "core"},
            "devgraph_auth": false,
            "supports_resources": false,
            "oauth_service_id": null,
            "immutable": false,
            "active": true,
            "allowed_tools": null,
            "denied_tools": null
        }));

        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    current_state: current.clone(),
                    private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.new_state, Some(current));
    }

    #[tokio::test]
    async fn test_read_removes_missing_endpoint() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", format!("/api/v1/mcp/endpoints/{}", ENDPOINT_ID).as_str())
            .with_status(404)
            .with_body(r#"{"detail":"MCP endpoint not found"}"#)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    current_state: value(json!({"id": ENDPOINT_ID, "name": "docs"})),
                    private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_update_sends_changed_fields_only() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", format!("/api/v1/mcp/endpoints/{}", ENDPOINT_ID).as_str())
            .match_body(Matcher::Json(json!({"name": "docs-v2", "description": null})))
            .with_body(endpoint_body("docs-v2", None))
            .create_async()
            .await;

        let resource = configured(&server.url());
        let prior = value(json!({
            "id": ENDPOINT_ID,
            "name": "docs",
            "url": "https://mcp.example.com/sse",
            "description": "old",
            "headers": {"X-Team": "core"},
            "devgraph_auth": false,
            "supports_resources": false,
            "oauth_service_id": null,
            "immutable": false,
            "active": true,
            "allowed_tools": null,
            "denied_tools": null
        }));
        let planned = plan_update(
            &schema(),
            &prior,
            json!({
                "name": "docs-v2",
                "url": "https://mcp.example.com/sse",
                "headers": {"X-Team": "core"}
            }),
        );

        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    prior_state: prior,
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        mock.assert_async().await;
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("name")).unwrap(),
            "docs-v2"
        );
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("id")).unwrap(),
            ENDPOINT_ID
        );
    }

    #[tokio::test]
    async fn test_delete_reports_api_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", format!("/api/v1/mcp/endpoints/{}", ENDPOINT_ID).as_str())
            .with_status(409)
            .with_body(r#"{"detail":"Endpoint is in use"}"#)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    prior_state: value(json!({"id": ENDPOINT_ID})),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Error deleting MCP endpoint");
        assert!(response.diagnostics[0].detail.contains("Endpoint is in use"));
    }

    #[tokio::test]
    async fn test_unconfigured_resource_reports_error() {
        let resource = McpEndpointResource::new();
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    prior_state: value(json!({"id": ENDPOINT_ID})),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
    }

    #[tokio::test]
    async fn test_import_sets_id() {
        let resource = McpEndpointResource::new();
        let importer = resource.as_import_state().unwrap();
        let response = importer
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "devgraph_mcp_endpoint".to_string(),
                    id: ENDPOINT_ID.to_string(),
                },
            )
            .await;

        assert_eq!(response.imported_resources.len(), 1);
        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            ENDPOINT_ID
        );
    }
}
