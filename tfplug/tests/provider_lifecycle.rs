//! End-to-end lifecycle through the provider factory API

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan::{plan_resource_change, validate_config};
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, Provider, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    ValidateProviderConfigRequest, ValidateProviderConfigResponse,
};
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

/// In-memory backend shared between provider and resources
#[derive(Default)]
struct Store {
    items: RwLock<HashMap<String, String>>,
    next_id: AtomicUsize,
}

struct MemoryProvider {
    store: Arc<Store>,
    configured: bool,
}

impl MemoryProvider {
    fn new() -> Self {
        Self {
            store: Arc::new(Store::default()),
            configured: false,
        }
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    fn type_name(&self) -> &str {
        "memory"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "memory".to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: SchemaBuilder::new().build(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        _request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        self.configured = true;
        ConfigureProviderResponse {
            diagnostics: vec![],
            provider_data: Some(self.store.clone() as Arc<dyn std::any::Any + Send + Sync>),
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: vec![],
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "memory_item".to_string(),
            Box::new(|| Box::new(ItemResource::default()) as Box<dyn ResourceWithConfigure>),
        );
        factories
    }
}

#[derive(Default)]
struct ItemResource {
    store: Option<Arc<Store>>,
}

fn item_schema() -> Schema {
    SchemaBuilder::new()
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("value", AttributeType::String)
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("enabled", AttributeType::Bool)
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for ItemResource {
    fn type_name(&self) -> &str {
        "memory_item"
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
            schema: item_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: validate_config(&item_schema(), &request.config),
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let store = self.store.as_ref().unwrap();
        let id = format!("item-{}", store.next_id.fetch_add(1, Ordering::SeqCst));
        let value = request
            .planned_state
            .get_string(&AttributePath::new("value"))
            .unwrap();
        store.items.write().await.insert(id.clone(), value);

        let mut new_state = request.planned_state;
        new_state.set_string(&AttributePath::new("id"), id).unwrap();
        CreateResourceResponse {
            new_state,
            private: vec![],
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let store = self.store.as_ref().unwrap();
        let id = request
            .current_state
            .get_string(&AttributePath::new("id"))
            .unwrap();
        let new_state = store.items.read().await.get(&id).map(|value| {
            let mut state = request.current_state.clone();
            state
                .set_string(&AttributePath::new("value"), value.clone())
                .unwrap();
            if state.is_null_at(&AttributePath::new("enabled")) {
                state
                    .set_bool(&AttributePath::new("enabled"), true)
                    .unwrap();
            }
            state
        });
        ReadResourceResponse {
            new_state,
            diagnostics: vec![],
            private: request.private,
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let store = self.store.as_ref().unwrap();
        let id = request
            .prior_state
            .get_string(&AttributePath::new("id"))
            .unwrap();
        let value = request
            .planned_state
            .get_string(&AttributePath::new("value"))
            .unwrap();
        store.items.write().await.insert(id, value);
        UpdateResourceResponse {
            new_state: request.planned_state,
            private: vec![],
            diagnostics: vec![],
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let store = self.store.as_ref().unwrap();
        let id = request
            .prior_state
            .get_string(&AttributePath::new("id"))
            .unwrap();
        store.items.write().await.remove(&id);
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for ItemResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        match request
            .provider_data
            .and_then(|data| data.downcast::<Store>().ok())
        {
            Some(store) => self.store = Some(store),
            None => diagnostics.push(Diagnostic::error("Invalid provider data", "expected Store")),
        }
        ConfigureResourceResponse { diagnostics }
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }
}

#[async_trait]
impl ResourceWithImportState for ItemResource {
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

async fn configured_resource(provider: &mut MemoryProvider) -> Box<dyn ResourceWithConfigure> {
    let configured = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config: DynamicValue::object(),
            },
        )
        .await;
    assert!(configured.diagnostics.is_empty());

    let factories = provider.resources();
    let mut resource = factories.get("memory_item").unwrap()();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: configured.provider_data,
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

fn config(value: &str) -> DynamicValue {
    let mut config = DynamicValue::object();
    config
        .set_string(&AttributePath::new("value"), value.to_string())
        .unwrap();
    config
}

#[tokio::test]
async fn test_factory_keys_match_resource_type_names() {
    let provider = MemoryProvider::new();
    for (name, factory) in provider.resources() {
        assert_eq!(factory().type_name(), name);
    }
}

#[tokio::test]
async fn test_plan_create_read_update_delete() {
    let mut provider = MemoryProvider::new();
    let resource = configured_resource(&mut provider).await;
    let schema = resource
        .schema(Context::new(), ResourceSchemaRequest)
        .await
        .schema;

    let validated = resource
        .validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "memory_item".to_string(),
                config: config("first"),
            },
        )
        .await;
    assert!(validated.diagnostics.is_empty());

    let plan = plan_resource_change(&schema, &DynamicValue::null(), &config("first"));
    assert!(plan
        .planned_state
        .is_unknown_at(&AttributePath::new("id")));

    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "memory_item".to_string(),
                planned_state: plan.planned_state,
                config: config("first"),
                planned_private: vec![],
            },
        )
        .await;
    assert!(created.diagnostics.is_empty());
    assert!(created
        .new_state
        .get_bool(&AttributePath::new("enabled"))
        .unwrap());

    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "memory_item".to_string(),
                current_state: created.new_state.clone(),
                private: vec![],
            },
        )
        .await;
    assert_eq!(read.new_state.as_ref(), Some(&created.new_state));

    let plan = plan_resource_change(&schema, &created.new_state, &config("second"));
    assert_eq!(
        plan.planned_state.get_string(&AttributePath::new("id")).unwrap(),
        created.new_state.get_string(&AttributePath::new("id")).unwrap()
    );
    let updated = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "memory_item".to_string(),
                prior_state: created.new_state.clone(),
                planned_state: plan.planned_state,
                config: config("second"),
                planned_private: vec![],
            },
        )
        .await;
    assert_eq!(
        updated
            .new_state
            .get_string(&AttributePath::new("value"))
            .unwrap(),
        "second"
    );

    let deleted = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "memory_item".to_string(),
                prior_state: updated.new_state.clone(),
                planned_private: vec![],
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());

    let gone = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "memory_item".to_string(),
                current_state: updated.new_state,
                private: vec![],
            },
        )
        .await;
    assert!(gone.new_state.is_none());
}

#[tokio::test]
async fn test_import_then_read_restores_state() {
    let mut provider = MemoryProvider::new();
    let resource = configured_resource(&mut provider).await;

    provider
        .store
        .items
        .write()
        .await
        .insert("existing".to_string(), "from-elsewhere".to_string());

    let importer = resource.as_import_state().unwrap();
    let imported = importer
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: "memory_item".to_string(),
                id: "existing".to_string(),
            },
        )
        .await;
    assert!(imported.diagnostics.is_empty());

    let state = imported.imported_resources[0].state.clone();
    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "memory_item".to_string(),
                current_state: state,
                private: vec![],
            },
        )
        .await;
    let state = read.new_state.unwrap();
    assert_eq!(
        state.get_string(&AttributePath::new("value")).unwrap(),
        "from-elsewhere"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_creates_get_distinct_ids() {
    let mut provider = MemoryProvider::new();
    let resource = Arc::new(configured_resource(&mut provider).await);
    let schema = item_schema();

    let creates = (0..10).map(|i| {
        let resource = resource.clone();
        let plan = plan_resource_change(&schema, &DynamicValue::null(), &config(&i.to_string()));
        tokio::spawn(async move {
            resource
                .create(
                    Context::new(),
                    CreateResourceRequest {
                        type_name: "memory_item".to_string(),
                        planned_state: plan.planned_state,
                        config: DynamicValue::null(),
                        planned_private: vec![],
                    },
                )
                .await
                .new_state
                .get_string(&AttributePath::new("id"))
                .unwrap()
        })
    });

    let mut ids: Vec<String> = join_all(creates)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert_eq!(provider.store.items.read().await.len(), 10);
}

#[tokio::test]
async fn test_unconfigured_data_is_rejected() {
    let provider = MemoryProvider::new();
    let mut resource = provider.resources().get("memory_item").unwrap()();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(Arc::new("wrong".to_string())),
            },
        )
        .await;
    assert_eq!(response.diagnostics.len(), 1);
    tokio_test::assert_ok!(provider.store.items.try_read());
}
