//! Test helpers shared by the resource tests

#![allow(clippy::disallowed_methods)]

use crate::api::Client;
use crate::DevgraphProviderData;
use tfplug::plan::plan_resource_change;
use tfplug::schema::Schema;
use tfplug::types::DynamicValue;

/// Provider data pointing at `url`. Installs the tracing subscriber so
/// resource logs show up in failing test output.
pub fn create_test_provider_data(url: &str) -> DevgraphProviderData {
    let _ = tfplug::try_init_logging();
    DevgraphProviderData::new(Client::new(url, "test-token", None).unwrap())
}

/// Build a value from JSON, e.g. `value(json!({"name": "x"}))`
pub fn value(json: serde_json::Value) -> DynamicValue {
    DynamicValue::decode_json(json.to_string().as_bytes()).unwrap()
}

/// Planned state for a fresh resource
pub fn plan_create(schema: &Schema, config: serde_json::Value) -> DynamicValue {
    let change = plan_resource_change(schema, &DynamicValue::null(), &value(config));
    assert!(change.diagnostics.is_empty(), "{:?}", change.diagnostics);
    change.planned_state
}

/// Planned state for an in-place change of `prior`
pub fn plan_update(schema: &Schema, prior: &DynamicValue, config: serde_json::Value) -> DynamicValue {
    let change = plan_resource_change(schema, prior, &value(config));
    assert!(change.diagnostics.is_empty(), "{:?}", change.diagnostics);
    change.planned_state
}

#[test]
fn test_provider_data_installs_tracing_subscriber() {
    let _ = create_test_provider_data("http://localhost:1");
    assert!(tracing::dispatcher::has_been_set());
}
