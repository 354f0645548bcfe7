//! Resource implementations
//!
//! Every resource follows the same shape: a free `schema()` function, a
//! `validate` that runs the schema checks, and CRUD methods that translate
//! between Terraform state and the API models. The helpers below hold the
//! pieces they all share.

pub mod chat_suggestion;
pub mod discovery_provider;
pub mod environment;
pub mod mcp_endpoint;
pub mod model;
pub mod model_provider;
pub mod oauth_service;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use chat_suggestion::ChatSuggestionResource;
pub use discovery_provider::DiscoveryProviderResource;
pub use environment::EnvironmentResource;
pub use mcp_endpoint::McpEndpointResource;
pub use model::ModelResource;
pub use model_provider::ModelProviderResource;
pub use oauth_service::OAuthServiceResource;

use crate::api::{ApiError, Client, Nullable};
use crate::DevgraphProviderData;
use std::collections::HashMap;
use tfplug::plan_modifier::values_equal;
use tfplug::resource::{ConfigureResourceRequest, ConfigureResourceResponse};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use uuid::Uuid;

/// Store the provider data handed over by `ResourceWithConfigure::configure`
pub(crate) fn configure_provider_data(
    slot: &mut Option<DevgraphProviderData>,
    request: ConfigureResourceRequest,
) -> ConfigureResourceResponse {
    let mut diagnostics = vec![];

    if let Some(data) = request.provider_data {
        if let Some(provider_data) = data.downcast_ref::<DevgraphProviderData>() {
            *slot = Some(provider_data.clone());
        } else {
            diagnostics.push(Diagnostic::error(
                "Invalid provider data",
                "Failed to extract DevgraphProviderData from provider data",
            ));
        }
    } else {
        diagnostics.push(Diagnostic::error(
            "No provider data",
            "No provider data was provided to the resource",
        ));
    }

    ConfigureResourceResponse { diagnostics }
}

pub(crate) fn client(provider_data: &Option<DevgraphProviderData>) -> Result<&Client, Diagnostic> {
    provider_data
        .as_ref()
        .map(|data| data.client.as_ref())
        .ok_or_else(|| {
            Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )
        })
}

/// Lifecycle step a remote call belonged to, used to word API failures
#[derive(Debug, Clone, Copy)]
pub(crate) enum Operation<'a> {
    Create,
    Read { id: &'a str },
    Update,
    Delete,
}

/// Turn an API failure into the diagnostic reported to Terraform
pub(crate) fn api_failure(operation: Operation<'_>, entity: &str, err: &ApiError) -> Diagnostic {
    if let ApiError::ParseError(message) = err {
        return Diagnostic::error(
            "Unexpected response type",
            format!("Could not decode the {} response: {}", entity, message),
        );
    }

    match operation {
        Operation::Create => Diagnostic::error(
            format!("Error creating {}", entity),
            format!("Could not create {}: {}", entity, err),
        ),
        Operation::Read { id } => Diagnostic::error(
            format!("Error reading {}", entity),
            format!("Could not read {} ID {}: {}", entity, id, err),
        ),
        Operation::Update => Diagnostic::error(
            format!("Error updating {}", entity),
            format!("Could not update {}: {}", entity, err),
        ),
        Operation::Delete => Diagnostic::error(
            format!("Error deleting {}", entity),
            format!("Could not delete {}: {}", entity, err),
        ),
    }
}

pub(crate) fn parse_uuid(value: &str, summary: &str) -> Result<Uuid, Diagnostic> {
    Uuid::parse_str(value).map_err(|e| Diagnostic::error(summary, e.to_string()))
}

pub(crate) fn required_string(value: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    optional_string(value, name).ok_or_else(|| {
        Diagnostic::error(
            format!("Missing {}", name),
            format!("The '{}' attribute is required", name),
        )
        .with_attribute(AttributePath::new(name))
    })
}

/// Null and unknown both read as None
pub(crate) fn optional_string(value: &DynamicValue, name: &str) -> Option<String> {
    value
        .get_dynamic(&AttributePath::new(name))
        .as_str()
        .map(str::to_string)
}

pub(crate) fn optional_bool(value: &DynamicValue, name: &str) -> Option<bool> {
    value.get_dynamic(&AttributePath::new(name)).as_bool()
}

pub(crate) fn optional_number(value: &DynamicValue, name: &str) -> Option<f64> {
    value.get_dynamic(&AttributePath::new(name)).as_number()
}

pub(crate) fn optional_string_list(value: &DynamicValue, name: &str) -> Option<Vec<String>> {
    value.get_dynamic(&AttributePath::new(name)).as_string_list()
}

pub(crate) fn optional_string_map(
    value: &DynamicValue,
    name: &str,
) -> Option<HashMap<String, String>> {
    value.get_dynamic(&AttributePath::new(name)).as_string_map()
}

/// Compare one attribute between plan and prior state for a PATCH body.
///
/// Unchanged and unknown values are omitted, a value planned as null is sent
/// as an explicit null.
pub(crate) fn diff<T>(
    planned: &DynamicValue,
    prior: &DynamicValue,
    name: &str,
    extract: impl FnOnce(&Dynamic) -> Option<T>,
) -> Nullable<T> {
    let path = AttributePath::new(name);
    let planned_value = planned.get_dynamic(&path);

    if planned_value.is_unknown() || values_equal(&planned_value, &prior.get_dynamic(&path)) {
        return Nullable::Omit;
    }
    if planned_value.is_null() {
        return Nullable::Null;
    }

    match extract(&planned_value) {
        Some(value) => Nullable::Value(value),
        None => Nullable::Omit,
    }
}

pub(crate) fn set_optional_string(state: &mut DynamicValue, name: &str, value: Option<String>) {
    let path = AttributePath::new(name);
    let _ = match value {
        Some(v) => state.set_string(&path, v),
        None => state.set_null(&path),
    };
}

pub(crate) fn string_list(items: &[String]) -> Vec<Dynamic> {
    items.iter().cloned().map(Dynamic::String).collect()
}

pub(crate) fn string_map(entries: &HashMap<String, String>) -> HashMap<String, Dynamic> {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), Dynamic::String(v.clone())))
        .collect()
}
