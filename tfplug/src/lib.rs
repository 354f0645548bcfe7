//! tfplug - Terraform Plugin Framework for Rust
//!
//! Provider, resource and schema building blocks for writing Terraform
//! providers in Rust, plus the planning engine that turns config and prior
//! state into a planned state.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod logging;
pub mod plan;
pub mod plan_modifier;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use logging::{init_logging, try_init_logging};
pub use plan::{plan_resource_change, validate_config, PlannedChange};
pub use provider::{Provider, ProviderMetadataRequest, ProviderMetadataResponse, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
