//! Config validation and plan computation
//!
//! The schema-driven half of the plugin protocol, independent of any wire
//! transport. Given a resource schema, prior state and configuration this
//! produces the planned state Terraform will hand back to `create`/`update`:
//!
//! 1. configured values are taken as-is (including unknowns)
//! 2. unset optional+computed attributes with a default take the default
//! 3. unset computed attributes become unknown when anything changes
//! 4. plan modifiers run per attribute and may request replacement

use crate::plan_modifier::values_equal;
use crate::schema::{DefaultRequest, PlanModifierRequest, Schema, ValidatorRequest};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use std::collections::HashMap;

/// Result of planning a single resource instance
#[derive(Debug)]
pub struct PlannedChange {
    /// Null when the resource is planned for destruction
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlannedChange {
    pub fn is_destroy(&self) -> bool {
        self.planned_state.is_null()
    }

    pub fn is_replace(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

/// Check a configuration against its schema and run attribute validators
pub fn validate_config(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.is_unknown() {
        return diagnostics;
    }

    for attr in &schema.block.attributes {
        let path = AttributePath::new(&attr.name);
        let value = config.get_dynamic(&path);

        if attr.required && value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                )
                .with_attribute(path),
            );
            continue;
        }

        if value.is_null() || value.is_unknown() {
            continue;
        }

        if attr.computed && !attr.optional && !attr.required {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for this attribute as the provider has marked it as read-only. Remove the configuration line setting the value: {}", attr.name),
                )
                .with_attribute(path),
            );
            continue;
        }

        if !attr.r#type.accepts(&value) {
            diagnostics.push(
                Diagnostic::error(
                    "Incorrect attribute value type",
                    format!(
                        "Attribute \"{}\" expects {:?} but got {}",
                        attr.name,
                        attr.r#type,
                        value.type_name()
                    ),
                )
                .with_attribute(path),
            );
            continue;
        }

        for validator in &attr.validators {
            let response = validator.validate(ValidatorRequest {
                config_value: value.clone(),
                path: path.clone(),
            });
            diagnostics.extend(response.diagnostics);
        }
    }

    if let Dynamic::Map(values) = &config.value {
        let mut unsupported: Vec<&String> = values
            .keys()
            .filter(|name| schema.attribute(name).is_none())
            .collect();
        unsupported.sort();
        for name in unsupported {
            diagnostics.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", name),
                )
                .with_attribute(AttributePath::new(name)),
            );
        }
    }

    diagnostics
}

/// Compute the planned state for a resource
pub fn plan_resource_change(
    schema: &Schema,
    prior_state: &DynamicValue,
    config: &DynamicValue,
) -> PlannedChange {
    if config.is_null() {
        return PlannedChange {
            planned_state: DynamicValue::null(),
            requires_replace: vec![],
            diagnostics: vec![],
        };
    }

    let creating = prior_state.is_null();
    let mut planned: HashMap<String, Dynamic> = HashMap::new();
    let mut unset_computed = Vec::new();

    for attr in &schema.block.attributes {
        let path = AttributePath::new(&attr.name);
        let config_value = config.get_dynamic(&path);

        let value = if !config_value.is_null() {
            config_value
        } else if let Some(default) = attr
            .default
            .as_ref()
            .filter(|_| attr.optional && attr.computed)
        {
            default.default_value(DefaultRequest { path }).value
        } else if attr.computed {
            unset_computed.push(attr.name.as_str());
            prior_state.get_dynamic(&path)
        } else {
            Dynamic::Null
        };

        planned.insert(attr.name.clone(), value);
    }

    let changed = creating
        || planned.iter().any(|(name, value)| {
            !unset_computed.contains(&name.as_str())
                && !values_equal(value, &prior_state.get_dynamic(&AttributePath::new(name)))
        });

    if changed {
        for name in unset_computed {
            planned.insert(name.to_string(), Dynamic::Unknown);
        }
    }

    let mut requires_replace = Vec::new();
    let mut diagnostics = Vec::new();

    for attr in &schema.block.attributes {
        if attr.plan_modifiers.is_empty() {
            continue;
        }

        let path = AttributePath::new(&attr.name);
        let state_value = prior_state.get_dynamic(&path);
        let config_value = config.get_dynamic(&path);
        let mut plan_value = planned.remove(&attr.name).unwrap_or(Dynamic::Null);
        let mut replace = false;

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifierRequest {
                config_value: config_value.clone(),
                state_value: state_value.clone(),
                plan_value,
                path: path.clone(),
            });
            plan_value = response.plan_value;
            replace |= response.requires_replace;
            diagnostics.extend(response.diagnostics);
        }

        if replace && !creating {
            requires_replace.push(path);
        }
        planned.insert(attr.name.clone(), plan_value);
    }

    PlannedChange {
        planned_state: DynamicValue::new(Dynamic::Map(planned)),
        requires_replace,
        diagnostics,
    }
}
