//! Plan computation for resource changes.
//!
//! A change to any `requires_replace` attribute plans a destroy-then-create;
//! computed attributes are then left unknown (null) for the new object.
//! Otherwise computed attributes carry over from the prior state.

use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::model::AttributeMap;
use crate::provider::schema::Schema;

/// Result of planning one resource change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedChange {
    pub planned_state: AttributeMap,
    /// Attributes whose change forces replacement, sorted by name.
    pub requires_replace: Vec<String>,
}

impl PlannedChange {
    pub fn is_replacement(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

/// Plans the transition from `prior` (absent on create) to `proposed`.
pub fn plan_resource_change(
    schema: &Schema,
    prior: Option<&AttributeMap>,
    proposed: &AttributeMap,
) -> Result<PlannedChange, ProviderError> {
    schema.validate(proposed)?;

    let mut planned = proposed.clone();
    for name in schema.attributes.keys() {
        planned.entry(name.clone()).or_insert(Value::Null);
    }

    let Some(prior) = prior else {
        return Ok(PlannedChange {
            planned_state: planned,
            requires_replace: Vec::new(),
        });
    };

    let requires_replace: Vec<String> = schema
        .requires_replace_attributes()
        .filter(|name| prior.get(*name).unwrap_or(&Value::Null) != &planned[*name])
        .map(str::to_string)
        .collect();

    for name in schema.computed_attributes() {
        if !requires_replace.is_empty() {
            // The replacement object gets fresh values even if proposed carries old ones.
            planned.insert(name.to_string(), Value::Null);
        } else if planned[name].is_null() {
            planned.insert(name.to_string(), prior.get(name).cloned().unwrap_or(Value::Null));
        }
    }

    Ok(PlannedChange {
        planned_state: planned,
        requires_replace,
    })
}
