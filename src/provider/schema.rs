//! Attribute schema declarations for resources and data sources.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::model::AttributeMap;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    ListNested,
}

/// One attribute of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub computed: bool,
    /// A change to this attribute destroys and recreates the resource.
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<BTreeMap<String, Attribute>>,
}

impl Attribute {
    pub fn required_string() -> Self {
        Self {
            kind: AttributeType::String,
            required: true,
            computed: false,
            requires_replace: false,
            nested: None,
        }
    }

    pub fn computed_string() -> Self {
        Self {
            kind: AttributeType::String,
            required: false,
            computed: true,
            requires_replace: false,
            nested: None,
        }
    }

    /// Computed list whose elements are objects of `nested` attributes.
    pub fn computed_list_nested(nested: BTreeMap<String, Attribute>) -> Self {
        Self {
            kind: AttributeType::ListNested,
            required: false,
            computed: true,
            requires_replace: false,
            nested: Some(nested),
        }
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    fn check(&self, name: &str, value: &Value) -> Result<(), ProviderError> {
        let matches = match (self.kind, value) {
            (_, Value::Null) => true,
            (AttributeType::String, Value::String(_)) => true,
            (AttributeType::ListNested, Value::Array(_)) => true,
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(ProviderError::InvalidAttribute {
                name: name.to_string(),
                reason: format!("expected {:?}, got {value}", self.kind),
            })
        }
    }
}

/// Schema of a resource or data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Names of attributes whose change forces replacement.
    pub fn requires_replace_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.requires_replace)
            .map(|(name, _)| name.as_str())
    }

    /// Names of attributes computed by the provider.
    pub fn computed_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, a)| a.computed)
            .map(|(name, _)| name.as_str())
    }

    /// Checks a configuration against the schema: every required attribute
    /// present and non-null, no undeclared attributes, values of the declared
    /// type.
    pub fn validate(&self, attributes: &AttributeMap) -> Result<(), ProviderError> {
        for (name, value) in attributes {
            let attribute = self
                .attributes
                .get(name)
                .ok_or_else(|| ProviderError::InvalidAttribute {
                    name: name.clone(),
                    reason: "attribute is not declared in the schema".to_string(),
                })?;
            attribute.check(name, value)?;
        }

        for (name, attribute) in &self.attributes {
            if attribute.required && attributes.get(name).map_or(true, Value::is_null) {
                return Err(ProviderError::MissingAttribute(name.clone()));
            }
        }

        Ok(())
    }
}
