//! Bidirectional mappings between provider models and attribute maps.
//!
//! Each model has an explicit `from_attributes` / `to_attributes` pair; the
//! attribute map is the JSON object exchanged with the plugin runtime.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::docker::NetworkDetails;
use crate::error::{DockerError, ProviderError};

/// Attribute values keyed by schema attribute name.
pub type AttributeMap = serde_json::Map<String, Value>;

pub const ATTR_ID: &str = "id";
pub const ATTR_CREATED: &str = "created";
pub const ATTR_NAME: &str = "name";
pub const ATTR_SUBNET: &str = "subnet";
pub const ATTR_GATEWAY: &str = "gateway";
pub const ATTR_NETWORKS: &str = "networks";

/// Parses a JSON object into an attribute map.
pub fn parse_attributes(json: &str) -> Result<AttributeMap, ProviderError> {
    match serde_json::from_str(json)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(AttributeMap::new()),
        other => Err(ProviderError::InvalidAttribute {
            name: "<root>".to_string(),
            reason: format!("expected object, got {other}"),
        }),
    }
}

/// Reads an optional string attribute; absent and null both map to `None`.
pub fn optional_string(attrs: &AttributeMap, name: &str) -> Result<Option<String>, ProviderError> {
    match attrs.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ProviderError::InvalidAttribute {
            name: name.to_string(),
            reason: format!("expected string, got {other}"),
        }),
    }
}

/// Reads a string attribute that must be set.
pub fn required_string(attrs: &AttributeMap, name: &str) -> Result<String, ProviderError> {
    optional_string(attrs, name)?.ok_or_else(|| ProviderError::MissingAttribute(name.to_string()))
}

fn optional_value(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}

/// Formats a timestamp as RFC3339 with up to nanosecond precision.
///
/// Trailing zeros of the fraction are trimmed, and the fraction is dropped
/// entirely when it is zero.
pub fn format_timestamp<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let formatted = time.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some(dot) = formatted.find('.') else {
        return formatted;
    };
    let end = formatted[dot + 1..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(formatted.len(), |i| dot + 1 + i);
    let fraction = formatted[dot + 1..end].trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}{}", &formatted[..dot], &formatted[end..])
    } else {
        format!("{}.{}{}", &formatted[..dot], fraction, &formatted[end..])
    }
}

/// Current wall-clock time, formatted for the `created` attribute.
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Normalises the daemon's creation timestamp. Unparseable values pass through.
fn daemon_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => format_timestamp(&time),
        Err(e) => {
            tracing::debug!(created = raw, error = %e, "Unparseable daemon timestamp");
            raw.to_string()
        }
    }
}

/// State of one `<provider>_network` resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkResourceModel {
    pub id: Option<String>,
    pub created: Option<String>,
    pub name: String,
    pub subnet: String,
    pub gateway: String,
}

impl NetworkResourceModel {
    pub fn from_attributes(attrs: &AttributeMap) -> Result<Self, ProviderError> {
        Ok(Self {
            id: optional_string(attrs, ATTR_ID)?,
            created: optional_string(attrs, ATTR_CREATED)?,
            name: required_string(attrs, ATTR_NAME)?,
            subnet: required_string(attrs, ATTR_SUBNET)?,
            gateway: required_string(attrs, ATTR_GATEWAY)?,
        })
    }

    pub fn to_attributes(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert(ATTR_ID.to_string(), optional_value(&self.id));
        attrs.insert(ATTR_CREATED.to_string(), optional_value(&self.created));
        attrs.insert(ATTR_NAME.to_string(), Value::String(self.name.clone()));
        attrs.insert(ATTR_SUBNET.to_string(), Value::String(self.subnet.clone()));
        attrs.insert(ATTR_GATEWAY.to_string(), Value::String(self.gateway.clone()));
        attrs
    }

    /// Builds the full state from an inspected network, overwriting every
    /// attribute with the daemon's view.
    pub fn from_details(details: &NetworkDetails) -> Result<Self, DockerError> {
        let ipam = details.primary_ipam()?;
        Ok(Self {
            id: Some(details.id.clone()),
            created: details.created.as_deref().map(daemon_timestamp),
            name: details.name.clone(),
            subnet: ipam.subnet.clone().unwrap_or_default(),
            gateway: ipam.gateway.clone().unwrap_or_default(),
        })
    }
}

/// One element of the `networks` list of the `<provider>_networks` data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSummaryModel {
    pub id: String,
    pub name: String,
    pub subnet: String,
    pub gateway: String,
}

impl NetworkSummaryModel {
    pub fn from_attributes(attrs: &AttributeMap) -> Result<Self, ProviderError> {
        Ok(Self {
            id: required_string(attrs, ATTR_ID)?,
            name: required_string(attrs, ATTR_NAME)?,
            subnet: required_string(attrs, ATTR_SUBNET)?,
            gateway: required_string(attrs, ATTR_GATEWAY)?,
        })
    }

    pub fn to_attributes(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert(ATTR_ID.to_string(), Value::String(self.id.clone()));
        attrs.insert(ATTR_NAME.to_string(), Value::String(self.name.clone()));
        attrs.insert(ATTR_SUBNET.to_string(), Value::String(self.subnet.clone()));
        attrs.insert(ATTR_GATEWAY.to_string(), Value::String(self.gateway.clone()));
        attrs
    }

    pub fn from_details(details: &NetworkDetails) -> Result<Self, DockerError> {
        let ipam = details.primary_ipam()?;
        Ok(Self {
            id: details.id.clone(),
            name: details.name.clone(),
            subnet: ipam.subnet.clone().unwrap_or_default(),
            gateway: ipam.gateway.clone().unwrap_or_default(),
        })
    }
}

/// State of the `<provider>_networks` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworksDataSourceModel {
    pub networks: Vec<NetworkSummaryModel>,
}

impl NetworksDataSourceModel {
    pub fn from_attributes(attrs: &AttributeMap) -> Result<Self, ProviderError> {
        let networks = match attrs.get(ATTR_NETWORKS) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => NetworkSummaryModel::from_attributes(map),
                    other => Err(ProviderError::InvalidAttribute {
                        name: ATTR_NETWORKS.to_string(),
                        reason: format!("expected object element, got {other}"),
                    }),
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(ProviderError::InvalidAttribute {
                    name: ATTR_NETWORKS.to_string(),
                    reason: format!("expected list, got {other}"),
                })
            }
        };
        Ok(Self { networks })
    }

    pub fn to_attributes(&self) -> AttributeMap {
        let networks = self
            .networks
            .iter()
            .map(|n| Value::Object(n.to_attributes()))
            .collect();
        let mut attrs = AttributeMap::new();
        attrs.insert(ATTR_NETWORKS.to_string(), Value::Array(networks));
        attrs
    }
}
