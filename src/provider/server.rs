//! Dispatch of runtime requests to resources and data sources by type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::docker::NetworkApi;
use crate::error::ProviderError;
use crate::provider::diagnostics::{Diagnostic, Diagnostics};
use crate::provider::model::AttributeMap;
use crate::provider::network_resource::NetworkResource;
use crate::provider::networks_data_source::NetworksDataSource;
use crate::provider::plan::plan_resource_change;
use crate::provider::resource::{DataSource, OperationResult, Resource};

/// Response envelope for every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    /// New state; `None` when the object no longer exists or the call failed.
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Response {
    fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: diagnostic.into(),
            ..Default::default()
        }
    }

    fn from_state(result: OperationResult<AttributeMap>) -> Self {
        match result {
            Ok(state) => Self {
                state: Some(Value::Object(state)),
                ..Default::default()
            },
            Err(diagnostic) => Self::failed(diagnostic),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// A configured provider: owns one daemon handle shared by every registered
/// resource and data source.
pub struct ProviderServer {
    resources: BTreeMap<String, Box<dyn Resource>>,
    data_sources: BTreeMap<String, Box<dyn DataSource>>,
}

impl ProviderServer {
    pub fn new(config: &ProviderConfig, client: Arc<dyn NetworkApi>) -> Self {
        let mut server = Self {
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
        };
        server.register_resource(Box::new(NetworkResource::new(
            config.clone(),
            client.clone(),
        )));
        server.register_data_source(Box::new(NetworksDataSource::new(config, client)));
        server
    }

    pub fn register_resource(&mut self, resource: Box<dyn Resource>) {
        self.resources
            .insert(resource.type_name().to_string(), resource);
    }

    pub fn register_data_source(&mut self, data_source: Box<dyn DataSource>) {
        self.data_sources
            .insert(data_source.type_name().to_string(), data_source);
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource, Diagnostic> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| {
                ProviderError::UnknownResourceType(type_name.to_string())
                    .to_diagnostic("Unsupported resource type")
            })
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource, Diagnostic> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| {
                ProviderError::UnknownDataSourceType(type_name.to_string())
                    .to_diagnostic("Unsupported data source type")
            })
    }

    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        proposed: &AttributeMap,
    ) -> Response {
        let resource = match self.resource(type_name) {
            Ok(r) => r,
            Err(d) => return Response::failed(d),
        };

        match plan_resource_change(&resource.schema(), prior, proposed) {
            Ok(change) => {
                let mut response = Response {
                    state: Some(Value::Object(change.planned_state)),
                    ..Default::default()
                };
                if !change.requires_replace.is_empty() {
                    warn!(
                        resource = type_name,
                        attributes = ?change.requires_replace,
                        "Change forces replacement"
                    );
                    response.diagnostics.push(Diagnostic::warning(
                        "Resource will be replaced",
                        format!(
                            "{type_name} cannot be modified in place; changed attributes: {}",
                            change.requires_replace.join(", ")
                        ),
                    ));
                }
                response.requires_replace = change.requires_replace;
                response
            }
            Err(e) => Response::failed(e.to_diagnostic("Invalid resource configuration")),
        }
    }

    pub async fn create(&self, type_name: &str, plan: &AttributeMap) -> Response {
        debug!(resource = type_name, "Create");
        match self.resource(type_name) {
            Ok(r) => Response::from_state(r.create(plan).await),
            Err(d) => Response::failed(d),
        }
    }

    pub async fn read(&self, type_name: &str, state: &AttributeMap) -> Response {
        debug!(resource = type_name, "Read");
        match self.resource(type_name) {
            Ok(r) => Response::from_state(r.read(state).await),
            Err(d) => Response::failed(d),
        }
    }

    pub async fn update(
        &self,
        type_name: &str,
        prior: &AttributeMap,
        plan: &AttributeMap,
    ) -> Response {
        debug!(resource = type_name, "Update");
        match self.resource(type_name) {
            Ok(r) => Response::from_state(r.update(prior, plan).await),
            Err(d) => Response::failed(d),
        }
    }

    pub async fn delete(&self, type_name: &str, state: &AttributeMap) -> Response {
        debug!(resource = type_name, "Delete");
        match self.resource(type_name) {
            Ok(r) => match r.delete(state).await {
                Ok(()) => Response::default(),
                Err(d) => Response::failed(d),
            },
            Err(d) => Response::failed(d),
        }
    }

    pub async fn import_state(&self, type_name: &str, id: &str) -> Response {
        debug!(resource = type_name, id, "Import");
        match self.resource(type_name) {
            Ok(r) => Response::from_state(r.import_state(id).await),
            Err(d) => Response::failed(d),
        }
    }

    pub async fn read_data_source(&self, type_name: &str, config: &AttributeMap) -> Response {
        debug!(data_source = type_name, "ReadDataSource");
        match self.data_source(type_name) {
            Ok(d) => Response::from_state(d.read(config).await),
            Err(d) => Response::failed(d),
        }
    }
}
