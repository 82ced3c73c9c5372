//! Provider shell for the istiolocal Terraform provider.
//!
//! The provider exposes one resource and one data source, both views over
//! Docker's own network objects:
//!
//! | Type                   | Kind        | Operations                         |
//! |------------------------|-------------|------------------------------------|
//! | `istiolocal_network`   | resource    | create, read, update, delete, import |
//! | `istiolocal_networks`  | data source | read                               |
//!
//! # Example
//!
//! ```ignore
//! use istiolocal::config::ProviderConfig;
//! use istiolocal::provider::Provider;
//!
//! let provider = Provider::new(ProviderConfig::default());
//! let server = provider.configure().await?;
//! let response = server.read_data_source("istiolocal_networks", &Default::default()).await;
//! ```

pub mod diagnostics;
pub mod model;
pub mod network_resource;
pub mod networks_data_source;
pub mod plan;
pub mod resource;
pub mod schema;
pub mod server;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::ProviderConfig;
use crate::docker::{DockerClient, NetworkApi};
use crate::error::ProviderError;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use model::{AttributeMap, NetworkResourceModel, NetworkSummaryModel, NetworksDataSourceModel};
pub use network_resource::NetworkResource;
pub use networks_data_source::NetworksDataSource;
pub use plan::{plan_resource_change, PlannedChange};
pub use resource::{DataSource, OperationResult, Resource};
pub use schema::{Attribute, AttributeType, Schema};
pub use server::{ProviderServer, Response};

/// Provider name, version and the types it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
    pub resources: Vec<String>,
    pub data_sources: Vec<String>,
}

/// Every schema the provider declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    /// Provider configuration block; this provider takes no attributes.
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
    pub data_source_schemas: BTreeMap<String, Schema>,
}

/// Unconfigured provider.
#[derive(Debug, Clone)]
pub struct Provider {
    config: ProviderConfig,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: self.config.type_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources: vec![self.config.resource_type_name()],
            data_sources: vec![self.config.data_source_type_name()],
        }
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: Schema::new(),
            resource_schemas: BTreeMap::from([(
                self.config.resource_type_name(),
                NetworkResource::resource_schema(),
            )]),
            data_source_schemas: BTreeMap::from([(
                self.config.data_source_type_name(),
                NetworksDataSource::data_source_schema(),
            )]),
        }
    }

    /// Connects to the Docker daemon once and returns a server sharing that
    /// connection across all resources and data sources.
    ///
    /// # Errors
    ///
    /// Fails with the daemon connection error; the provider is unusable then.
    pub async fn configure(&self) -> Result<ProviderServer, ProviderError> {
        let client = DockerClient::connect(&self.config).await.map_err(|e| {
            tracing::error!(error = %e, success = false, "Failed to connect to Docker daemon");
            e
        })?;
        Ok(self.configure_with(Arc::new(client)))
    }

    /// Builds a server over an already established daemon handle.
    pub fn configure_with(&self, client: Arc<dyn NetworkApi>) -> ProviderServer {
        ProviderServer::new(&self.config, client)
    }
}
