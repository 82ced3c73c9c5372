//! The `<provider>_networks` data source: every bridge network on the daemon.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::ProviderConfig;
use crate::docker::{NetworkApi, BRIDGE_DRIVER};
use crate::error::ProviderError;
use crate::provider::model::{
    AttributeMap, NetworkSummaryModel, NetworksDataSourceModel, ATTR_GATEWAY, ATTR_ID,
    ATTR_NAME, ATTR_NETWORKS, ATTR_SUBNET,
};
use crate::provider::resource::{DataSource, OperationResult};
use crate::provider::schema::{Attribute, Schema};

const LIST_FAILED: &str = "Unable to Read Docker Networks";

pub struct NetworksDataSource {
    type_name: String,
    client: Arc<dyn NetworkApi>,
}

impl NetworksDataSource {
    pub fn new(config: &ProviderConfig, client: Arc<dyn NetworkApi>) -> Self {
        Self {
            type_name: config.data_source_type_name(),
            client,
        }
    }

    pub fn data_source_schema() -> Schema {
        let nested = BTreeMap::from([
            (ATTR_ID.to_string(), Attribute::computed_string()),
            (ATTR_NAME.to_string(), Attribute::computed_string()),
            (ATTR_SUBNET.to_string(), Attribute::computed_string()),
            (ATTR_GATEWAY.to_string(), Attribute::computed_string()),
        ]);
        Schema::new().with_attribute(ATTR_NETWORKS, Attribute::computed_list_nested(nested))
    }

    /// Lists bridge networks. Any network failing to map fails the whole read.
    async fn list(&self) -> Result<NetworksDataSourceModel, ProviderError> {
        let networks = self
            .client
            .list_networks(BRIDGE_DRIVER)
            .await?
            .iter()
            .map(NetworkSummaryModel::from_details)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NetworksDataSourceModel { networks })
    }
}

#[async_trait]
impl DataSource for NetworksDataSource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        Self::data_source_schema()
    }

    async fn read(&self, _config: &AttributeMap) -> OperationResult<AttributeMap> {
        match self.list().await {
            Ok(model) => {
                debug!(count = model.networks.len(), "Read Docker networks");
                Ok(model.to_attributes())
            }
            Err(e) => {
                error!(error = %e, success = false, "{LIST_FAILED}");
                Err(e.to_diagnostic(LIST_FAILED))
            }
        }
    }
}
