//! Lifecycle traits implemented by resources and data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::diagnostics::Diagnostic;
use crate::provider::model::{AttributeMap, ATTR_ID};
use crate::provider::schema::Schema;

/// Outcome of a single operation: a value, or the diagnostic that failed it.
pub type OperationResult<T> = Result<T, Diagnostic>;

/// A managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Full type name, e.g. `istiolocal_network`.
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Creates the remote object from the planned attributes and returns the
    /// new state.
    async fn create(&self, plan: &AttributeMap) -> OperationResult<AttributeMap>;

    /// Refreshes `state` from the remote object.
    async fn read(&self, state: &AttributeMap) -> OperationResult<AttributeMap>;

    async fn update(
        &self,
        prior: &AttributeMap,
        plan: &AttributeMap,
    ) -> OperationResult<AttributeMap>;

    async fn delete(&self, state: &AttributeMap) -> OperationResult<()>;

    /// Seeds a state holding only `id`, then reads it.
    async fn import_state(&self, id: &str) -> OperationResult<AttributeMap> {
        let mut seed = AttributeMap::new();
        seed.insert(ATTR_ID.to_string(), Value::String(id.to_string()));
        self.read(&seed).await
    }
}

/// A read-only data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full type name, e.g. `istiolocal_networks`.
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: &AttributeMap) -> OperationResult<AttributeMap>;
}
