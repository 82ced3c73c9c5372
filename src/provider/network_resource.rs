//! The `<provider>_network` resource: one Docker bridge network.
//!
//! Docker networks cannot be modified in place, so `name`, `subnet` and
//! `gateway` force replacement and `update` only keeps the prior state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::ProviderConfig;
use crate::docker::{NetworkApi, NetworkCreateRequest};
use crate::error::ProviderError;
use crate::provider::diagnostics::Diagnostic;
use crate::provider::model::{
    now_timestamp, required_string, AttributeMap, NetworkResourceModel, ATTR_CREATED,
    ATTR_GATEWAY, ATTR_ID, ATTR_NAME, ATTR_SUBNET,
};
use crate::provider::resource::{OperationResult, Resource};
use crate::provider::schema::{Attribute, Schema};

const CREATE_FAILED: &str = "Unable to Create Docker Network";
const INSPECT_FAILED: &str = "Failed to inspect Docker network";
const DELETE_FAILED: &str = "Error Deleting Docker network";

/// Resource implementation backed by a shared daemon handle.
pub struct NetworkResource {
    type_name: String,
    config: ProviderConfig,
    client: Arc<dyn NetworkApi>,
}

impl NetworkResource {
    pub fn new(config: ProviderConfig, client: Arc<dyn NetworkApi>) -> Self {
        Self {
            type_name: config.resource_type_name(),
            config,
            client,
        }
    }

    /// Schema of the resource, independent of any daemon connection.
    pub fn resource_schema() -> Schema {
        Schema::new()
            .with_attribute(ATTR_ID, Attribute::computed_string())
            .with_attribute(ATTR_CREATED, Attribute::computed_string())
            .with_attribute(ATTR_NAME, Attribute::required_string().requires_replace())
            .with_attribute(ATTR_SUBNET, Attribute::required_string().requires_replace())
            .with_attribute(ATTR_GATEWAY, Attribute::required_string().requires_replace())
    }

    async fn create_network(&self, plan: &AttributeMap) -> Result<AttributeMap, ProviderError> {
        Self::resource_schema().validate(plan)?;
        let mut model = NetworkResourceModel::from_attributes(plan)?;

        let request = NetworkCreateRequest::bridge(
            &self.config,
            model.name.clone(),
            model.subnet.clone(),
            model.gateway.clone(),
        );
        let id = self.client.create_network(request).await?;

        model.id = Some(id);
        model.created = Some(now_timestamp());
        Ok(model.to_attributes())
    }

    async fn read_network(&self, id: &str) -> Result<AttributeMap, ProviderError> {
        let details = self.client.inspect_network(id).await?;
        let model = NetworkResourceModel::from_details(&details)?;
        Ok(model.to_attributes())
    }
}

#[async_trait]
impl Resource for NetworkResource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        Self::resource_schema()
    }

    async fn create(&self, plan: &AttributeMap) -> OperationResult<AttributeMap> {
        match self.create_network(plan).await {
            Ok(state) => {
                info!(
                    network = state.get(ATTR_NAME).and_then(|v| v.as_str()).unwrap_or_default(),
                    id = state.get(ATTR_ID).and_then(|v| v.as_str()).unwrap_or_default(),
                    success = true,
                    "Created Docker network"
                );
                Ok(state)
            }
            Err(e) => {
                error!(error = %e, success = false, "{CREATE_FAILED}");
                Err(e.to_diagnostic(CREATE_FAILED))
            }
        }
    }

    async fn read(&self, state: &AttributeMap) -> OperationResult<AttributeMap> {
        let id = required_string(state, ATTR_ID).map_err(|e| e.to_diagnostic(INSPECT_FAILED))?;

        self.read_network(&id).await.map_err(|e| {
            error!(id = %id, error = %e, success = false, "{INSPECT_FAILED}");
            Diagnostic::error(
                INSPECT_FAILED,
                format!("Could not read Docker network ID {id}: {e}"),
            )
        })
    }

    async fn update(
        &self,
        prior: &AttributeMap,
        _plan: &AttributeMap,
    ) -> OperationResult<AttributeMap> {
        warn!(
            success = false,
            "Updating Docker networks is not supported, attribute changes force replacement"
        );
        Ok(prior.clone())
    }

    async fn delete(&self, state: &AttributeMap) -> OperationResult<()> {
        let name = required_string(state, ATTR_NAME).map_err(|e| e.to_diagnostic(DELETE_FAILED))?;

        match self.client.remove_network(&name).await {
            Ok(()) => {
                info!(network = %name, success = true, "Deleted Docker network");
                Ok(())
            }
            Err(e) => {
                error!(network = %name, error = %e, success = false, "{DELETE_FAILED}");
                Err(Diagnostic::error(
                    DELETE_FAILED,
                    format!("Could not delete Docker network, unexpected error: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::fake::{ipam, FakeDocker, FAKE_CREATED};
    use chrono::DateTime;
    use serde_json::{json, Value};

    fn object(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn plan(name: &str, subnet: &str, gateway: &str) -> AttributeMap {
        object(json!({
            "id": null,
            "created": null,
            "name": name,
            "subnet": subnet,
            "gateway": gateway
        }))
    }

    fn resource(fake: Arc<FakeDocker>) -> NetworkResource {
        NetworkResource::new(ProviderConfig::default(), fake)
    }

    #[test]
    fn test_schema() {
        let schema = NetworkResource::resource_schema();
        assert_eq!(
            schema.requires_replace_attributes().collect::<Vec<_>>(),
            vec!["gateway", "name", "subnet"]
        );
        assert_eq!(
            schema.computed_attributes().collect::<Vec<_>>(),
            vec!["created", "id"]
        );
        assert!(schema.attribute("name").unwrap().required);
    }

    #[test]
    fn test_type_name() {
        let resource = resource(Arc::new(FakeDocker::new()));
        assert_eq!(resource.type_name(), "istiolocal_network");
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let state = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");

        let id = state["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        let created = state["created"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
        assert_eq!(state["name"], "testcrud");
        assert_eq!(state["subnet"], "192.168.202.0/24");
        assert_eq!(state["gateway"], "192.168.202.1");

        let refreshed = resource.read(&state).await.expect("read");
        assert_eq!(refreshed["id"], state["id"]);
        assert_eq!(refreshed["name"], state["name"]);
        assert_eq!(refreshed["subnet"], state["subnet"]);
        assert_eq!(refreshed["gateway"], state["gateway"]);
        assert_eq!(refreshed["created"], "2024-03-01T10:00:00.123456789Z");
    }

    #[tokio::test]
    async fn test_create_sends_fixed_policy() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.name, "testcrud");
        assert_eq!(request.driver, "bridge");
        assert_eq!(request.scope, "local");
        assert!(!request.enable_ipv6 && !request.internal && !request.attachable && !request.ingress);
        assert_eq!(request.ipam, vec![ipam("192.168.202.0/24", "192.168.202.1")]);
        assert_eq!(request.labels["purpose"], "istiolocal");
        assert_eq!(request.options["com.docker.network.driver.mtu"], "1500");
    }

    #[tokio::test]
    async fn test_create_conflict_is_surfaced() {
        let fake = Arc::new(FakeDocker::new().with_network(
            "existing",
            "testcrud",
            "bridge",
            vec![ipam("10.1.0.0/24", "10.1.0.1")],
        ));
        let resource = resource(fake.clone());

        let diagnostic = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .unwrap_err();
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.summary, "Unable to Create Docker Network");
        assert!(diagnostic.detail.contains("already exists"));
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_attribute() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let diagnostic = resource
            .create(&object(json!({"name": "testcrud", "subnet": "10.0.0.0/24"})))
            .await
            .unwrap_err();
        assert!(diagnostic.detail.contains("gateway"));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_read_fails() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let state = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");
        resource.delete(&state).await.expect("delete");
        assert_eq!(fake.removed(), vec!["testcrud".to_string()]);

        let diagnostic = resource.read(&state).await.unwrap_err();
        assert_eq!(diagnostic.summary, "Failed to inspect Docker network");
        assert!(diagnostic.detail.starts_with("Could not read Docker network ID"));
        assert!(diagnostic.detail.contains("not found"));
    }

    #[tokio::test]
    async fn test_delete_twice_fails() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let state = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");
        resource.delete(&state).await.expect("delete");

        let diagnostic = resource.delete(&state).await.unwrap_err();
        assert_eq!(diagnostic.summary, "Error Deleting Docker network");
        assert!(diagnostic
            .detail
            .starts_with("Could not delete Docker network, unexpected error:"));
    }

    #[tokio::test]
    async fn test_update_keeps_prior_state() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let prior = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");
        let updated = resource
            .update(
                &prior,
                &plan("testcrudbis", "192.168.203.0/24", "192.168.203.1"),
            )
            .await
            .expect("update");

        assert_eq!(updated, prior);
        assert_eq!(fake.requests().len(), 1);
        assert_eq!(fake.network_count(), 1);
    }

    #[tokio::test]
    async fn test_import_matches_create() {
        let fake = Arc::new(FakeDocker::new());
        let resource = resource(fake.clone());

        let created = resource
            .create(&plan("testcrud", "192.168.202.0/24", "192.168.202.1"))
            .await
            .expect("create");
        let imported = resource
            .import_state(created["id"].as_str().unwrap())
            .await
            .expect("import");

        for attr in ["id", "name", "subnet", "gateway"] {
            assert_eq!(imported[attr], created[attr], "attribute {attr}");
        }
        assert_eq!(imported["created"], FAKE_CREATED);
    }

    #[tokio::test]
    async fn test_read_without_ipam_is_descriptive() {
        let fake = Arc::new(FakeDocker::new().with_network("noipam", "bare", "bridge", vec![]));
        let resource = resource(fake);

        let diagnostic = resource.import_state("noipam").await.unwrap_err();
        assert!(diagnostic.detail.contains("no IPAM configuration entry"));
    }
}
