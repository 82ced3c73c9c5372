//! In-memory daemon used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::docker::client::NetworkApi;
use crate::docker::types::{IpamEntry, NetworkCreateRequest, NetworkDetails};
use crate::error::DockerError;

pub(crate) const FAKE_CREATED: &str = "2024-03-01T10:00:00.123456789Z";

#[derive(Default)]
struct FakeState {
    networks: Vec<NetworkDetails>,
    requests: Vec<NetworkCreateRequest>,
    removed: Vec<String>,
    next_id: u64,
}

/// Mock daemon that keeps networks in a vector, in creation order.
#[derive(Default)]
pub(crate) struct FakeDocker {
    state: Mutex<FakeState>,
}

impl FakeDocker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing network, as if created outside the provider.
    pub(crate) fn with_network(
        self,
        id: &str,
        name: &str,
        driver: &str,
        ipam: Vec<IpamEntry>,
    ) -> Self {
        self.state
            .lock()
            .expect("lock poisoned")
            .networks
            .push(NetworkDetails {
                id: id.to_string(),
                name: name.to_string(),
                created: Some(FAKE_CREATED.to_string()),
                driver: Some(driver.to_string()),
                ipam,
            });
        self
    }

    /// Create requests seen so far.
    pub(crate) fn requests(&self) -> Vec<NetworkCreateRequest> {
        self.state.lock().expect("lock poisoned").requests.clone()
    }

    /// Names passed to `remove_network` that succeeded.
    pub(crate) fn removed(&self) -> Vec<String> {
        self.state.lock().expect("lock poisoned").removed.clone()
    }

    pub(crate) fn network_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").networks.len()
    }
}

pub(crate) fn ipam(subnet: &str, gateway: &str) -> IpamEntry {
    IpamEntry {
        subnet: Some(subnet.to_string()),
        gateway: Some(gateway.to_string()),
    }
}

#[async_trait]
impl NetworkApi for FakeDocker {
    async fn create_network(&self, request: NetworkCreateRequest) -> Result<String, DockerError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.requests.push(request.clone());

        if state.networks.iter().any(|n| n.name == request.name) {
            return Err(DockerError::Conflict(format!(
                "network with name {} already exists",
                request.name
            )));
        }

        state.next_id += 1;
        let id = format!("{:064x}", state.next_id);
        state.networks.push(NetworkDetails {
            id: id.clone(),
            name: request.name,
            created: Some(FAKE_CREATED.to_string()),
            driver: Some(request.driver),
            ipam: request.ipam,
        });
        Ok(id)
    }

    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, DockerError> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .networks
            .iter()
            .find(|n| n.id == id || n.name == id)
            .cloned()
            .ok_or_else(|| DockerError::NetworkNotFound {
                target: id.to_string(),
                message: format!("network {id} not found"),
            })
    }

    async fn list_networks(&self, driver: &str) -> Result<Vec<NetworkDetails>, DockerError> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state
            .networks
            .iter()
            .filter(|n| n.driver.as_deref() == Some(driver))
            .cloned()
            .collect())
    }

    async fn remove_network(&self, name: &str) -> Result<(), DockerError> {
        let mut state = self.state.lock().expect("lock poisoned");
        let position = state
            .networks
            .iter()
            .position(|n| n.name == name || n.id == name)
            .ok_or_else(|| DockerError::NetworkNotFound {
                target: name.to_string(),
                message: format!("network {name} not found"),
            })?;
        state.networks.remove(position);
        state.removed.push(name.to_string());
        Ok(())
    }
}
