//! Docker API wrapper using the bollard crate.
//!
//! This module provides the narrow set of network operations the provider
//! needs, behind the [`NetworkApi`] trait so callers can substitute a fake
//! daemon in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::network::{InspectNetworkOptions, ListNetworksOptions};
use bollard::Docker;
use tracing::{debug, error, info};

use crate::config::ProviderConfig;
use crate::docker::types::{NetworkCreateRequest, NetworkDetails};
use crate::error::DockerError;

/// Network operations consumed from the Docker Engine API.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Creates a network and returns its daemon-assigned id.
    async fn create_network(&self, request: NetworkCreateRequest) -> Result<String, DockerError>;

    /// Inspects a network by id or name.
    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, DockerError>;

    /// Lists networks whose driver equals `driver`, in daemon order.
    async fn list_networks(&self, driver: &str) -> Result<Vec<NetworkDetails>, DockerError>;

    /// Removes a network by id or name.
    async fn remove_network(&self, name: &str) -> Result<(), DockerError>;
}

/// Docker client wrapper for network operations.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connects to the local Docker daemon using environment-derived settings,
    /// negotiates the API version and pings the daemon.
    ///
    /// # Errors
    ///
    /// Returns `DockerError::DaemonUnavailable` if the client cannot be built,
    /// the version negotiation fails, or the daemon does not answer the ping.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, DockerError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| DockerError::DaemonUnavailable(format!("Failed to connect: {e}")))?
            .with_timeout(config.docker_timeout);

        let docker = docker.negotiate_version().await.map_err(|e| {
            DockerError::DaemonUnavailable(format!("Failed to negotiate API version: {e}"))
        })?;

        let client = Self { docker };
        client.ping().await?;

        info!(success = true, "Configured docker client");
        Ok(client)
    }

    /// Checks that the daemon answers.
    pub async fn ping(&self) -> Result<(), DockerError> {
        self.docker.ping().await.map_err(|e| {
            error!(error = %e, success = false, "Failed to connect to Docker daemon");
            DockerError::DaemonUnavailable(e.to_string())
        })?;
        Ok(())
    }
}

#[async_trait]
impl NetworkApi for DockerClient {
    async fn create_network(&self, request: NetworkCreateRequest) -> Result<String, DockerError> {
        let name = request.name.clone();
        debug!(network = %name, driver = %request.driver, "Creating docker network");

        let response = self
            .docker
            .create_network(request.into_options())
            .await
            .map_err(|e| DockerError::from_bollard(&name, e))?;

        if let Some(warning) = response.warning.as_deref().filter(|w| !w.is_empty()) {
            tracing::warn!(network = %name, warning, "Docker reported a warning on network create");
        }

        response
            .id
            .filter(|id| !id.is_empty())
            .ok_or(DockerError::MissingNetworkId(name))
    }

    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, DockerError> {
        let network = self
            .docker
            .inspect_network(id, None::<InspectNetworkOptions<String>>)
            .await
            .map_err(|e| DockerError::from_bollard(id, e))?;

        Ok(NetworkDetails::from(network))
    }

    async fn list_networks(&self, driver: &str) -> Result<Vec<NetworkDetails>, DockerError> {
        let options = ListNetworksOptions {
            filters: HashMap::from([("driver".to_string(), vec![driver.to_string()])]),
        };

        let networks = self
            .docker
            .list_networks(Some(options))
            .await
            .map_err(|e| DockerError::from_bollard(driver, e))?;

        debug!(driver, count = networks.len(), "Listed docker networks");
        Ok(networks.into_iter().map(NetworkDetails::from).collect())
    }

    async fn remove_network(&self, name: &str) -> Result<(), DockerError> {
        self.docker
            .remove_network(name)
            .await
            .map_err(|e| DockerError::from_bollard(name, e))
    }
}
