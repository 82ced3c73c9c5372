//! Provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default provider type name, used as the prefix of every resource and data source.
pub const DEFAULT_TYPE_NAME: &str = "istiolocal";

/// Default timeout for Docker daemon requests, matching bollard's own default.
pub const DEFAULT_DOCKER_TIMEOUT_SECS: u64 = 120;

/// Label key/value stamped on every network this provider creates.
pub const DEFAULT_OWNER_LABEL: (&str, &str) = ("purpose", "istiolocal");

/// MTU applied to created bridge networks.
pub const DEFAULT_MTU: u32 = 1500;

/// Configuration for a provider instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Provider type name (`<type_name>_network`, `<type_name>_networks`).
    pub type_name: String,
    /// Timeout applied to every Docker request.
    pub docker_timeout: Duration,
    /// Ownership label attached to created networks.
    pub owner_label: (String, String),
    /// MTU driver option for created networks.
    pub mtu: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            type_name: DEFAULT_TYPE_NAME.to_string(),
            docker_timeout: Duration::from_secs(DEFAULT_DOCKER_TIMEOUT_SECS),
            owner_label: (
                DEFAULT_OWNER_LABEL.0.to_string(),
                DEFAULT_OWNER_LABEL.1.to_string(),
            ),
            mtu: DEFAULT_MTU,
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Sets the Docker request timeout.
    pub fn with_docker_timeout(mut self, timeout: Duration) -> Self {
        self.docker_timeout = timeout;
        self
    }

    /// Full type name of the network resource.
    pub fn resource_type_name(&self) -> String {
        format!("{}_network", self.type_name)
    }

    /// Full type name of the networks data source.
    pub fn data_source_type_name(&self) -> String {
        format!("{}_networks", self.type_name)
    }
}
