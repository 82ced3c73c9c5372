//! Plain network types exchanged with the Docker adapter.
//!
//! These decouple the provider from bollard's generated models so that the
//! resource and data source can be exercised against a fake daemon.

use std::collections::HashMap;

use bollard::models::{Ipam, IpamConfig, Network};
use bollard::network::CreateNetworkOptions;

use crate::config::ProviderConfig;
use crate::error::DockerError;

/// Driver used for every network this provider manages or lists.
pub const BRIDGE_DRIVER: &str = "bridge";

/// Scope of created networks.
pub const LOCAL_SCOPE: &str = "local";

/// Driver option key for the network MTU.
pub const MTU_OPTION: &str = "com.docker.network.driver.mtu";

/// IPAM driver used for created networks.
pub const DEFAULT_IPAM_DRIVER: &str = "default";

/// One IPAM configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpamEntry {
    pub subnet: Option<String>,
    pub gateway: Option<String>,
}

/// Parameters of a create-network request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCreateRequest {
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub enable_ipv6: bool,
    pub internal: bool,
    pub attachable: bool,
    pub ingress: bool,
    pub ipam_driver: String,
    pub ipam: Vec<IpamEntry>,
    pub labels: HashMap<String, String>,
    pub options: HashMap<String, String>,
}

impl NetworkCreateRequest {
    /// Builds the fixed-policy bridge request for a single subnet/gateway pair:
    /// bridge driver, local scope, IPv4 only, not internal, not attachable,
    /// no ingress, ownership label and MTU option from `config`.
    pub fn bridge(
        config: &ProviderConfig,
        name: impl Into<String>,
        subnet: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        let (label_key, label_value) = config.owner_label.clone();
        Self {
            name: name.into(),
            driver: BRIDGE_DRIVER.to_string(),
            scope: LOCAL_SCOPE.to_string(),
            enable_ipv6: false,
            internal: false,
            attachable: false,
            ingress: false,
            ipam_driver: DEFAULT_IPAM_DRIVER.to_string(),
            ipam: vec![IpamEntry {
                subnet: Some(subnet.into()),
                gateway: Some(gateway.into()),
            }],
            labels: HashMap::from([(label_key, label_value)]),
            options: HashMap::from([(MTU_OPTION.to_string(), config.mtu.to_string())]),
        }
    }

    /// Converts into bollard's request options.
    ///
    /// The Engine API infers the scope from the driver, so `scope` is not sent.
    pub fn into_options(self) -> CreateNetworkOptions<String> {
        let config = self
            .ipam
            .into_iter()
            .map(|entry| IpamConfig {
                subnet: entry.subnet,
                gateway: entry.gateway,
                ..Default::default()
            })
            .collect();

        CreateNetworkOptions {
            name: self.name,
            check_duplicate: false,
            driver: self.driver,
            internal: self.internal,
            attachable: self.attachable,
            ingress: self.ingress,
            ipam: Ipam {
                driver: Some(self.ipam_driver),
                config: Some(config),
                options: None,
            },
            enable_ipv6: self.enable_ipv6,
            options: self.options,
            labels: self.labels,
        }
    }
}

/// A network as reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkDetails {
    pub id: String,
    pub name: String,
    /// Daemon creation timestamp, as sent by the Engine API.
    pub created: Option<String>,
    pub driver: Option<String>,
    pub ipam: Vec<IpamEntry>,
}

impl NetworkDetails {
    /// Returns the first IPAM entry, the one this provider reads subnet and
    /// gateway from.
    pub fn primary_ipam(&self) -> Result<&IpamEntry, DockerError> {
        let entry = self
            .ipam
            .first()
            .ok_or_else(|| DockerError::MissingIpamConfig {
                network: self.name.clone(),
            })?;
        if self.ipam.len() > 1 {
            tracing::warn!(
                network = %self.name,
                entries = self.ipam.len(),
                "Network has multiple IPAM entries, using the first"
            );
        }
        Ok(entry)
    }
}

impl From<Network> for NetworkDetails {
    fn from(network: Network) -> Self {
        let ipam = network
            .ipam
            .and_then(|ipam| ipam.config)
            .unwrap_or_default()
            .into_iter()
            .map(|config| IpamEntry {
                subnet: config.subnet,
                gateway: config.gateway,
            })
            .collect();

        Self {
            id: network.id.unwrap_or_default(),
            name: network.name.unwrap_or_default(),
            created: network.created,
            driver: network.driver,
            ipam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_request_policy() {
        let request = NetworkCreateRequest::bridge(
            &ProviderConfig::default(),
            "testcrud",
            "192.168.202.0/24",
            "192.168.202.1",
        );

        assert_eq!(request.driver, "bridge");
        assert_eq!(request.scope, "local");
        assert!(!request.enable_ipv6);
        assert!(!request.internal);
        assert!(!request.attachable);
        assert!(!request.ingress);
        assert_eq!(request.ipam.len(), 1);
        assert_eq!(request.ipam[0].subnet.as_deref(), Some("192.168.202.0/24"));
        assert_eq!(request.ipam[0].gateway.as_deref(), Some("192.168.202.1"));
        assert_eq!(request.labels.get("purpose").map(String::as_str), Some("istiolocal"));
        assert_eq!(request.options.get(MTU_OPTION).map(String::as_str), Some("1500"));
    }

    #[test]
    fn test_into_options() {
        let options = NetworkCreateRequest::bridge(
            &ProviderConfig::default(),
            "testcrud",
            "192.168.202.0/24",
            "192.168.202.1",
        )
        .into_options();

        assert_eq!(options.name, "testcrud");
        assert_eq!(options.driver, "bridge");
        assert_eq!(options.ipam.driver.as_deref(), Some("default"));
        let config = options.ipam.config.unwrap_or_default();
        assert_eq!(config.len(), 1);
        assert_eq!(config[0].subnet.as_deref(), Some("192.168.202.0/24"));
        assert_eq!(config[0].gateway.as_deref(), Some("192.168.202.1"));
        assert!(!options.enable_ipv6);
    }

    #[test]
    fn test_details_from_network() {
        let network = Network {
            id: Some("4a1d9bcd".to_string()),
            name: Some("bridge".to_string()),
            created: Some("2024-03-01T10:00:00.123456789Z".to_string()),
            driver: Some("bridge".to_string()),
            ipam: Some(Ipam {
                driver: Some("default".to_string()),
                config: Some(vec![IpamConfig {
                    subnet: Some("172.17.0.0/16".to_string()),
                    gateway: Some("172.17.0.1".to_string()),
                    ..Default::default()
                }]),
                options: None,
            }),
            ..Default::default()
        };

        let details = NetworkDetails::from(network);
        assert_eq!(details.id, "4a1d9bcd");
        assert_eq!(details.name, "bridge");
        assert_eq!(details.driver.as_deref(), Some("bridge"));
        let ipam = details.primary_ipam().expect("ipam entry");
        assert_eq!(ipam.subnet.as_deref(), Some("172.17.0.0/16"));
        assert_eq!(ipam.gateway.as_deref(), Some("172.17.0.1"));
    }

    #[test]
    fn test_primary_ipam_missing() {
        let details = NetworkDetails {
            id: "abc".to_string(),
            name: "empty".to_string(),
            ..Default::default()
        };
        let err = details.primary_ipam().unwrap_err();
        assert!(matches!(err, DockerError::MissingIpamConfig { ref network } if network == "empty"));
    }

    #[test]
    fn test_primary_ipam_uses_first_of_many() {
        let details = NetworkDetails {
            id: "abc".to_string(),
            name: "dual".to_string(),
            ipam: vec![
                IpamEntry {
                    subnet: Some("10.0.0.0/24".to_string()),
                    gateway: Some("10.0.0.1".to_string()),
                },
                IpamEntry {
                    subnet: Some("10.0.1.0/24".to_string()),
                    gateway: Some("10.0.1.1".to_string()),
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            details.primary_ipam().unwrap().subnet.as_deref(),
            Some("10.0.0.0/24")
        );
    }
}
