//! Docker client adapter.
//!
//! Holds the single daemon connection a provider instance uses and the
//! network operations the resource and data source are built on.
//!
//! # Example
//!
//! ```ignore
//! use istiolocal::config::ProviderConfig;
//! use istiolocal::docker::{DockerClient, NetworkApi, NetworkCreateRequest};
//!
//! let config = ProviderConfig::default();
//! let client = DockerClient::connect(&config).await?;
//!
//! let request = NetworkCreateRequest::bridge(&config, "mesh", "192.168.202.0/24", "192.168.202.1");
//! let id = client.create_network(request).await?;
//! let details = client.inspect_network(&id).await?;
//! client.remove_network(&details.name).await?;
//! ```

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{DockerClient, NetworkApi};
pub use types::{IpamEntry, NetworkCreateRequest, NetworkDetails, BRIDGE_DRIVER};
