//! istiolocal: Terraform provider for local Docker bridge networks.
//!
//! This library provides the `istiolocal_network` resource and the
//! `istiolocal_networks` data source, backed by the Docker Engine API.

pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod provider;

// Re-export commonly used types
pub use config::ProviderConfig;
pub use error::{DockerError, ProviderError};
pub use provider::{Provider, ProviderServer};
