//! Error types for the istiolocal provider.
//!
//! Two layers:
//! - Docker daemon interactions (connection, network create/inspect/list/remove)
//! - Provider operations (attribute mapping, dispatch, diagnostics)

use thiserror::Error;

/// Errors that can occur while talking to the Docker daemon.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("Docker daemon not available: {0}")]
    DaemonUnavailable(String),

    #[error("Network '{target}' not found: {message}")]
    NetworkNotFound { target: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Docker daemon error: {0}")]
    Daemon(String),

    #[error("Docker daemon returned no id for network '{0}'")]
    MissingNetworkId(String),

    #[error("Network '{network}' has no IPAM configuration entry")]
    MissingIpamConfig { network: String },
}

impl DockerError {
    /// Classifies a bollard error by the daemon's HTTP status.
    pub fn from_bollard(target: &str, err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => DockerError::NetworkNotFound {
                target: target.to_string(),
                message,
            },
            bollard::errors::Error::DockerResponseServerError {
                status_code: 409,
                message,
            } => DockerError::Conflict(message),
            bollard::errors::Error::DockerResponseServerError { message, .. } => {
                DockerError::Daemon(message)
            }
            other => DockerError::Daemon(other.to_string()),
        }
    }

    /// Whether the daemon reported the target as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DockerError::NetworkNotFound { .. })
    }
}

/// Errors that can occur while serving provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Docker(#[from] DockerError),

    #[error("Missing required attribute '{0}'")]
    MissingAttribute(String),

    #[error("Invalid value for attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("Unknown data source type '{0}'")]
    UnknownDataSourceType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
