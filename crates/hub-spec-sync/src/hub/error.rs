//! Hub API error types.

use thiserror::Error;

/// Errors talking to the hub cluster's API server.
#[derive(Error, Debug)]
pub enum HubError {
    /// Any failure reported by the Kubernetes client other than not-found.
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// An instance handed to `update` carries no name.
    #[error("Instance of kind {kind} has no name")]
    MissingName { kind: String },
}

impl HubError {
    /// Returns true if the API server rejected a write because the instance
    /// changed since it was read.
    pub fn is_conflict(&self) -> bool {
        matches!(self, HubError::Api(kube::Error::Api(response)) if response.code == 409)
    }
}
