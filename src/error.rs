//! Error types for the Spark pod webhook

use thiserror::Error;

/// Main error type for pod patching and webhook serving
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The pod has no container named after the Spark driver or executor
    #[error("pod {pod}: no container named {}", .expected.join(" or "))]
    ContainerNotFound {
        /// Name of the pod being patched
        pod: String,
        /// Container names that were searched for
        expected: Vec<String>,
    },

    /// A value did not match what the webhook accepts
    #[error("validation error: {0}")]
    Validation(String),

    /// A patch value could not be converted to JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// TLS material could not be loaded
    #[error("tls error: {0}")]
    Tls(String),

    /// The webhook server failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a container-not-found error for the given pod
    pub fn container_not_found(pod: impl Into<String>, expected: &[&str]) -> Self {
        Self::ContainerNotFound {
            pod: pod.into(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a TLS error with the given message
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }

    /// Returns true if the pod itself is unpatchable and admission should be denied
    pub fn is_pod_rejection(&self) -> bool {
        matches!(self, Self::ContainerNotFound { .. })
    }
}
