//! Error taxonomy of the discovery pass.
//!
//! Only [`DiscoveryError`] aborts a pass. Per-component problems are
//! [`PublishError`]s and are collected into the pass report.

use std::sync::Arc;

/// Failures of the component container itself.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("component container is not initialized")]
    NotInitialized,

    #[error("component container failed to initialize: {reason}")]
    Failed { reason: String },

    #[error("failed to construct component '{component}': {source}")]
    Factory {
        component: Arc<str>,
        #[source]
        source: anyhow::Error,
    },

    #[error("component name '{component}' is registered more than once")]
    DuplicateComponent { component: Arc<str> },
}

/// Errors that abort a discovery pass.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("component container unavailable")]
    ContainerUnavailable(#[source] ContainerError),

    #[error("discovery pass already ran")]
    AlreadyRun,
}

/// Rejected service marker metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("invalid service descriptor on '{type_name}': {reason}")]
    InvalidDescriptor {
        type_name: &'static str,
        reason: &'static str,
    },
}

/// Per-component failure to publish an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("path '{path}' is already bound")]
    PathAlreadyBound { path: String },

    #[error("component type '{type_name}' is marked as a web service but is not exposable")]
    NotExposable { type_name: &'static str },

    #[error("protocol runtime refused to bind '{path}': {reason}")]
    RuntimeBindFailure { path: String, reason: String },
}
