//! Contract between the publisher and the protocol runtime that actually
//! listens for and dispatches remote calls.

use std::sync::Arc;

use crate::service::ExposableService;

/// Whether a bind may replace an existing binding at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    Exclusive,
    Replace,
}

/// Handle returned by a successful bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointHandle {
    pub path: Arc<str>,
    pub operations: Vec<&'static str>,
    /// `true` when an earlier binding at `path` was replaced.
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("path '{0}' is already bound")]
    PathAlreadyBound(String),

    #[error("bind rejected: {0}")]
    Rejected(String),
}

/// Protocol runtime bind primitive.
///
/// Implementations own the endpoint registry; the collision check for
/// [`BindMode::Exclusive`] must be atomic with the insert.
pub trait ProtocolRuntime: Send + Sync {
    /// Make `service`'s operations remotely invocable under `path`.
    ///
    /// # Errors
    /// Returns `BindError::PathAlreadyBound` for an exclusive bind on a taken
    /// path, or `BindError::Rejected` when the runtime refuses for its own reasons.
    fn bind(
        &self,
        path: &str,
        service: Arc<dyn ExposableService>,
        mode: BindMode,
    ) -> Result<EndpointHandle, BindError>;
}
