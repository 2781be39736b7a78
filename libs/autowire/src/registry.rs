//! Endpoint registry: path -> bound service.
//!
//! Notes:
//! - Exclusive binds check and insert under one write lock, so concurrent
//!   publishers see a deterministic winner.
//! - Lookups clone the `Arc`; callers keep a valid service even if the path is
//!   later replaced.
//! - There is no removal; endpoints live for the process lifetime.

use parking_lot::RwLock;
use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::runtime::{BindError, BindMode, EndpointHandle, ProtocolRuntime};
use crate::service::ExposableService;

/// A service bound at a path.
#[derive(Clone)]
pub struct BoundEndpoint {
    pub path: Arc<str>,
    pub service: Arc<dyn ExposableService>,
}

impl BoundEndpoint {
    #[must_use]
    pub fn operations(&self) -> &'static [&'static str] {
        self.service.operations()
    }
}

impl fmt::Debug for BoundEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundEndpoint")
            .field("path", &self.path)
            .field("operations", &self.operations())
            .finish_non_exhaustive()
    }
}

/// Thread-safe registry of bound endpoints, ordered by path.
#[derive(Default)]
pub struct EndpointRegistry {
    map: RwLock<BTreeMap<Arc<str>, BoundEndpoint>>,
}

impl EndpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the endpoint bound at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<BoundEndpoint> {
        self.map.read().get(path).cloned()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.map.read().contains_key(path)
    }

    /// Snapshot of all endpoints, ordered by path.
    #[must_use]
    pub fn endpoints(&self) -> Vec<BoundEndpoint> {
        self.map.read().values().cloned().collect()
    }

    #[must_use]
    pub fn paths(&self) -> Vec<Arc<str>> {
        self.map.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Insert a binding.
    ///
    /// # Errors
    /// Returns `BindError::PathAlreadyBound` if `mode` is exclusive and the path is taken.
    pub fn insert(
        &self,
        path: &str,
        service: Arc<dyn ExposableService>,
        mode: BindMode,
    ) -> Result<EndpointHandle, BindError> {
        let path: Arc<str> = Arc::from(path);
        let operations = service.operations().to_vec();

        let mut w = self.map.write();
        if mode == BindMode::Exclusive && w.contains_key(&path) {
            return Err(BindError::PathAlreadyBound(path.to_string()));
        }
        let previous = w.insert(
            path.clone(),
            BoundEndpoint {
                path: path.clone(),
                service,
            },
        );

        Ok(EndpointHandle {
            path,
            operations,
            replaced: previous.is_some(),
        })
    }
}

impl fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("paths", &self.paths())
            .finish()
    }
}

/// The registry is itself a local runtime: binds land directly in the map.
impl ProtocolRuntime for EndpointRegistry {
    fn bind(
        &self,
        path: &str,
        service: Arc<dyn ExposableService>,
        mode: BindMode,
    ) -> Result<EndpointHandle, BindError> {
        self.insert(path, service, mode)
    }
}
