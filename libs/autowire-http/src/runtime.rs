//! HTTP-backed protocol runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use autowire::{
    BindError, BindMode, EndpointHandle, EndpointRegistry, ExposableService, ProtocolRuntime,
};

use crate::config::HttpConfig;

/// Protocol runtime that serves bound endpoints over HTTP.
///
/// Binds go straight into the shared [`EndpointRegistry`]; the router looks
/// endpoints up per request, so binding before or after `serve` both work.
/// After [`shutdown`](Self::shutdown) further binds are rejected.
pub struct HttpRuntime {
    root: String,
    registry: Arc<EndpointRegistry>,
    closed: AtomicBool,
}

impl HttpRuntime {
    #[must_use]
    pub fn new(cfg: &HttpConfig) -> Self {
        Self::with_registry(cfg, Arc::new(EndpointRegistry::new()))
    }

    #[must_use]
    pub fn with_registry(cfg: &HttpConfig, registry: Arc<EndpointRegistry>) -> Self {
        Self {
            root: cfg.normalized_root(),
            registry,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    /// Normalized root path; empty when serving at `/`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Public URL path of an endpoint path.
    #[must_use]
    pub fn url_path(&self, endpoint_path: &str) -> String {
        if self.root.is_empty() {
            endpoint_path.to_owned()
        } else if endpoint_path == "/" {
            self.root.clone()
        } else {
            format!("{}{endpoint_path}", self.root)
        }
    }

    #[must_use]
    pub fn router(&self) -> Router {
        crate::router::build(self.registry.clone(), &self.root)
    }

    /// Serve until `cancel` fires, then stop accepting binds.
    ///
    /// # Errors
    /// Returns an error if the server fails while accepting connections.
    pub async fn serve(&self, listener: TcpListener, cancel: CancellationToken) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, root = %self.url_path("/"), "HTTP runtime listening");

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP runtime shutting down");
        };

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {e}"));

        self.shutdown();
        result
    }

    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl ProtocolRuntime for HttpRuntime {
    fn bind(
        &self,
        path: &str,
        service: Arc<dyn ExposableService>,
        mode: BindMode,
    ) -> Result<EndpointHandle, BindError> {
        if self.is_shut_down() {
            return Err(BindError::Rejected("HTTP runtime is shut down".to_owned()));
        }
        let handle = self.registry.insert(path, service, mode)?;
        tracing::debug!(path = %handle.path, url = %self.url_path(path), "endpoint bound");
        Ok(handle)
    }
}
