//! Endpoint publisher: turns a path and a service instance into a bind request.

use std::sync::Arc;

use crate::config::CollisionPolicy;
use crate::error::PublishError;
use crate::runtime::{BindError, BindMode, ProtocolRuntime};
use crate::service::ExposableService;

/// A successfully published endpoint.
#[derive(Clone)]
pub struct Endpoint {
    pub path: Arc<str>,
    pub operations: Vec<&'static str>,
    pub instance: Arc<dyn ExposableService>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl Eq for Endpoint {}

/// Publishes services through a protocol runtime under a fixed collision policy.
#[derive(Clone)]
pub struct EndpointPublisher {
    runtime: Arc<dyn ProtocolRuntime>,
    collisions: CollisionPolicy,
}

impl EndpointPublisher {
    #[must_use]
    pub fn new(runtime: Arc<dyn ProtocolRuntime>, collisions: CollisionPolicy) -> Self {
        Self {
            runtime,
            collisions,
        }
    }

    #[must_use]
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collisions
    }

    /// Bind `instance` at `path`.
    ///
    /// # Errors
    /// - `PublishError::PathAlreadyBound` when the path is taken and the policy is fail-fast.
    /// - `PublishError::RuntimeBindFailure` when the runtime refuses the bind.
    pub fn publish(
        &self,
        path: &str,
        instance: Arc<dyn ExposableService>,
    ) -> Result<Endpoint, PublishError> {
        let mode = match self.collisions {
            CollisionPolicy::FailFast => BindMode::Exclusive,
            CollisionPolicy::Overwrite => BindMode::Replace,
        };

        let handle = self
            .runtime
            .bind(path, instance.clone(), mode)
            .map_err(|e| match e {
                BindError::PathAlreadyBound(path) => PublishError::PathAlreadyBound { path },
                BindError::Rejected(reason) => PublishError::RuntimeBindFailure {
                    path: path.to_owned(),
                    reason,
                },
            })?;

        if handle.replaced {
            tracing::warn!(path = %handle.path, "endpoint replaced an existing binding");
        }

        Ok(Endpoint {
            path: handle.path,
            operations: handle.operations,
            instance,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::registry::EndpointRegistry;
    use crate::runtime::EndpointHandle;
    use crate::service::ServiceFault;
    use serde_json::Value;

    struct Noop;

    #[async_trait::async_trait]
    impl ExposableService for Noop {
        fn operations(&self) -> &'static [&'static str] {
            &["noop"]
        }

        async fn invoke(&self, _operation: &str, input: Value) -> Result<Value, ServiceFault> {
            Ok(input)
        }
    }

    struct Offline;

    impl ProtocolRuntime for Offline {
        fn bind(
            &self,
            _path: &str,
            _service: Arc<dyn ExposableService>,
            _mode: BindMode,
        ) -> Result<EndpointHandle, BindError> {
            Err(BindError::Rejected("transport not started".to_owned()))
        }
    }

    #[test]
    fn publish_binds_instance_at_path() {
        let reg = Arc::new(EndpointRegistry::new());
        let publisher = EndpointPublisher::new(reg.clone(), CollisionPolicy::FailFast);
        let svc: Arc<dyn ExposableService> = Arc::new(Noop);

        let ep = publisher.publish("/Foo", svc.clone()).unwrap();

        assert_eq!(&*ep.path, "/Foo");
        assert_eq!(ep.operations, vec!["noop"]);
        assert!(Arc::ptr_eq(&ep.instance, &svc));
        assert!(Arc::ptr_eq(&reg.get("/Foo").unwrap().service, &svc));
    }

    #[test]
    fn fail_fast_rejects_second_publication() {
        let reg = Arc::new(EndpointRegistry::new());
        let publisher = EndpointPublisher::new(reg.clone(), CollisionPolicy::FailFast);
        publisher.publish("/Foo", Arc::new(Noop)).unwrap();

        let err = publisher.publish("/Foo", Arc::new(Noop)).unwrap_err();

        assert_eq!(
            err,
            PublishError::PathAlreadyBound {
                path: "/Foo".to_owned()
            }
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn overwrite_replaces_and_warns() {
        let reg = Arc::new(EndpointRegistry::new());
        let publisher = EndpointPublisher::new(reg.clone(), CollisionPolicy::Overwrite);
        publisher.publish("/Foo", Arc::new(Noop)).unwrap();
        let second: Arc<dyn ExposableService> = Arc::new(Noop);

        publisher.publish("/Foo", second.clone()).unwrap();

        assert_eq!(reg.len(), 1);
        assert!(Arc::ptr_eq(&reg.get("/Foo").unwrap().service, &second));
        assert!(logs_contain("endpoint replaced an existing binding"));
    }

    #[test]
    fn runtime_rejection_is_surfaced() {
        let publisher = EndpointPublisher::new(Arc::new(Offline), CollisionPolicy::FailFast);

        let err = publisher.publish("/Foo", Arc::new(Noop)).unwrap_err();

        assert_eq!(
            err,
            PublishError::RuntimeBindFailure {
                path: "/Foo".to_owned(),
                reason: "transport not started".to_owned(),
            }
        );
    }
}
