//! Startup discovery: build the container, run the pass under a timeout and
//! decide whether the outcome is good enough to serve traffic.

use std::sync::Arc;

use anyhow::Context;
use autowire::{
    ComponentContainer, DiscoveryConfig, DiscoveryOrchestrator, EndpointPublisher, PassReport,
    ProtocolRuntime,
};

/// Container holding every registered component, already initialized.
///
/// # Errors
/// Returns an error if a component fails to construct or two share a name.
pub fn ready_container() -> anyhow::Result<ComponentContainer> {
    let mut container = ComponentContainer::from_inventory();
    container
        .initialize()
        .context("component container failed to initialize")?;
    Ok(container)
}

/// Run one discovery pass of `container` against `runtime`.
///
/// The pass runs on the blocking pool. If it exceeds `cfg.startup_timeout`
/// startup fails; the pass itself cannot be interrupted and is left to finish
/// in the background.
///
/// # Errors
/// - the container is unavailable,
/// - the pass times out,
/// - `cfg.fail_on_rejections` is set and any component failed to publish.
pub async fn discover(
    container: Arc<ComponentContainer>,
    runtime: Arc<dyn ProtocolRuntime>,
    cfg: &DiscoveryConfig,
) -> anyhow::Result<PassReport> {
    let publisher = EndpointPublisher::new(runtime, cfg.collision_policy);
    let mut orchestrator = DiscoveryOrchestrator::new(publisher, cfg.name_policy);

    let pass = tokio::task::spawn_blocking(move || orchestrator.run(&*container));

    let Ok(joined) = tokio::time::timeout(cfg.startup_timeout, pass).await else {
        anyhow::bail!(
            "discovery pass did not finish within {} ms",
            cfg.startup_timeout.as_millis()
        );
    };
    let report = joined
        .context("discovery pass panicked")?
        .context("discovery pass aborted")?;

    if cfg.fail_on_rejections && !report.is_clean() {
        let failures: Vec<String> = report
            .failures()
            .map(|(component, e)| format!("{component}: {e}"))
            .collect();
        anyhow::bail!(
            "{} component(s) failed to publish: {}",
            failures.len(),
            failures.join("; ")
        );
    }

    Ok(report)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use autowire::{
        BindError, BindMode, CollisionPolicy, ComponentType, EndpointHandle,
        EndpointRegistry, ExposableService, ManagedComponent, NamePolicy,
    };
    use std::time::Duration;

    #[tokio::test]
    async fn registered_components_are_published() {
        let container = Arc::new(ready_container().unwrap());
        let registry = Arc::new(EndpointRegistry::new());

        let report = discover(container, registry.clone(), &DiscoveryConfig::default())
            .await
            .unwrap();

        let paths: Vec<String> = registry.paths().iter().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["/CalculatorService", "/EchoService"]);
        assert_eq!(report.skipped().collect::<Vec<_>>(), vec!["auditTrail"]);
    }

    #[tokio::test]
    async fn second_startup_pass_is_rejected_by_fail_fast() {
        let container = Arc::new(ready_container().unwrap());
        let registry = Arc::new(EndpointRegistry::new());
        let cfg = DiscoveryConfig::default();

        discover(container.clone(), registry.clone(), &cfg)
            .await
            .unwrap();
        let err = discover(container, registry, &cfg).await.unwrap_err();

        assert!(err.to_string().contains("2 component(s) failed to publish"));
    }

    #[tokio::test]
    async fn rejections_can_be_tolerated() {
        let container = Arc::new(ready_container().unwrap());
        let registry = Arc::new(EndpointRegistry::new());
        let cfg = DiscoveryConfig {
            fail_on_rejections: false,
            ..DiscoveryConfig::default()
        };

        discover(container.clone(), registry.clone(), &cfg)
            .await
            .unwrap();
        let report = discover(container, registry, &cfg).await.unwrap();

        assert_eq!(report.failures().count(), 2);
    }

    #[tokio::test]
    async fn uninitialized_container_aborts() {
        let container = Arc::new(ComponentContainer::from_inventory());
        let registry = Arc::new(EndpointRegistry::new());

        let err = discover(container, registry.clone(), &DiscoveryConfig::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("aborted"));
        assert!(registry.is_empty());
    }

    struct Sleepy;

    impl ProtocolRuntime for Sleepy {
        fn bind(
            &self,
            path: &str,
            service: Arc<dyn ExposableService>,
            _mode: BindMode,
        ) -> Result<EndpointHandle, BindError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(EndpointHandle {
                path: Arc::from(path),
                operations: service.operations().to_vec(),
                replaced: false,
            })
        }
    }

    struct Svc;

    impl ManagedComponent for Svc {
        fn as_exposable(self: Arc<Self>) -> Option<Arc<dyn ExposableService>> {
            Some(self)
        }
    }

    #[async_trait::async_trait]
    impl ExposableService for Svc {
        fn operations(&self) -> &'static [&'static str] {
            &[]
        }

        async fn invoke(
            &self,
            operation: &str,
            _input: serde_json::Value,
        ) -> Result<serde_json::Value, autowire::ServiceFault> {
            Err(autowire::ServiceFault::UnknownOperation(operation.to_owned()))
        }
    }

    #[tokio::test]
    async fn slow_runtime_hits_startup_timeout() {
        let mut container = ComponentContainer::new();
        container.register_instance(
            "slow",
            ComponentType::web_service("tests::Slow", "Slow"),
            Arc::new(Svc),
        );
        container.initialize().unwrap();
        let cfg = DiscoveryConfig {
            name_policy: NamePolicy::Strict,
            collision_policy: CollisionPolicy::FailFast,
            startup_timeout: Duration::from_millis(20),
            fail_on_rejections: true,
        };

        let err = discover(Arc::new(container), Arc::new(Sleepy), &cfg)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("did not finish within 20 ms"));
    }
}
