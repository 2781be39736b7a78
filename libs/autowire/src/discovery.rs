//! Discovery orchestrator.
//!
//! One pass: query the component source once, extract a service descriptor per
//! component, publish the ones that have one.
//!
//! Semantics:
//! - A source failure aborts the pass before anything is published.
//! - Components without the web service marker are skipped silently.
//! - Per-component failures are recorded in the [`PassReport`]; the pass keeps going.
//! - No rollback: endpoints published before a failure stay bound.

use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::config::NamePolicy;
use crate::container::ComponentSource;
use crate::descriptor::extract;
use crate::error::{DiscoveryError, PublishError};
use crate::publisher::{Endpoint, EndpointPublisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    NotRun,
    Completed,
    Aborted,
}

/// What happened to one component during the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOutcome {
    Published(Endpoint),
    Skipped,
    Failed(PublishError),
}

/// Per-component results of a completed pass, in source order.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub outcomes: Vec<(Arc<str>, ComponentOutcome)>,
}

impl PassReport {
    pub fn published(&self) -> impl Iterator<Item = (&str, &Endpoint)> {
        self.outcomes.iter().filter_map(|(name, o)| match o {
            ComponentOutcome::Published(ep) => Some((&**name, ep)),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ComponentOutcome::Skipped))
            .map(|(name, _)| &**name)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PublishError)> {
        self.outcomes.iter().filter_map(|(name, o)| match o {
            ComponentOutcome::Failed(e) => Some((&**name, e)),
            _ => None,
        })
    }

    #[must_use]
    pub fn outcome_of(&self, component: &str) -> Option<&ComponentOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| &**name == component)
            .map(|(_, o)| o)
    }

    /// `true` when no component failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} published, {} skipped, {} failed",
            self.published().count(),
            self.skipped().count(),
            self.failures().count()
        )
    }
}

/// Drives a single discovery pass.
pub struct DiscoveryOrchestrator {
    publisher: EndpointPublisher,
    names: NamePolicy,
    state: PassState,
}

impl DiscoveryOrchestrator {
    #[must_use]
    pub fn new(publisher: EndpointPublisher, names: NamePolicy) -> Self {
        Self {
            publisher,
            names,
            state: PassState::NotRun,
        }
    }

    #[must_use]
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Run the pass against `source`.
    ///
    /// # Errors
    /// - `DiscoveryError::ContainerUnavailable` if `source` cannot be queried;
    ///   nothing is published and the orchestrator becomes `Aborted`.
    /// - `DiscoveryError::AlreadyRun` if this orchestrator already ran.
    pub fn run(&mut self, source: &dyn ComponentSource) -> Result<PassReport, DiscoveryError> {
        if self.state != PassState::NotRun {
            return Err(DiscoveryError::AlreadyRun);
        }

        let components = match source.managed_components() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "discovery aborted: component container unavailable");
                self.state = PassState::Aborted;
                return Err(DiscoveryError::ContainerUnavailable(e));
            }
        };

        tracing::info!(components = components.len(), "discovery pass started");

        let outcomes = components
            .into_iter()
            .map(|c| {
                let outcome = self.process(&c);
                (c.name, outcome)
            })
            .collect();
        let report = PassReport { outcomes };

        self.state = PassState::Completed;
        tracing::info!(%report, "discovery pass completed");
        Ok(report)
    }

    fn process(&self, component: &Component) -> ComponentOutcome {
        match self.try_publish(component) {
            Ok(Some(ep)) => {
                tracing::info!(component = %component.name, path = %ep.path, "endpoint published");
                ComponentOutcome::Published(ep)
            }
            Ok(None) => {
                tracing::debug!(component = %component.name, "no web service marker; skipped");
                ComponentOutcome::Skipped
            }
            Err(e) => {
                tracing::warn!(component = %component.name, error = %e, "endpoint not published");
                ComponentOutcome::Failed(e)
            }
        }
    }

    fn try_publish(&self, component: &Component) -> Result<Option<Endpoint>, PublishError> {
        let Some(descriptor) = extract(&component.ty, self.names)? else {
            return Ok(None);
        };

        let service = component
            .instance
            .clone()
            .as_exposable()
            .ok_or(PublishError::NotExposable {
                type_name: component.ty.type_name,
            })?;

        self.publisher
            .publish(&descriptor.path(), service)
            .map(Some)
    }
}
