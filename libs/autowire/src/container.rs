//! Component container: constructs registered components and answers the
//! "all managed components" query the discovery pass starts from.

use std::collections::HashSet;
use std::sync::Arc;

use crate::component::{
    Component, ComponentFactory, ComponentRegistration, ComponentType, ManagedComponent,
};
use crate::error::ContainerError;

/// Source of managed components for a discovery pass.
///
/// Implemented by [`ComponentContainer`] and by plain closures, so a caller
/// can hand the orchestrator any pre-built component list.
pub trait ComponentSource {
    /// All managed components with their concrete types. Order carries no meaning.
    ///
    /// # Errors
    /// Returns a `ContainerError` if the source cannot be queried.
    fn managed_components(&self) -> Result<Vec<Component>, ContainerError>;
}

impl<F> ComponentSource for F
where
    F: Fn() -> Result<Vec<Component>, ContainerError>,
{
    fn managed_components(&self) -> Result<Vec<Component>, ContainerError> {
        self()
    }
}

enum Pending {
    Factory {
        name: Arc<str>,
        ty: ComponentType,
        factory: ComponentFactory,
    },
    Instance(Component),
}

impl Pending {
    fn name(&self) -> &Arc<str> {
        match self {
            Pending::Factory { name, .. } => name,
            Pending::Instance(c) => &c.name,
        }
    }
}

enum State {
    Collecting(Vec<Pending>),
    Ready(Vec<Component>),
    Failed(String),
}

/// Holds constructed components for the process lifetime.
///
/// Lifecycle: collect registrations, then [`initialize`](Self::initialize)
/// once. Queries before a successful initialization report the container as
/// unavailable.
pub struct ComponentContainer {
    state: State,
}

impl Default for ComponentContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentContainer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Collecting(Vec::new()),
        }
    }

    /// A container pre-loaded with every `inventory`-submitted registration,
    /// ordered by component name.
    #[must_use]
    pub fn from_inventory() -> Self {
        let mut regs: Vec<&'static ComponentRegistration> =
            inventory::iter::<ComponentRegistration>.into_iter().collect();
        regs.sort_by_key(|r| r.name);

        let mut container = Self::new();
        for reg in regs {
            container.register(reg);
        }
        container
    }

    /// Add a registration to be constructed on [`initialize`](Self::initialize).
    /// Ignored once the container left the collecting state.
    pub fn register(&mut self, reg: &ComponentRegistration) -> &mut Self {
        self.push(Pending::Factory {
            name: Arc::from(reg.name),
            ty: reg.ty,
            factory: reg.factory,
        })
    }

    /// Add an already constructed instance.
    pub fn register_instance(
        &mut self,
        name: impl Into<Arc<str>>,
        ty: ComponentType,
        instance: Arc<dyn ManagedComponent>,
    ) -> &mut Self {
        self.push(Pending::Instance(Component::new(name, ty, instance)))
    }

    fn push(&mut self, pending: Pending) -> &mut Self {
        if let State::Collecting(list) = &mut self.state {
            list.push(pending);
        } else {
            tracing::warn!(
                component = %pending.name(),
                "registration ignored: container already initialized"
            );
        }
        self
    }

    /// Construct all registered components.
    ///
    /// Calling it again on a ready container is a no-op.
    ///
    /// # Errors
    /// Returns `ContainerError::DuplicateComponent` if two registrations share a
    /// name, or `ContainerError::Factory` if a factory fails. Either leaves the
    /// container permanently failed.
    pub fn initialize(&mut self) -> Result<(), ContainerError> {
        let pending = match std::mem::replace(&mut self.state, State::Ready(Vec::new())) {
            State::Collecting(pending) => pending,
            ready @ State::Ready(_) => {
                self.state = ready;
                return Ok(());
            }
            State::Failed(reason) => {
                self.state = State::Failed(reason.clone());
                return Err(ContainerError::Failed { reason });
            }
        };

        match Self::construct(pending) {
            Ok(components) => {
                tracing::info!(count = components.len(), "component container initialized");
                self.state = State::Ready(components);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "component container failed to initialize");
                self.state = State::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn construct(pending: Vec<Pending>) -> Result<Vec<Component>, ContainerError> {
        let mut seen: HashSet<Arc<str>> = HashSet::with_capacity(pending.len());
        let mut out = Vec::with_capacity(pending.len());

        for p in pending {
            if !seen.insert(p.name().clone()) {
                return Err(ContainerError::DuplicateComponent {
                    component: p.name().clone(),
                });
            }
            let component = match p {
                Pending::Factory { name, ty, factory } => {
                    let instance = factory().map_err(|source| ContainerError::Factory {
                        component: name.clone(),
                        source,
                    })?;
                    tracing::debug!(
                        component = %name,
                        type_name = ty.type_name,
                        "component constructed"
                    );
                    Component { name, ty, instance }
                }
                Pending::Instance(c) => c,
            };
            out.push(component);
        }
        Ok(out)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Number of components, constructed or still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.state {
            State::Collecting(p) => p.len(),
            State::Ready(c) => c.len(),
            State::Failed(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ComponentSource for ComponentContainer {
    fn managed_components(&self) -> Result<Vec<Component>, ContainerError> {
        match &self.state {
            State::Ready(components) => Ok(components.clone()),
            State::Collecting(_) => Err(ContainerError::NotInitialized),
            State::Failed(reason) => Err(ContainerError::Failed {
                reason: reason.clone(),
            }),
        }
    }
}
