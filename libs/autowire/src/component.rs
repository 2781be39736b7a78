//! Managed components and the static type metadata attached to them.
//!
//! Two independent markers classify a component:
//! - implementing [`ManagedComponent`] makes it a container-managed component;
//! - a [`WebService`] entry in its [`ComponentType`] marks it network-exposed.
//!
//! Registrations are declared at compile time and collected through `inventory`:
//!
//! ```ignore
//! fn make_echo() -> anyhow::Result<Arc<dyn ManagedComponent>> {
//!     Ok(Arc::new(EchoService))
//! }
//!
//! autowire::inventory::submit! {
//!     ComponentRegistration {
//!         name: "echoService",
//!         ty: ComponentType::web_service("demo::EchoService", "EchoService"),
//!         factory: make_echo,
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::service::ExposableService;

/// "Network-exposed service" marker. `name` becomes the endpoint path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WebService {
    pub name: &'static str,
}

/// Metadata a component type declares about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentType {
    pub type_name: &'static str,
    pub web_service: Option<WebService>,
}

impl ComponentType {
    /// A managed component that is not exposed on the network.
    #[must_use]
    pub const fn plain(type_name: &'static str) -> Self {
        Self {
            type_name,
            web_service: None,
        }
    }

    /// A managed component exposed as the web service `name`.
    #[must_use]
    pub const fn web_service(type_name: &'static str, name: &'static str) -> Self {
        Self {
            type_name,
            web_service: Some(WebService { name }),
        }
    }
}

/// Container-managed component.
pub trait ManagedComponent: Send + Sync + 'static {
    /// Hand out the service capability, if this component has one.
    fn as_exposable(self: Arc<Self>) -> Option<Arc<dyn ExposableService>> {
        None
    }
}

/// Factory invoked by the container during initialization.
pub type ComponentFactory = fn() -> anyhow::Result<Arc<dyn ManagedComponent>>;

/// Compile-time registration of a component.
pub struct ComponentRegistration {
    pub name: &'static str,
    pub ty: ComponentType,
    pub factory: ComponentFactory,
}

inventory::collect!(ComponentRegistration);

impl fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// A constructed component instance together with its concrete type.
#[derive(Clone)]
pub struct Component {
    pub name: Arc<str>,
    pub ty: ComponentType,
    pub instance: Arc<dyn ManagedComponent>,
}

impl Component {
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        ty: ComponentType,
        instance: Arc<dyn ManagedComponent>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            instance,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}
