//! Autowire - startup discovery and publication of network-exposed services.
//!
//! During application startup a [`ComponentContainer`] holds every managed
//! component. Components whose type carries the [`WebService`] marker are
//! published by the [`DiscoveryOrchestrator`] at `"/" + name` through a
//! [`ProtocolRuntime`].
//!
//! ```ignore
//! let mut container = ComponentContainer::from_inventory();
//! container.initialize()?;
//!
//! let registry = Arc::new(EndpointRegistry::new());
//! let publisher = EndpointPublisher::new(registry.clone(), CollisionPolicy::FailFast);
//! let report = DiscoveryOrchestrator::new(publisher, NamePolicy::Strict).run(&container)?;
//! ```

pub mod component;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod publisher;
pub mod registry;
pub mod runtime;
pub mod service;

pub use component::{
    Component, ComponentFactory, ComponentRegistration, ComponentType, ManagedComponent, WebService,
};
pub use config::{CollisionPolicy, DiscoveryConfig, NamePolicy};
pub use container::{ComponentContainer, ComponentSource};
pub use descriptor::{ServiceDescriptor, extract};
pub use discovery::{ComponentOutcome, DiscoveryOrchestrator, PassReport, PassState};
pub use error::{ContainerError, DescriptorError, DiscoveryError, PublishError};
pub use publisher::{Endpoint, EndpointPublisher};
pub use registry::{BoundEndpoint, EndpointRegistry};
pub use runtime::{BindError, BindMode, EndpointHandle, ProtocolRuntime};
pub use service::{ExposableService, ServiceFault};

// Re-exported so registrations can be submitted without a direct dependency.
pub use inventory;
