//! Dependency-ordered, level-parallel plugin lifecycle core.
//!
//! A [`registry::PluginRegistry`] holds named plugin constructors. A
//! [`scheduler::LifecycleScheduler`] partitions a working set into
//! dependency levels via [`resolver::DependencyResolver`] and drives each
//! plugin through Initialize/Start/Stop, handing it a narrowed
//! [`runtime::Runtime`] view scoped to its own id. Plugins communicate
//! lifecycle and business events through the [`bus::EventBus`], and may
//! declare outbound subscriptions built by
//! [`subscription::SubscriptionBuilder`].

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod plugin;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod runtime;
pub mod scheduler;
pub mod status;
pub mod subscription;

pub use bus::{EventBus, EventBusConfig, EventHandler, SubscriptionToken};
pub use config::PluginCoreConfig;
pub use error::{
    BusError, PluginCoreError, RegistryError, ResolverError, RuntimeError, SchedulerError,
    SubscriptionError,
};
pub use event::{Event, EventFilter, EventPriority, EventType};
pub use identity::{Dependency, PluginIdentity};
pub use plugin::{Plugin, PluginError};
pub use registry::PluginRegistry;
pub use resolver::DependencyResolver;
pub use resource::{ResourceDescriptor, ResourceStore, ResourceValue};
pub use runtime::Runtime;
pub use scheduler::{LifecycleScheduler, SchedulerConfig, SubsetUnloadPolicy};
pub use status::PluginStatus;
pub use subscription::{
    ConnectionFactory, FilterFactory, NodeFilter, ResolvedTls, ServiceDiscovery,
    SubscriptionBuilder, SubscriptionSpec, TlsProvider,
};
