//! # Error Handling Module
//!
//! Structured error types for the Plugin Lifecycle Core, one enum per
//! component (registry, bus, resolver, scheduler, runtime, subscription
//! builder) aggregated into a single [`PluginCoreError`] at the crate
//! boundary. Every variant carries the structured data a caller needs to
//! act on the failure — no bare-string errors, per the design note in
//! spec.md §9.

use thiserror::Error;

/// Errors raised by the [`crate::registry::PluginRegistry`].
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("plugin '{name}' is already registered")]
    AlreadyRegistered { name: String },

    #[error("no plugin registered under name '{name}'")]
    NotFound { name: String },

    #[error("plugin '{name}' does not satisfy the requested capability set")]
    TypeMismatch { name: String },
}

/// Errors raised by the [`crate::bus::EventBus`].
#[derive(Error, Debug)]
pub enum BusError {
    #[error("subscription '{subscription}' queue is full; oldest event dropped")]
    Overflow { subscription: String },

    #[error("handler for subscription '{subscription}' panicked")]
    HandlerPanic { subscription: String },

    #[error("no subscription found for token '{token}'")]
    UnknownSubscription { token: String },
}

/// Errors raised by the [`crate::resolver::DependencyResolver`].
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("plugin '{dependent}' declares a required dependency on '{dependency}', which is not present in the working set")]
    MissingRequired {
        dependent: String,
        dependency: String,
    },
}

/// Errors raised by the [`crate::scheduler::LifecycleScheduler`].
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("plugin '{plugin}' timed out during step '{step}'")]
    StepTimeout { plugin: String, step: String },

    #[error("plugin '{plugin}' returned an error during step '{step}': {message}")]
    StepFailed {
        plugin: String,
        step: String,
        message: String,
    },

    #[error("plugin '{plugin}' panicked during step '{step}': {stack}")]
    StepPanic {
        plugin: String,
        step: String,
        stack: String,
    },

    #[error("plugin '{plugin}' failed because required dependency '{dependency}' failed")]
    DependencyFailed { plugin: String, dependency: String },

    #[error("no plugins were prepared for this load operation")]
    NoPluginsPrepared,

    #[error("{0} plugin(s) failed during this operation: {1}")]
    Composite(usize, String),

    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Errors raised by the [`crate::runtime::Runtime`] resource store.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("resource '{name}' is already registered by '{existing_owner}'")]
    ResourceConflict {
        name: String,
        existing_owner: String,
    },

    #[error("no resource named '{name}' is registered")]
    ResourceNotFound { name: String },
}

/// Errors raised by the [`crate::subscription::SubscriptionBuilder`].
#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("required subscription to '{service}' could not be established: {cause}")]
    Required { service: String, cause: String },

    #[error("service discovery returned no endpoints for '{service}'")]
    NoEndpoints { service: String },

    #[error("subscription spec requests TLS but no TlsProvider was configured on the builder")]
    TlsProviderMissing,
}

/// Top-level error type for the Plugin Lifecycle Core, composing every
/// component error. This is the type `ultrafast_gateway::gateway_error`
/// wraps with `#[from]` at the integration seam.
#[derive(Error, Debug)]
pub enum PluginCoreError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_renders_path() {
        let err = ResolverError::Cycle {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle detected: A -> B -> A");
    }

    #[test]
    fn missing_required_mentions_both_names() {
        let err = ResolverError::MissingRequired {
            dependent: "X".into(),
            dependency: "Y".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('X'));
        assert!(msg.contains('Y'));
    }

    #[test]
    fn step_failed_is_distinct_from_step_panic() {
        let failed = SchedulerError::StepFailed {
            plugin: "p".into(),
            step: "start".into(),
            message: "boom".into(),
        };
        assert!(failed.to_string().contains("returned an error"));
        assert!(!matches!(failed, SchedulerError::StepPanic { .. }));
    }

    #[test]
    fn scheduler_error_wraps_resolver_error_via_from() {
        let resolver_err = ResolverError::MissingRequired {
            dependent: "X".into(),
            dependency: "Y".into(),
        };
        let scheduler_err: SchedulerError = resolver_err.into();
        assert!(matches!(scheduler_err, SchedulerError::Resolver(_)));
    }
}
