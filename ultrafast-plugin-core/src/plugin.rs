//! The plugin capability set (spec.md §6).
//!
//! Generalizes `ultrafast_gateway::plugins::{PluginLifecycle, PluginHooks}`
//! from the gateway's fixed request/response hook pair to the full
//! init/start/stop/health/configure contract the lifecycle core drives.
//! Plugins are "things that implement this trait" (spec.md §9's
//! capability-interface option), registered through
//! [`crate::registry::PluginRegistry`] as `Box<dyn Plugin>`.

use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;

use crate::identity::Dependency;
use crate::runtime::Runtime;
use crate::status::PluginStatus;

/// Error type returned by plugin step functions. Plugins are free to wrap
/// their own error types; the scheduler only needs the message for its
/// `plugin.failed` event metadata.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PluginError(pub String);

impl PluginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for PluginError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PluginError {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Capability set every plugin must implement to participate in the
/// lifecycle core.
#[async_trait]
pub trait Plugin: Send + Sync + Any {
    fn name(&self) -> &str;

    fn id(&self) -> &str {
        self.name()
    }

    fn version(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Tie-break within a topological level; higher schedules first.
    fn weight(&self) -> i32 {
        0
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Called once during the Initialize step. `runtime` is already
    /// narrowed to this plugin's id via `Runtime::with_plugin_context`.
    async fn initialize_resources(&self, runtime: &Runtime) -> Result<(), PluginError>;

    /// Called once during the Start step. Returning `Ok(())` moves the
    /// plugin to `Active`.
    async fn startup_tasks(&self, runtime: &Runtime) -> Result<(), PluginError>;

    /// Called once during the Stop step.
    async fn cleanup_tasks(&self, runtime: &Runtime) -> Result<(), PluginError>;

    /// Called by supervisors outside the load/unload cycle. `Ok(())` means
    /// healthy; the scheduler treats this purely as a boolean oracle and
    /// never inspects the error's cause (spec.md §9).
    async fn check_health(&self) -> Result<(), PluginError> {
        Ok(())
    }

    fn status(&self) -> PluginStatus;

    /// Hot-reconfiguration entry point. Optional; the default rejects any
    /// attempt to reconfigure plugins that don't implement it.
    async fn configure(&self, _config: Value) -> Result<(), PluginError> {
        Err(PluginError::new(format!(
            "{} does not support hot reconfiguration",
            self.name()
        )))
    }

    /// Enables `PluginRegistry::create_typed::<T>` downcasting. Concrete
    /// plugins implement this as `fn as_any(&self) -> &dyn Any { self }`.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;

    struct Noop {
        status: PluginStatus,
    }

    #[async_trait]
    impl Plugin for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn version(&self) -> &str {
            "0.0.0"
        }

        async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), PluginError> {
            Ok(())
        }

        async fn startup_tasks(&self, _runtime: &Runtime) -> Result<(), PluginError> {
            Ok(())
        }

        async fn cleanup_tasks(&self, _runtime: &Runtime) -> Result<(), PluginError> {
            Ok(())
        }

        fn status(&self) -> PluginStatus {
            self.status
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[tokio::test]
    async fn default_health_check_is_healthy() {
        let plugin = Noop {
            status: PluginStatus::Active,
        };
        assert!(plugin.check_health().await.is_ok());
    }

    #[tokio::test]
    async fn default_configure_rejects_hot_reconfig() {
        let plugin = Noop {
            status: PluginStatus::Active,
        };
        let runtime = Runtime::new(EventBus::default());
        let _ = runtime;
        assert!(plugin.configure(Value::Null).await.is_err());
    }
}
