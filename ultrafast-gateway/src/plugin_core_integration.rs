//! # Plugin Lifecycle Core Integration
//!
//! Wires `ultrafast_plugin_core`'s registry/bus/scheduler into the gateway's
//! `AppState` and registers the three reference hook plugins
//! (`content_filtering`, `cost_tracking`, `logging`) against the new
//! `Plugin` trait so their Init/Start/Stop lifecycle is managed by the
//! general-purpose scheduler rather than `PluginManager`'s ad hoc
//! `register_plugin` sequencing. `PluginManager` keeps owning the
//! request/response hook path (`before_request`/`after_response`/
//! `on_error`), which the lifecycle core does not model.

use std::sync::Arc;

use ultrafast_plugin_core::{
    EventBus, LifecycleScheduler, Plugin, PluginCoreConfig, PluginRegistry,
};

use crate::config::{Config, PluginConfig as GatewayPluginConfig};
use crate::gateway_error::GatewayError;
use crate::plugins::content_filtering::ContentFilteringPlugin;
use crate::plugins::cost_tracking::CostTrackingPlugin;
use crate::plugins::logging::LoggingPlugin;

/// Registry + bus + scheduler bundle, held in `AppState` behind an `Arc`.
pub struct PluginCoreHandle {
    pub registry: PluginRegistry,
    pub bus: EventBus,
    pub scheduler: LifecycleScheduler,
}

impl PluginCoreHandle {
    fn new(core_config: &PluginCoreConfig) -> Self {
        let bus = EventBus::new(core_config.event_bus_config());
        let registry = PluginRegistry::new();
        let runtime = ultrafast_plugin_core::Runtime::new(bus.clone());
        let scheduler = LifecycleScheduler::new(runtime, core_config.scheduler_config());
        Self {
            registry,
            bus,
            scheduler,
        }
    }
}

/// Build the three reference plugins from the gateway's `[[plugins]]`
/// config entries, register them into a fresh `PluginCoreHandle`, and run
/// them through the lifecycle core's `prepare` + `load` pipeline.
///
/// Mirrors `server::create_server`'s existing `create_plugin` loop, but
/// targets the new core instead of `PluginManager`. A plugin that fails to
/// construct or load is logged and skipped — it never blocks the rest of
/// the gateway from starting, matching the "plugin errors are non-blocking"
/// behavior already documented for `PluginManager`.
pub async fn initialize_plugin_core(
    config: &Config,
) -> Result<Arc<PluginCoreHandle>, GatewayError> {
    let handle = PluginCoreHandle::new(&config.plugin_core);

    let mut instances: Vec<Box<dyn Plugin>> = Vec::new();
    for plugin_config in &config.plugins {
        if !plugin_config.enabled {
            continue;
        }
        match build_reference_plugin(plugin_config) {
            Some(Ok(plugin)) => instances.push(plugin),
            Some(Err(e)) => {
                tracing::error!(
                    plugin = %plugin_config.name,
                    error = %e,
                    "failed to construct plugin for the lifecycle core"
                );
            }
            None => {
                // Not one of the three reference plugins (e.g. the
                // deprecated `rate_limiting` entry) — nothing to manage.
            }
        }
    }

    if !instances.is_empty() {
        handle
            .scheduler
            .prepare(instances)
            .map_err(ultrafast_plugin_core::PluginCoreError::from)?;
        match handle.scheduler.load().await {
            Ok(active) => {
                tracing::info!(plugins = ?active, "plugin lifecycle core loaded reference plugins");
            }
            Err(e) => {
                tracing::error!(error = %e, "plugin lifecycle core failed to load one or more reference plugins");
            }
        }
    }

    Ok(Arc::new(handle))
}

fn build_reference_plugin(
    plugin_config: &GatewayPluginConfig,
) -> Option<Result<Box<dyn Plugin>, GatewayError>> {
    match plugin_config.name.as_str() {
        "content_filtering" => Some(
            ContentFilteringPlugin::new(plugin_config)
                .map(|p| Box::new(p) as Box<dyn Plugin>),
        ),
        "cost_tracking" => Some(
            CostTrackingPlugin::new(plugin_config).map(|p| Box::new(p) as Box<dyn Plugin>),
        ),
        "logging" => {
            Some(LoggingPlugin::new(plugin_config).map(|p| Box::new(p) as Box<dyn Plugin>))
        }
        _ => None,
    }
}
