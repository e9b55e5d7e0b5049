//! # Configuration Module
//!
//! `PluginCoreConfig` mirrors the `Duration`-via-seconds, `serde(default)`
//! field style `ultrafast_gateway::config::{MetricsConfig, CacheConfig}`
//! use, so it drops into the gateway's existing TOML/env layered config
//! loader without a bespoke deserializer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::bus::EventBusConfig;
use crate::scheduler::{SchedulerConfig, SubsetUnloadPolicy};

fn default_init_timeout_secs() -> u64 {
    30
}

fn default_start_timeout_secs() -> u64 {
    60
}

fn default_stop_timeout_secs() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    1024
}

fn default_queue_capacity() -> usize {
    256
}

fn default_handler_timeout_secs() -> u64 {
    30
}

fn default_worker_count() -> usize {
    (2 * num_cpus::get()).max(4)
}

fn default_subset_unload_policy() -> String {
    "warn".to_string()
}

/// Serializable configuration for the plugin lifecycle core, embedded as a
/// named field in the gateway's top-level `Config` struct the same way
/// `metrics`/`cache` sections are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginCoreConfig {
    /// Initialize-step timeout in seconds (spec default: 30s).
    #[serde(default = "default_init_timeout_secs")]
    pub init_timeout_secs: u64,
    /// Start-step timeout in seconds (spec default: 60s).
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
    /// Stop-step timeout in seconds (spec default: 30s).
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
    /// How many events the bus keeps for `History`/`HistoryForPlugin`.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Per-subscription bounded queue depth before drop-oldest kicks in.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-handler-invocation timeout in seconds.
    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,
    /// Concurrent handler invocations allowed across the whole bus.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// `"warn"` or `"fail"` — see `SubsetUnloadPolicy`.
    #[serde(default = "default_subset_unload_policy")]
    pub subset_unload_policy: String,
}

impl Default for PluginCoreConfig {
    fn default() -> Self {
        Self {
            init_timeout_secs: default_init_timeout_secs(),
            start_timeout_secs: default_start_timeout_secs(),
            stop_timeout_secs: default_stop_timeout_secs(),
            history_capacity: default_history_capacity(),
            queue_capacity: default_queue_capacity(),
            handler_timeout_secs: default_handler_timeout_secs(),
            worker_count: default_worker_count(),
            subset_unload_policy: default_subset_unload_policy(),
        }
    }
}

impl PluginCoreConfig {
    pub fn event_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            history_capacity: self.history_capacity,
            queue_capacity: self.queue_capacity,
            worker_count: self.worker_count,
            handler_timeout: Duration::from_secs(self.handler_timeout_secs),
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            init_timeout: Duration::from_secs(self.init_timeout_secs),
            start_timeout: Duration::from_secs(self.start_timeout_secs),
            stop_timeout: Duration::from_secs(self.stop_timeout_secs),
            subset_unload_policy: match self.subset_unload_policy.as_str() {
                "fail" => SubsetUnloadPolicy::Fail,
                _ => SubsetUnloadPolicy::Warn,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let config = PluginCoreConfig::default();
        assert_eq!(config.init_timeout_secs, 30);
        assert_eq!(config.start_timeout_secs, 60);
        assert_eq!(config.stop_timeout_secs, 30);
        assert_eq!(config.subset_unload_policy, "warn");
        assert!(config.worker_count >= 4);
    }

    #[test]
    fn fail_policy_string_maps_to_fail_variant() {
        let config = PluginCoreConfig {
            subset_unload_policy: "fail".to_string(),
            ..PluginCoreConfig::default()
        };
        assert_eq!(config.scheduler_config().subset_unload_policy, SubsetUnloadPolicy::Fail);
    }

    #[test]
    fn deserializes_from_partial_toml() {
        let parsed: PluginCoreConfig = toml::from_str("init_timeout_secs = 5\n").unwrap();
        assert_eq!(parsed.init_timeout_secs, 5);
        assert_eq!(parsed.start_timeout_secs, default_start_timeout_secs());
        assert_eq!(parsed.history_capacity, default_history_capacity());
    }
}
