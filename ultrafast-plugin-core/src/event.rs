//! Event model for the lifecycle bus.
//!
//! `EventType` is a closed set plus a namespaced user range
//! (`"<pluginID>.<topic>"`), matching spec.md §6.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum EventType {
    SystemPluginManagerStartup,
    SystemPluginManagerShutdown,
    PluginPreparing,
    PluginPrepared,
    PluginInitializing,
    PluginInitialized,
    PluginStarting,
    PluginStarted,
    PluginStopping,
    PluginStopped,
    PluginFailed,
    PluginResourceCleanupFailed,
    ErrorOccurred,
    /// Namespaced user event: `"<pluginID>.<free form>"`.
    User(String),
}

impl EventType {
    /// Construct a namespaced user event type for `plugin_id`.
    pub fn user(plugin_id: impl AsRef<str>, topic: impl AsRef<str>) -> Self {
        EventType::User(format!("{}.{}", plugin_id.as_ref(), topic.as_ref()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl Default for EventPriority {
    fn default() -> Self {
        EventPriority::Normal
    }
}

/// A structured, time-stamped lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub priority: EventPriority,
    /// Free-form originator label (e.g. `"scheduler"`, `"registry"`).
    pub source: String,
    /// Coarse grouping used for filtering/metrics (e.g. `"lifecycle"`,
    /// `"error"`).
    pub category: String,
    pub plugin_id: Option<String>,
    pub status: Option<crate::status::PluginStatus>,
    pub timestamp: DateTime<Utc>,
    pub metadata: HashMap<String, Value>,
    pub error: Option<String>,
}

impl Event {
    pub fn new(event_type: EventType, source: impl Into<String>) -> Self {
        Self {
            event_type,
            priority: EventPriority::Normal,
            source: source.into(),
            category: "lifecycle".to_string(),
            plugin_id: None,
            status: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
            error: None,
        }
    }

    pub fn with_plugin(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = Some(plugin_id.into());
        self
    }

    pub fn with_status(mut self, status: crate::status::PluginStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.category = "error".to_string();
        self.error = Some(error.into());
        self
    }
}

/// Subscription / history filter. An empty filter (all fields `None`)
/// matches every event.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub types: Option<Vec<EventType>>,
    pub sources: Option<Vec<String>>,
    pub priorities: Option<Vec<EventPriority>>,
    pub since: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&event.event_type) {
                return false;
            }
        }
        if let Some(sources) = &self.sources {
            if !sources.iter().any(|s| s == &event.source) {
                return false;
            }
        }
        if let Some(priorities) = &self.priorities {
            if !priorities.contains(&event.priority) {
                return false;
            }
        }
        if let Some(since) = &self.since {
            if event.timestamp < *since {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_event_namespaces_by_plugin_id() {
        let event_type = EventType::user("cache", "evicted");
        assert_eq!(event_type, EventType::User("cache.evicted".to_string()));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = EventFilter::default();
        let event = Event::new(EventType::PluginStarted, "scheduler").with_plugin("cache");
        assert!(filter.matches(&event));
    }

    #[test]
    fn filter_by_type_excludes_non_matching_events() {
        let filter = EventFilter {
            types: Some(vec![EventType::PluginFailed]),
            ..Default::default()
        };
        let started = Event::new(EventType::PluginStarted, "scheduler");
        let failed = Event::new(EventType::PluginFailed, "scheduler");
        assert!(!filter.matches(&started));
        assert!(filter.matches(&failed));
    }

    #[test]
    fn filter_by_since_excludes_older_events() {
        let cutoff = Utc::now();
        let mut event = Event::new(EventType::PluginStarted, "scheduler");
        event.timestamp = cutoff - chrono::Duration::seconds(5);
        let filter = EventFilter {
            since: Some(cutoff),
            ..Default::default()
        };
        assert!(!filter.matches(&event));
    }
}
