//! # Runtime Module
//!
//! The only API surface a plugin may use to interact with the rest of the
//! process: shared/private resource access, event emission, configuration,
//! and cooperative cancellation. Plugins never see the registry, resolver,
//! or scheduler directly.
//!
//! `with_plugin_context` is the "Runtime narrowing" design note from
//! spec.md §9: rather than have plugins inherit from a shared base type
//! (the pattern some source ecosystems use), a single `Runtime` produces a
//! thin, plugin-scoped view that delegates to the same shared stores with a
//! bound `plugin_id`. This mirrors how `AppState` in `server.rs` is cloned
//! (cheap, `Arc`-backed) and handed to every handler rather than
//! reconstructed per request.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::bus::EventBus;
use crate::error::RuntimeError;
use crate::event::{Event, EventPriority, EventType};
use crate::resource::{ResourceStore, ResourceValue};

struct RuntimeInner {
    shared: ResourceStore,
    private: DashMap<String, Arc<ResourceStore>>,
    bus: EventBus,
    config: parking_lot::RwLock<HashMap<String, Value>>,
}

/// Per-manager facade exposing resources, events, configuration, and
/// cancellation to plugins. Cheaply cloneable; `with_plugin_context`
/// produces a narrowed clone bound to one plugin's id.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
    plugin_id: Option<String>,
    cancellation: Option<CancellationToken>,
}

impl Runtime {
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                shared: ResourceStore::new(),
                private: DashMap::new(),
                bus,
                config: parking_lot::RwLock::new(HashMap::new()),
            }),
            plugin_id: None,
            cancellation: None,
        }
    }

    /// Produce a plugin-scoped view: emitted events are stamped with
    /// `plugin_id`, private-resource operations are scoped to it.
    pub fn with_plugin_context(&self, plugin_id: impl Into<String>) -> Runtime {
        Runtime {
            inner: self.inner.clone(),
            plugin_id: Some(plugin_id.into()),
            cancellation: self.cancellation.clone(),
        }
    }

    /// Attach a cancellation signal scoped to the current lifecycle step.
    /// The scheduler calls this before invoking a plugin's step function.
    pub fn with_cancellation(&self, token: CancellationToken) -> Runtime {
        Runtime {
            inner: self.inner.clone(),
            plugin_id: self.plugin_id.clone(),
            cancellation: Some(token),
        }
    }

    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|token| token.is_cancelled())
            .unwrap_or(false)
    }

    pub fn cancellation_token(&self) -> Option<CancellationToken> {
        self.cancellation.clone()
    }

    // -- Shared resources -------------------------------------------------

    pub fn register_shared_resource(
        &self,
        name: &str,
        value: ResourceValue,
        metadata: HashMap<String, Value>,
    ) -> Result<(), RuntimeError> {
        self.inner
            .shared
            .register(name, self.plugin_id.as_deref(), value, metadata, false)
    }

    /// Like `register_shared_resource`, but replaces an existing resource of
    /// the same name instead of rejecting with `ResourceConflict`. For the
    /// rare case where a plugin legitimately supersedes another's resource
    /// (e.g. a hot-reloaded connection pool taking over its predecessor's
    /// slot) rather than racing it.
    pub fn register_shared_resource_overriding(
        &self,
        name: &str,
        value: ResourceValue,
        metadata: HashMap<String, Value>,
    ) -> Result<(), RuntimeError> {
        self.inner
            .shared
            .register(name, self.plugin_id.as_deref(), value, metadata, true)
    }

    pub fn get_shared_resource(&self, name: &str) -> Result<ResourceValue, RuntimeError> {
        self.inner.shared.get(name)
    }

    // -- Private resources (scoped to the narrowed plugin) ----------------

    fn private_store(&self) -> Arc<ResourceStore> {
        let plugin_id = self
            .plugin_id
            .clone()
            .unwrap_or_else(|| "<unscoped>".to_string());
        self.inner
            .private
            .entry(plugin_id)
            .or_insert_with(|| Arc::new(ResourceStore::new()))
            .clone()
    }

    pub fn register_private_resource(
        &self,
        name: &str,
        value: ResourceValue,
        metadata: HashMap<String, Value>,
    ) -> Result<(), RuntimeError> {
        self.private_store()
            .register(name, self.plugin_id.as_deref(), value, metadata, true)
    }

    pub fn get_private_resource(&self, name: &str) -> Result<ResourceValue, RuntimeError> {
        self.private_store().get(name)
    }

    /// Release all private resources owned by `plugin_id` and hand shared
    /// resources it owned back to the caller's discretion: deregistered by
    /// default, left in place when metadata marks them `"linger"`.
    /// Invoked by the scheduler after `Stop`, never by plugins themselves.
    pub fn cleanup_resources(&self, plugin_id: &str) -> Vec<String> {
        self.inner.private.remove(plugin_id);

        let mut left_lingering = Vec::new();
        for name in self.inner.shared.owned_by(plugin_id) {
            if let Some(descriptor) = self.inner.shared.remove(&name) {
                if descriptor.lingers() {
                    left_lingering.push(name.clone());
                    let _ = self.inner.shared.register(
                        &name,
                        descriptor.owner_plugin_id.as_deref(),
                        descriptor.value,
                        descriptor.metadata,
                        true,
                    );
                }
            }
        }
        left_lingering
    }

    // -- Events ------------------------------------------------------------

    pub async fn emit_event(&self, mut event: Event) {
        if let Some(plugin_id) = &self.plugin_id {
            event.plugin_id.get_or_insert_with(|| plugin_id.clone());
        }
        self.inner.bus.publish(event).await;
    }

    /// Convenience equivalent to `emit_event` with an explicit plugin id;
    /// indistinguishable to subscribers from
    /// `with_plugin_context(id).emit_event(...)` (spec.md §8 round-trip
    /// property).
    pub async fn emit_plugin_event(
        &self,
        plugin_id: impl Into<String>,
        event_type: EventType,
        metadata: HashMap<String, Value>,
    ) {
        let mut event = Event::new(event_type, "runtime").with_plugin(plugin_id);
        event.metadata = metadata;
        self.inner.bus.publish(event).await;
    }

    pub async fn emit_error(&self, source: &str, message: impl Into<String>) {
        let mut event = Event::new(EventType::ErrorOccurred, source)
            .with_priority(EventPriority::High)
            .with_error(message);
        if let Some(plugin_id) = &self.plugin_id {
            event = event.with_plugin(plugin_id.clone());
        }
        self.inner.bus.publish(event).await;
    }

    // -- Configuration -------------------------------------------------------

    pub fn get_config(&self, key: &str) -> Option<Value> {
        self.inner.config.read().get(key).cloned()
    }

    pub fn set_config(&self, key: impl Into<String>, value: Value) {
        self.inner.config.write().insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::event::EventFilter;

    fn runtime() -> Runtime {
        Runtime::new(EventBus::default())
    }

    #[test]
    fn private_resources_are_isolated_per_plugin() {
        let rt = runtime();
        let a = rt.with_plugin_context("a");
        let b = rt.with_plugin_context("b");

        a.register_private_resource("secret", Arc::new(1u32), HashMap::new())
            .unwrap();

        assert!(a.get_private_resource("secret").is_ok());
        assert!(b.get_private_resource("secret").is_err());
    }

    #[test]
    fn shared_resource_conflict_is_rejected() {
        let rt = runtime();
        let a = rt.with_plugin_context("a");
        let b = rt.with_plugin_context("b");

        a.register_shared_resource("db.pool", Arc::new(1u32), HashMap::new())
            .unwrap();
        let err = b
            .register_shared_resource("db.pool", Arc::new(2u32), HashMap::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ResourceConflict { .. }));
    }

    #[test]
    fn overriding_registration_replaces_existing_owner() {
        let rt = runtime();
        let a = rt.with_plugin_context("a");
        let b = rt.with_plugin_context("b");

        a.register_shared_resource("db.pool", Arc::new(1u32), HashMap::new())
            .unwrap();
        b.register_shared_resource_overriding("db.pool", Arc::new(2u32), HashMap::new())
            .unwrap();

        let value = rt.get_shared_resource("db.pool").unwrap();
        assert_eq!(*value.downcast_ref::<u32>().unwrap(), 2);
    }

    #[test]
    fn cleanup_drops_private_and_non_lingering_shared_resources() {
        let rt = runtime();
        let a = rt.with_plugin_context("a");
        a.register_private_resource("scratch", Arc::new(1u32), HashMap::new())
            .unwrap();
        a.register_shared_resource("public.thing", Arc::new(1u32), HashMap::new())
            .unwrap();

        rt.cleanup_resources("a");

        assert!(a.get_private_resource("scratch").is_err());
        assert!(rt.get_shared_resource("public.thing").is_err());
    }

    #[test]
    fn cleanup_preserves_lingering_shared_resources() {
        let rt = runtime();
        let a = rt.with_plugin_context("a");
        let mut metadata = HashMap::new();
        metadata.insert("linger".to_string(), Value::Bool(true));
        a.register_shared_resource("public.conn", Arc::new(1u32), metadata)
            .unwrap();

        let lingering = rt.cleanup_resources("a");

        assert_eq!(lingering, vec!["public.conn".to_string()]);
        assert!(rt.get_shared_resource("public.conn").is_ok());
    }

    #[tokio::test]
    async fn narrowed_emit_stamps_plugin_id() {
        let rt = runtime();
        let scoped = rt.with_plugin_context("cache");
        scoped
            .emit_event(Event::new(EventType::PluginStarted, "test"))
            .await;

        let history = rt.inner.bus.history_for_plugin("cache", &EventFilter::default()).await;
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn emit_plugin_event_matches_narrowed_emit() {
        let rt = runtime();
        rt.emit_plugin_event("cache", EventType::PluginStarted, HashMap::new())
            .await;
        let scoped = rt.with_plugin_context("cache");
        scoped
            .emit_event(Event::new(EventType::PluginStarted, "runtime"))
            .await;

        let history = rt.inner.bus.history_for_plugin("cache", &EventFilter::default()).await;
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.plugin_id.as_deref() == Some("cache")));
    }
}
