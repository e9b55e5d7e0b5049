//! Resource descriptors and the shared/private resource stores.
//!
//! Grounded on `ultrafast_gateway::plugins::PluginManager`'s `DashMap`-backed
//! registration pattern, generalized from "named plugin" to "named opaque
//! value with metadata and an optional owner".

use dashmap::DashMap;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RuntimeError;

/// An opaque value registered with the [`crate::runtime::Runtime`].
pub type ResourceValue = Arc<dyn Any + Send + Sync>;

/// A registered resource: its opaque value plus bookkeeping metadata.
#[derive(Clone)]
pub struct ResourceDescriptor {
    pub name: String,
    pub owner_plugin_id: Option<String>,
    pub value: ResourceValue,
    pub metadata: HashMap<String, Value>,
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl ResourceDescriptor {
    /// Whether this resource was marked `"linger": true` in its metadata —
    /// the scheduler leaves lingering shared resources in place on owner
    /// termination instead of deregistering them (spec.md §4.3 Cleanup
    /// semantics).
    pub fn lingers(&self) -> bool {
        matches!(self.metadata.get("linger"), Some(Value::Bool(true)))
    }
}

/// A concurrent, name-keyed resource table. Used once for the process-wide
/// shared store and once per plugin for the private store.
#[derive(Default)]
pub struct ResourceStore {
    entries: DashMap<String, ResourceDescriptor>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Fails with `ResourceConflict` if a
    /// differently-owned entry already occupies `name`, unless `override_existing`
    /// is set or the caller is the existing owner.
    pub fn register(
        &self,
        name: &str,
        owner_plugin_id: Option<&str>,
        value: ResourceValue,
        metadata: HashMap<String, Value>,
        override_existing: bool,
    ) -> Result<(), RuntimeError> {
        if let Some(existing) = self.entries.get(name) {
            let same_owner = existing.owner_plugin_id.as_deref() == owner_plugin_id;
            if !same_owner && !override_existing {
                return Err(RuntimeError::ResourceConflict {
                    name: name.to_string(),
                    existing_owner: existing
                        .owner_plugin_id
                        .clone()
                        .unwrap_or_else(|| "<shared>".to_string()),
                });
            }
        }
        self.entries.insert(
            name.to_string(),
            ResourceDescriptor {
                name: name.to_string(),
                owner_plugin_id: owner_plugin_id.map(str::to_string),
                value,
                metadata,
                registered_at: chrono::Utc::now(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<ResourceValue, RuntimeError> {
        self.entries
            .get(name)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| RuntimeError::ResourceNotFound {
                name: name.to_string(),
            })
    }

    pub fn remove(&self, name: &str) -> Option<ResourceDescriptor> {
        self.entries.remove(name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every resource currently owned by `plugin_id`, without removing
    /// them. Used by `CleanupResources` to decide what to deregister vs.
    /// leave lingering.
    pub fn owned_by(&self, plugin_id: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.owner_plugin_id.as_deref() == Some(plugin_id))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: i32) -> ResourceValue {
        Arc::new(n)
    }

    #[test]
    fn register_and_get_roundtrip() {
        let store = ResourceStore::new();
        store
            .register("db.pool", Some("database"), value(42), HashMap::new(), false)
            .unwrap();
        let got = store.get("db.pool").unwrap();
        assert_eq!(*got.downcast_ref::<i32>().unwrap(), 42);
    }

    #[test]
    fn second_register_by_different_owner_conflicts() {
        let store = ResourceStore::new();
        store
            .register("db.pool", Some("database"), value(1), HashMap::new(), false)
            .unwrap();
        let err = store
            .register("db.pool", Some("other"), value(2), HashMap::new(), false)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ResourceConflict { .. }));
    }

    #[test]
    fn same_owner_can_reregister() {
        let store = ResourceStore::new();
        store
            .register("db.pool", Some("database"), value(1), HashMap::new(), false)
            .unwrap();
        store
            .register("db.pool", Some("database"), value(2), HashMap::new(), false)
            .unwrap();
    }

    #[test]
    fn missing_resource_returns_not_found() {
        let store = ResourceStore::new();
        let err = store.get("nope").unwrap_err();
        assert!(matches!(err, RuntimeError::ResourceNotFound { .. }));
    }

    #[test]
    fn owned_by_filters_correctly() {
        let store = ResourceStore::new();
        store
            .register("a", Some("p1"), value(1), HashMap::new(), false)
            .unwrap();
        store
            .register("b", Some("p2"), value(2), HashMap::new(), false)
            .unwrap();
        assert_eq!(store.owned_by("p1"), vec!["a".to_string()]);
    }

    #[test]
    fn lingering_resource_is_flagged() {
        let mut metadata = HashMap::new();
        metadata.insert("linger".to_string(), Value::Bool(true));
        let store = ResourceStore::new();
        store
            .register("cache.conn", Some("cache"), value(1), metadata, false)
            .unwrap();
        let descriptor = store.remove("cache.conn").unwrap();
        assert!(descriptor.lingers());
    }
}
