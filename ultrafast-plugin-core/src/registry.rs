//! # Plugin Registry Module
//!
//! Process-wide registry mapping a plugin name and config prefix to a
//! zero-argument constructor. Grounded on the name-keyed construction
//! pattern in `ultrafast_models_sdk::client`'s provider builders, behind a
//! `parking_lot::RwLock` for the read-preferring concurrency spec.md §4.1
//! calls for.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::plugin::Plugin;

/// A zero-argument plugin constructor, registered under a name and config
/// prefix.
pub type PluginConstructor = Arc<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

struct Entry {
    config_prefix: String,
    constructor: PluginConstructor,
}

/// Process-wide plugin registry. Cheaply cloneable.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    by_name: HashMap<String, Entry>,
    /// prefix -> names, insertion-ordered, for deterministic enumeration.
    by_prefix: HashMap<String, Vec<String>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name` and `config_prefix`.
    ///
    /// Idempotent for identical re-registration of the same name (a no-op
    /// success); rejects a conflicting re-registration under a *different*
    /// constructor. When `name` is registered a second time under a
    /// *different* prefix, the registry logs a warning and keeps the
    /// original binding — the later prefix records the name in its
    /// enumeration list but does not shadow the original owner (spec.md
    /// §4.1 Policy).
    pub fn register(
        &self,
        name: impl Into<String>,
        config_prefix: impl Into<String>,
        constructor: PluginConstructor,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let config_prefix = config_prefix.into();
        let mut inner = self.inner.write();

        if let Some(existing) = inner.by_name.get(&name) {
            if existing.config_prefix == config_prefix {
                if Arc::ptr_eq(&existing.constructor, &constructor) {
                    return Ok(());
                }
                return Err(RegistryError::AlreadyRegistered { name });
            }

            // Same name under a *different* prefix: the registry keeps the
            // earliest binding and just records the name in the later
            // prefix's enumeration list too, per spec.md §4.1 Policy.
            tracing::warn!(
                name = %name,
                original_prefix = %existing.config_prefix,
                conflicting_prefix = %config_prefix,
                "plugin name registered under more than one config prefix; honoring earliest binding"
            );
            inner
                .by_prefix
                .entry(config_prefix)
                .or_default()
                .push(name);
            return Ok(());
        }

        inner.by_prefix
            .entry(config_prefix.clone())
            .or_default()
            .push(name.clone());

        inner.by_name.insert(
            name,
            Entry {
                config_prefix,
                constructor,
            },
        );
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        let entry = inner
            .by_name
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })?;
        if let Some(names) = inner.by_prefix.get_mut(&entry.config_prefix) {
            names.retain(|n| n != name);
        }
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.read().by_name.contains_key(name)
    }

    /// Construct a fresh instance. Each call produces a new `Box<dyn
    /// Plugin>` — the registry stores constructors, never instances.
    pub fn create(&self, name: &str) -> Result<Box<dyn Plugin>, RegistryError> {
        let inner = self.inner.read();
        let entry = inner.by_name.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })?;
        Ok((entry.constructor)())
    }

    /// Construct a fresh instance and downcast it to `T`, failing with
    /// `TypeMismatch` if the constructed plugin doesn't satisfy `T`.
    pub fn create_typed<T: 'static>(&self, name: &str) -> Result<Box<T>, RegistryError>
    where
        T: Clone,
    {
        // Plugins are produced as `Box<dyn Plugin>`; downcasting a boxed
        // trait object into a concrete owned `T` requires the plugin's
        // `as_any` to hand back a `&T` we then clone, since `Box<dyn Any>`
        // downcasting consumes the box but `Plugin` is object-safe only
        // through `&dyn Any`.
        let plugin = self.create(name)?;
        plugin
            .as_any()
            .downcast_ref::<T>()
            .cloned()
            .map(Box::new)
            .ok_or_else(|| RegistryError::TypeMismatch {
                name: name.to_string(),
            })
    }

    /// Prefix -> registered names, in insertion order, for deterministic
    /// discovery enumeration.
    pub fn list_by_prefix(&self) -> HashMap<String, Vec<String>> {
        self.inner.read().by_prefix.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.read().by_name.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Dependency;
    use crate::runtime::Runtime;
    use crate::status::PluginStatus;
    use async_trait::async_trait;
    use std::any::Any;

    #[derive(Clone)]
    struct Stub(&'static str);

    #[async_trait]
    impl Plugin for Stub {
        fn name(&self) -> &str {
            self.0
        }
        fn version(&self) -> &str {
            "0.0.0"
        }
        fn dependencies(&self) -> Vec<Dependency> {
            Vec::new()
        }
        async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        async fn startup_tasks(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        async fn cleanup_tasks(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        fn status(&self) -> PluginStatus {
            PluginStatus::Unknown
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn constructor(name: &'static str) -> PluginConstructor {
        Arc::new(move || Box::new(Stub(name)) as Box<dyn Plugin>)
    }

    #[test]
    fn register_then_create_produces_fresh_instances() {
        let registry = PluginRegistry::new();
        registry.register("cache", "cache", constructor("cache")).unwrap();
        let a = registry.create("cache").unwrap();
        let b = registry.create("cache").unwrap();
        assert_eq!(a.name(), "cache");
        assert_eq!(b.name(), "cache");
    }

    #[test]
    fn conflicting_register_is_rejected() {
        let registry = PluginRegistry::new();
        registry.register("cache", "cache", constructor("cache")).unwrap();
        let err = registry
            .register("cache", "cache", constructor("cache"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
    }

    #[test]
    fn round_trip_register_unregister_has() {
        let registry = PluginRegistry::new();
        registry.register("cache", "cache", constructor("cache")).unwrap();
        assert!(registry.has("cache"));
        registry.unregister("cache").unwrap();
        assert!(!registry.has("cache"));
    }

    #[test]
    fn unregister_unknown_name_errors() {
        let registry = PluginRegistry::new();
        assert!(matches!(
            registry.unregister("nope").unwrap_err(),
            RegistryError::NotFound { .. }
        ));
    }

    #[test]
    fn name_under_second_prefix_keeps_earliest_binding() {
        let registry = PluginRegistry::new();
        registry.register("cache", "cache", constructor("cache")).unwrap();
        // Same name, different prefix: should succeed (warn + record, no shadow).
        registry
            .register("cache", "other", constructor("cache"))
            .unwrap();

        // Original binding still owns the name.
        assert_eq!(registry.inner.read().by_name["cache"].config_prefix, "cache");
        // Both prefixes enumerate the name.
        let by_prefix = registry.list_by_prefix();
        assert_eq!(by_prefix["cache"], vec!["cache".to_string()]);
        assert_eq!(by_prefix["other"], vec!["cache".to_string()]);
    }

    #[test]
    fn list_by_prefix_is_insertion_ordered() {
        let registry = PluginRegistry::new();
        registry.register("b", "shared", constructor("b")).unwrap();
        registry.register("a", "shared", constructor("a")).unwrap();
        let by_prefix = registry.list_by_prefix();
        assert_eq!(by_prefix["shared"], vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn create_typed_downcasts_successfully() {
        let registry = PluginRegistry::new();
        registry.register("cache", "cache", constructor("cache")).unwrap();
        let typed = registry.create_typed::<Stub>("cache").unwrap();
        assert_eq!(typed.0, "cache");
    }
}
