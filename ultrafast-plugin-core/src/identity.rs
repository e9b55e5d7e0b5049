//! Plugin identity and dependency declarations.
//!
//! A plugin's identity is immutable once the plugin has been constructed:
//! the registry and scheduler only ever read `Name`, `ID`, `Version`,
//! `Description`, and `Weight` off an already-built instance.

use serde::{Deserialize, Serialize};

/// Immutable identity of a plugin instance.
///
/// `name` is the stable, human-readable identifier used throughout the
/// registry, resolver, and event bus. `id` defaults to the same value for
/// singleton plugins but may differ for multiply-instantiated plugin types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginIdentity {
    pub name: String,
    pub id: String,
    pub version: String,
    pub description: String,
    /// Tie-break within a topological level; higher schedules first.
    pub weight: i32,
    /// Snapshot of the plugin's declared dependencies, taken at Prepare time
    /// so the resolver can work over plain data rather than `dyn Plugin`.
    pub dependencies: Vec<Dependency>,
}

impl PluginIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            version: version.into(),
            description: String::new(),
            weight: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// A declared dependency on another plugin, resolved by name.
///
/// `required = true` dependencies must be present in the working set and
/// reach `Active` before the dependent can start. `required = false`
/// dependencies are advisory: ignored if absent, ordering-constraining if
/// present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    pub id: String,
    pub required: bool,
}

impl Dependency {
    pub fn required(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            required: true,
        }
    }

    pub fn optional(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            required: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_defaults_id_to_name() {
        let identity = PluginIdentity::new("cache", "1.0.0");
        assert_eq!(identity.id, "cache");
        assert_eq!(identity.weight, 0);
    }

    #[test]
    fn identity_builder_overrides_fields() {
        let identity = PluginIdentity::new("cache", "1.0.0")
            .with_id("cache-2")
            .with_weight(10)
            .with_description("second cache instance");
        assert_eq!(identity.id, "cache-2");
        assert_eq!(identity.weight, 10);
        assert_eq!(identity.description, "second cache instance");
    }

    #[test]
    fn dependency_constructors_set_required_flag() {
        assert!(Dependency::required("db").required);
        assert!(!Dependency::optional("metrics").required);
    }
}
