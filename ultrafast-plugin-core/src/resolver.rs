//! # Dependency Resolver Module
//!
//! Partitions a working set of plugin identities into dependency-ordered
//! "levels" so the scheduler can run each level's plugins concurrently
//! while still respecting cross-plugin ordering. No direct teacher
//! precedent exists for a DAG scheduler in the pack; the level-partitioned
//! Kahn's algorithm and its tie-break below follow spec.md §4.4 exactly.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::ResolverError;
use crate::identity::PluginIdentity;

/// Resolves a working set's dependency graph into ordered levels.
#[derive(Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Partition `plugins` into levels such that every dependency of a
    /// plugin in level `n` appears in some level `< n`. Within a level,
    /// plugins are ordered by weight descending, then name ascending, so
    /// the scheduler has a deterministic concurrent-dispatch order even
    /// though execution itself may interleave.
    ///
    /// Fails with `ResolverError::Cycle` if the graph is not a DAG, or
    /// `ResolverError::MissingRequired` if a plugin declares a required
    /// dependency absent from the working set. Optional dependencies
    /// absent from the working set are silently ignored.
    pub fn resolve(
        &self,
        plugins: &[PluginIdentity],
    ) -> Result<Vec<Vec<PluginIdentity>>, ResolverError> {
        let present: HashSet<&str> = plugins.iter().map(|p| p.name.as_str()).collect();

        for plugin in plugins {
            for dep in &plugin.dependencies {
                if dep.required && !present.contains(dep.id.as_str()) {
                    return Err(ResolverError::MissingRequired {
                        dependent: plugin.name.clone(),
                        dependency: dep.id.clone(),
                    });
                }
            }
        }

        // Build in-degree counts and forward edges (dependency -> dependents)
        // restricted to edges whose target is actually present in the set.
        let mut in_degree: HashMap<&str, usize> =
            plugins.iter().map(|p| (p.name.as_str(), 0)).collect();
        let mut dependents: HashMap<&str, Vec<&str>> =
            plugins.iter().map(|p| (p.name.as_str(), Vec::new())).collect();

        for plugin in plugins {
            for dep in &plugin.dependencies {
                if present.contains(dep.id.as_str()) {
                    *in_degree.get_mut(plugin.name.as_str()).unwrap() += 1;
                    dependents.get_mut(dep.id.as_str()).unwrap().push(plugin.name.as_str());
                }
            }
        }

        let by_name: HashMap<&str, &PluginIdentity> =
            plugins.iter().map(|p| (p.name.as_str(), p)).collect();

        let mut levels = Vec::new();
        let mut resolved_count = 0usize;
        let mut remaining_in_degree = in_degree.clone();

        let mut frontier: VecDeque<&str> = remaining_in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&name, _)| name)
            .collect();

        while !frontier.is_empty() {
            let mut level_names: Vec<&str> = frontier.drain(..).collect();
            level_names.sort_by(|a, b| {
                let pa = by_name[a];
                let pb = by_name[b];
                pb.weight.cmp(&pa.weight).then_with(|| pa.name.cmp(&pb.name))
            });

            let mut next_frontier = Vec::new();
            for &name in &level_names {
                resolved_count += 1;
                for &dependent in &dependents[name] {
                    let deg = remaining_in_degree.get_mut(dependent).unwrap();
                    *deg -= 1;
                    if *deg == 0 {
                        next_frontier.push(dependent);
                    }
                }
            }

            levels.push(level_names.into_iter().map(|n| by_name[n].clone()).collect());
            frontier.extend(next_frontier);
        }

        if resolved_count != plugins.len() {
            let path = find_cycle(plugins, &present);
            return Err(ResolverError::Cycle { path });
        }

        Ok(levels)
    }
}

/// Locates one cycle via DFS for diagnostic purposes once Kahn's algorithm
/// has determined a cycle exists (some nodes never reach in-degree zero).
fn find_cycle(plugins: &[PluginIdentity], present: &HashSet<&str>) -> Vec<String> {
    let by_name: HashMap<&str, &PluginIdentity> =
        plugins.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut visiting = HashSet::new();
    let mut visited = HashSet::new();
    let mut stack = Vec::new();

    fn visit<'a>(
        node: &'a str,
        by_name: &HashMap<&'a str, &'a PluginIdentity>,
        present: &HashSet<&'a str>,
        visiting: &mut HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        if visited.contains(node) {
            return None;
        }
        if visiting.contains(node) {
            let start = stack.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(node.to_string());
            return Some(cycle);
        }

        visiting.insert(node);
        stack.push(node);

        if let Some(identity) = by_name.get(node) {
            for dep in &identity.dependencies {
                if present.contains(dep.id.as_str()) {
                    if let Some(cycle) = visit(dep.id.as_str(), by_name, present, visiting, visited, stack) {
                        return Some(cycle);
                    }
                }
            }
        }

        stack.pop();
        visiting.remove(node);
        visited.insert(node);
        None
    }

    for plugin in plugins {
        if let Some(cycle) = visit(
            plugin.name.as_str(),
            &by_name,
            present,
            &mut visiting,
            &mut visited,
            &mut stack,
        ) {
            return cycle;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Dependency;

    fn plugin(name: &str, weight: i32, deps: Vec<Dependency>) -> PluginIdentity {
        PluginIdentity::new(name, "0.0.0").with_weight(weight).with_dependencies(deps)
    }

    #[test]
    fn independent_plugins_land_in_one_level() {
        let plugins = vec![plugin("a", 0, vec![]), plugin("b", 0, vec![])];
        let levels = DependencyResolver::new().resolve(&plugins).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].len(), 2);
    }

    #[test]
    fn linear_chain_produces_one_plugin_per_level() {
        let plugins = vec![
            plugin("a", 0, vec![]),
            plugin("b", 0, vec![Dependency::required("a")]),
            plugin("c", 0, vec![Dependency::required("b")]),
        ];
        let levels = DependencyResolver::new().resolve(&plugins).unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0][0].name, "a");
        assert_eq!(levels[1][0].name, "b");
        assert_eq!(levels[2][0].name, "c");
    }

    #[test]
    fn diamond_dependency_resolves_in_three_levels() {
        let plugins = vec![
            plugin("base", 0, vec![]),
            plugin("left", 0, vec![Dependency::required("base")]),
            plugin("right", 0, vec![Dependency::required("base")]),
            plugin(
                "top",
                0,
                vec![Dependency::required("left"), Dependency::required("right")],
            ),
        ];
        let levels = DependencyResolver::new().resolve(&plugins).unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0][0].name, "base");
        let mut mid: Vec<&str> = levels[1].iter().map(|p| p.name.as_str()).collect();
        mid.sort();
        assert_eq!(mid, vec!["left", "right"]);
        assert_eq!(levels[2][0].name, "top");
    }

    #[test]
    fn cycle_is_detected() {
        let plugins = vec![
            plugin("a", 0, vec![Dependency::required("b")]),
            plugin("b", 0, vec![Dependency::required("a")]),
        ];
        let err = DependencyResolver::new().resolve(&plugins).unwrap_err();
        assert!(matches!(err, ResolverError::Cycle { .. }));
    }

    #[test]
    fn missing_required_dependency_errors() {
        let plugins = vec![plugin("a", 0, vec![Dependency::required("ghost")])];
        let err = DependencyResolver::new().resolve(&plugins).unwrap_err();
        assert!(matches!(err, ResolverError::MissingRequired { .. }));
    }

    #[test]
    fn missing_optional_dependency_is_ignored() {
        let plugins = vec![plugin("a", 0, vec![Dependency::optional("ghost")])];
        let levels = DependencyResolver::new().resolve(&plugins).unwrap();
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn same_level_ties_break_by_weight_desc_then_name_asc() {
        let plugins = vec![
            plugin("charlie", 5, vec![]),
            plugin("alpha", 10, vec![]),
            plugin("bravo", 10, vec![]),
        ];
        let levels = DependencyResolver::new().resolve(&plugins).unwrap();
        let names: Vec<&str> = levels[0].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
    }
}
