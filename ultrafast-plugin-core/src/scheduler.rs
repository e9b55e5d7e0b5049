//! # Lifecycle Scheduler Module
//!
//! Drives the Prepare -> Sort -> Initialize -> Start -> Run -> Stop pipeline
//! over a working set of plugins, delegating ordering to
//! [`crate::resolver::DependencyResolver`] and step execution to each
//! plugin's `Plugin` trait methods. Per-step timeouts and panic isolation
//! follow the same `tokio::time::timeout` + `tokio::spawn` + `JoinError`
//! pattern `circuit_breaker.rs::call` uses around upstream calls, and
//! level-parallel dispatch follows `dashboard::websocket`'s
//! `start_background_tasks` fan-out.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::SchedulerError;
use crate::event::{Event, EventType};
use crate::identity::PluginIdentity;
use crate::plugin::Plugin;
use crate::resolver::DependencyResolver;
use crate::runtime::Runtime;
use crate::status::PluginStatus;

/// `{"step": step}` metadata, for events with no failure/success cause to
/// report (spec.md §4.5: "every event carries ... a Metadata map with
/// step-specific context").
fn step_meta(step: &str) -> HashMap<String, Value> {
    let mut metadata = HashMap::new();
    metadata.insert("step".to_string(), Value::String(step.to_string()));
    metadata
}

/// `{"step": step, "cause": cause}` metadata.
fn step_and_cause(step: &str, cause: &str) -> HashMap<String, Value> {
    let mut metadata = step_meta(step);
    metadata.insert("cause".to_string(), Value::String(cause.to_string()));
    metadata
}

/// Derive `{"step", "cause"}` (plus `"dependency"` where applicable) directly
/// from a `SchedulerError`, so `plugin.failed` events always carry the same
/// context a caller would get from the error's `Display` impl.
fn failure_metadata(err: &SchedulerError) -> HashMap<String, Value> {
    match err {
        SchedulerError::StepTimeout { step, .. } => step_and_cause(step, "timeout"),
        SchedulerError::StepFailed { step, .. } => step_and_cause(step, "error"),
        SchedulerError::StepPanic { step, .. } => step_and_cause(step, "panic"),
        SchedulerError::DependencyFailed { dependency, .. } => {
            let mut metadata = step_and_cause("dependency", "required_dependency_failed");
            metadata.insert("dependency".to_string(), Value::String(dependency.clone()));
            metadata
        }
        SchedulerError::NoPluginsPrepared
        | SchedulerError::Composite(_, _)
        | SchedulerError::Resolver(_) => step_and_cause("unknown", "scheduler_task_failed"),
    }
}

/// Policy applied when `unload_by_name` would strand dependents of an
/// unloaded plugin that remain in the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetUnloadPolicy {
    Warn,
    Fail,
}

impl Default for SubsetUnloadPolicy {
    fn default() -> Self {
        SubsetUnloadPolicy::Warn
    }
}

/// Tuning knobs for the scheduler. Mirrors `PluginCoreConfig`'s
/// scheduler-related fields. Per-step timeouts default per spec.md §4.5:
/// Init 30s, Start 60s, Stop 30s.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub init_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
    pub subset_unload_policy: SubsetUnloadPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(30),
            start_timeout: Duration::from_secs(60),
            stop_timeout: Duration::from_secs(30),
            subset_unload_policy: SubsetUnloadPolicy::Warn,
        }
    }
}

struct Managed {
    plugin: Arc<dyn Plugin>,
    identity: PluginIdentity,
    status: PluginStatus,
}

/// Drives the full plugin lifecycle over a managed set of plugins. Owns no
/// network or storage state itself — all of that lives behind the
/// [`Runtime`] each plugin is handed.
pub struct LifecycleScheduler {
    config: SchedulerConfig,
    runtime: Runtime,
    resolver: DependencyResolver,
    managed: Arc<DashMap<String, Managed>>,
    /// One cancellation signal per in-flight load/unload operation (spec.md
    /// §5 "the scheduler owns one cancellation signal per load/unload
    /// operation"). `cancel_current_operation` lets an external caller
    /// (e.g. a signal handler) request cooperative shutdown of whatever is
    /// running right now.
    current_cancellation: parking_lot::Mutex<Option<CancellationToken>>,
}

impl LifecycleScheduler {
    pub fn new(runtime: Runtime, config: SchedulerConfig) -> Self {
        Self {
            config,
            runtime,
            resolver: DependencyResolver::new(),
            managed: Arc::new(DashMap::new()),
            current_cancellation: parking_lot::Mutex::new(None),
        }
    }

    /// Start a new cancellable operation, replacing any prior token.
    /// Returns a runtime pre-scoped with the fresh cancellation signal.
    fn begin_operation(&self) -> (CancellationToken, Runtime) {
        let token = CancellationToken::new();
        *self.current_cancellation.lock() = Some(token.clone());
        let runtime = self.runtime.with_cancellation(token.clone());
        (token, runtime)
    }

    /// Clear the current operation's cancellation signal. Scheduler
    /// operations on a given instance run one at a time in practice, so an
    /// unconditional clear is sufficient.
    fn end_operation(&self) {
        *self.current_cancellation.lock() = None;
    }

    /// Request cooperative cancellation of whatever load/unload operation is
    /// currently running. A plugin step that ignores the signal still runs
    /// to its per-step deadline; this only shortens steps that check
    /// `Runtime::is_cancelled`.
    pub fn cancel_current_operation(&self) {
        if let Some(token) = self.current_cancellation.lock().as_ref() {
            token.cancel();
        }
    }

    /// Register `plugins` as the working set for this scheduler, in
    /// `Registered` status. Does not run any lifecycle step.
    pub fn prepare(&self, plugins: Vec<Box<dyn Plugin>>) -> Result<(), SchedulerError> {
        if plugins.is_empty() {
            return Err(SchedulerError::NoPluginsPrepared);
        }
        for plugin in plugins {
            let identity = PluginIdentity::new(plugin.name(), plugin.version())
                .with_id(plugin.id())
                .with_description(plugin.description())
                .with_weight(plugin.weight())
                .with_dependencies(plugin.dependencies());
            let name = identity.name.clone();
            self.managed.insert(
                name.clone(),
                Managed {
                    plugin: Arc::from(plugin),
                    identity,
                    status: PluginStatus::Registered,
                },
            );
            self.set_status(&name, PluginStatus::Prepared);
        }
        Ok(())
    }

    fn identities(&self) -> Vec<PluginIdentity> {
        self.managed.iter().map(|e| e.identity.clone()).collect()
    }

    fn set_status(&self, name: &str, status: PluginStatus) {
        set_status_in(&self.managed, name, status);
    }

    fn plugin_handle(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.managed.get(name).map(|e| e.plugin.clone())
    }

    async fn emit(&self, event_type: EventType, plugin_name: &str, metadata: HashMap<String, Value>) {
        let mut event = Event::new(event_type, "scheduler").with_plugin(plugin_name);
        for (key, value) in metadata {
            event = event.with_metadata(key, value);
        }
        self.runtime.emit_event(event).await;
    }

    /// Run Initialize-then-Start for one plugin with a timeout on each step
    /// and panic isolation via `tokio::spawn` + `JoinError::is_panic`.
    /// Transitions and emits through the full `Initializing -> Inactive ->
    /// Starting -> Active` sequence (spec.md §4.5's state diagram) rather
    /// than jumping straight from `Initializing` to `Active`.
    async fn initialize_and_start(
        managed: Arc<DashMap<String, Managed>>,
        plugin: Arc<dyn Plugin>,
        runtime: Runtime,
        init_timeout: Duration,
        start_timeout: Duration,
    ) -> Result<(), SchedulerError> {
        let name = plugin.name().to_string();

        run_step(&name, "initialize", init_timeout, {
            let plugin = plugin.clone();
            let runtime = runtime.clone();
            move || async move { plugin.initialize_resources(&runtime).await }
        })
        .await?;

        set_status_in(&managed, &name, PluginStatus::Inactive);
        runtime
            .emit_event(
                Event::new(EventType::PluginInitialized, "scheduler")
                    .with_plugin(name.clone())
                    .with_metadata("step", "initialize"),
            )
            .await;

        set_status_in(&managed, &name, PluginStatus::Starting);
        runtime
            .emit_event(
                Event::new(EventType::PluginStarting, "scheduler")
                    .with_plugin(name.clone())
                    .with_metadata("step", "start"),
            )
            .await;

        run_step(&name, "start", start_timeout, {
            let plugin = plugin.clone();
            let runtime = runtime.clone();
            move || async move { plugin.startup_tasks(&runtime).await }
        })
        .await
    }

    /// Sort the prepared working set into dependency-ordered levels and run
    /// Initialize then Start for each level in turn, plugins within a level
    /// dispatched concurrently. Returns the names of plugins that reached
    /// `Active`; plugins whose required dependency failed are marked
    /// `Failed` without their step functions ever being invoked.
    pub async fn load(&self) -> Result<Vec<String>, SchedulerError> {
        let identities = self.identities();
        let levels = self.resolver.resolve(&identities)?;
        let (cancellation, scoped_runtime) = self.begin_operation();

        let mut failed: HashMap<String, String> = HashMap::new();
        let mut active = Vec::new();

        for level in levels {
            if cancellation.is_cancelled() {
                break;
            }
            let mut handles = Vec::new();
            for identity in level {
                let name = identity.name.clone();

                let blocking_dependency = identity
                    .dependencies
                    .iter()
                    .find(|dep| dep.required && failed.contains_key(&dep.id))
                    .map(|dep| dep.id.clone());

                if let Some(dependency) = blocking_dependency {
                    self.set_status(&name, PluginStatus::Failed);
                    failed.insert(name.clone(), format!("dependency '{dependency}' failed"));
                    let mut metadata = step_and_cause("dependency", "required_dependency_failed");
                    metadata.insert("dependency".to_string(), Value::String(dependency));
                    self.emit(EventType::PluginFailed, &name, metadata).await;
                    continue;
                }

                let Some(plugin) = self.plugin_handle(&name) else {
                    continue;
                };
                let plugin_runtime = scoped_runtime.with_plugin_context(name.clone());
                self.set_status(&name, PluginStatus::Initializing);
                self.emit(EventType::PluginInitializing, &name, step_meta("initialize")).await;

                let init_timeout = self.config.init_timeout;
                let start_timeout = self.config.start_timeout;
                let managed = self.managed.clone();
                handles.push((
                    name.clone(),
                    tokio::spawn(Self::initialize_and_start(managed, plugin, plugin_runtime, init_timeout, start_timeout)),
                ));
            }

            for (name, handle) in handles {
                match handle.await {
                    Ok(Ok(())) => {
                        self.set_status(&name, PluginStatus::Active);
                        self.emit(EventType::PluginStarted, &name, step_and_cause("start", "completed")).await;
                        active.push(name);
                    }
                    Ok(Err(err)) => {
                        self.set_status(&name, PluginStatus::Failed);
                        let metadata = failure_metadata(&err);
                        failed.insert(name.clone(), err.to_string());
                        self.emit(EventType::PluginFailed, &name, metadata).await;
                    }
                    Err(join_err) => {
                        self.set_status(&name, PluginStatus::Failed);
                        failed.insert(name.clone(), join_err.to_string());
                        let metadata = step_and_cause("unknown", "scheduler_task_failed");
                        self.emit(EventType::PluginFailed, &name, metadata).await;
                    }
                }
            }
        }

        self.end_operation();
        if failed.is_empty() {
            Ok(active)
        } else {
            Err(SchedulerError::Composite(
                failed.len(),
                failed
                    .iter()
                    .map(|(name, reason)| format!("{name}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ))
        }
    }

    /// Load only the named subset (and their required dependencies, which
    /// must already be present in the prepared working set). Use
    /// [`Self::load_plugins_by_name`] instead when the subset's required
    /// dependencies may not yet be prepared.
    pub async fn load_by_name(&self, names: &[String]) -> Result<Vec<String>, SchedulerError> {
        let identities: Vec<PluginIdentity> = self
            .identities()
            .into_iter()
            .filter(|identity| names.contains(&identity.name))
            .collect();
        if identities.is_empty() {
            return Err(SchedulerError::NoPluginsPrepared);
        }

        let levels = self.resolver.resolve(&identities)?;
        let (cancellation, scoped_runtime) = self.begin_operation();
        let mut active = Vec::new();
        let mut failed: HashMap<String, String> = HashMap::new();

        for level in levels {
            if cancellation.is_cancelled() {
                break;
            }
            let mut handles = Vec::new();
            for identity in level {
                let name = identity.name.clone();
                let Some(plugin) = self.plugin_handle(&name) else {
                    continue;
                };
                let plugin_runtime = scoped_runtime.with_plugin_context(name.clone());
                self.set_status(&name, PluginStatus::Initializing);
                self.emit(EventType::PluginInitializing, &name, step_meta("initialize")).await;
                let init_timeout = self.config.init_timeout;
                let start_timeout = self.config.start_timeout;
                let managed = self.managed.clone();
                handles.push((
                    name,
                    tokio::spawn(Self::initialize_and_start(managed, plugin, plugin_runtime, init_timeout, start_timeout)),
                ));
            }
            for (name, handle) in handles {
                match handle.await {
                    Ok(Ok(())) => {
                        self.set_status(&name, PluginStatus::Active);
                        self.emit(EventType::PluginStarted, &name, step_and_cause("start", "completed")).await;
                        active.push(name);
                    }
                    Ok(Err(err)) => {
                        self.set_status(&name, PluginStatus::Failed);
                        let metadata = failure_metadata(&err);
                        failed.insert(name.clone(), err.to_string());
                        self.emit(EventType::PluginFailed, &name, metadata).await;
                    }
                    Err(join_err) => {
                        self.set_status(&name, PluginStatus::Failed);
                        failed.insert(name.clone(), join_err.to_string());
                        let metadata = step_and_cause("unknown", "scheduler_task_failed");
                        self.emit(EventType::PluginFailed, &name, metadata).await;
                    }
                }
            }
        }

        self.end_operation();
        if failed.is_empty() {
            Ok(active)
        } else {
            Err(SchedulerError::Composite(
                failed.len(),
                failed
                    .iter()
                    .map(|(name, reason)| format!("{name}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ))
        }
    }

    /// `LoadPluginsByName` (spec.md §4.5): prepare the named plugins plus,
    /// transitively, every required dependency reachable from them that
    /// isn't already prepared, instantiating each via `registry`, then run
    /// the standard load pipeline over exactly that name set.
    pub async fn load_plugins_by_name(
        &self,
        registry: &crate::registry::PluginRegistry,
        names: &[String],
    ) -> Result<Vec<String>, SchedulerError> {
        let mut working_set: Vec<String> = names.to_vec();
        let mut queue: std::collections::VecDeque<(String, Option<String>)> =
            names.iter().map(|n| (n.clone(), None)).collect();
        let mut discovered: HashMap<String, Box<dyn Plugin>> = HashMap::new();

        while let Some((name, referrer)) = queue.pop_front() {
            if self.managed.contains_key(&name) || discovered.contains_key(&name) {
                continue;
            }
            let plugin = registry.create(&name).map_err(|_| {
                SchedulerError::Resolver(crate::error::ResolverError::MissingRequired {
                    dependent: referrer.clone().unwrap_or_else(|| name.clone()),
                    dependency: name.clone(),
                })
            })?;
            for dep in plugin.dependencies() {
                if dep.required {
                    queue.push_back((dep.id.clone(), Some(name.clone())));
                    if !working_set.contains(&dep.id) {
                        working_set.push(dep.id.clone());
                    }
                }
            }
            discovered.insert(name, plugin);
        }

        if !discovered.is_empty() {
            self.prepare(discovered.into_values().collect())?;
        }

        self.load_by_name(&working_set).await
    }

    /// Stop a single named plugin (Run -> Stop for just that instance).
    pub async fn stop_plugin(&self, name: &str) -> Result<(), SchedulerError> {
        let (_cancellation, scoped_runtime) = self.begin_operation();
        let result = self.stop_plugin_with(&scoped_runtime, name).await;
        self.end_operation();
        result
    }

    /// `stop_plugin` body, parameterized over an already cancellation-scoped
    /// runtime so `stop_all`/`unload_by_name` can share one cancellation
    /// signal across their whole reverse traversal instead of each
    /// constituent `stop_plugin` call starting a fresh one.
    async fn stop_plugin_with(&self, runtime: &Runtime, name: &str) -> Result<(), SchedulerError> {
        if self
            .managed
            .get(name)
            .map(|e| e.status != PluginStatus::Active)
            .unwrap_or(true)
        {
            return Ok(());
        }

        let Some(plugin) = self.plugin_handle(name) else {
            return Ok(());
        };
        self.set_status(name, PluginStatus::Stopping);
        self.emit(EventType::PluginStopping, name, step_meta("stop")).await;

        let scoped_runtime = runtime.with_plugin_context(name.to_string());
        let stop_timeout = self.config.stop_timeout;
        let outcome = run_step(name, "stop", stop_timeout, {
            let plugin = plugin.clone();
            let runtime = scoped_runtime.clone();
            move || async move { plugin.cleanup_tasks(&runtime).await }
        })
        .await;

        let left_lingering = self.runtime.cleanup_resources(name);
        if !left_lingering.is_empty() {
            tracing::debug!(plugin = %name, resources = ?left_lingering, "left lingering shared resources in place");
        }
        self.set_status(name, PluginStatus::Terminated);
        let stopped_metadata = match &outcome {
            Ok(()) => step_and_cause("stop", "completed"),
            Err(err) => failure_metadata(err),
        };
        self.emit(EventType::PluginStopped, name, stopped_metadata).await;
        outcome
    }

    /// Stop every `Active` plugin in reverse dependency order (dependents
    /// before dependencies) and release its resources. Best-effort: a
    /// failing `Stop` is logged and does not abort the rest of the
    /// traversal (spec.md §4.5 Failure semantics).
    pub async fn stop_all(&self) -> Result<(), SchedulerError> {
        let identities = self.identities();
        let mut levels = self.resolver.resolve(&identities)?;
        levels.reverse();

        let (_cancellation, scoped_runtime) = self.begin_operation();
        let mut failures = Vec::new();
        for level in levels {
            for identity in level {
                if let Err(err) = self.stop_plugin_with(&scoped_runtime, &identity.name).await {
                    tracing::error!(plugin = %identity.name, error = %err, "plugin stop failed during shutdown");
                    failures.push(format!("{}: {err}", identity.name));
                }
            }
        }
        self.end_operation();

        self.emit_shutdown().await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SchedulerError::Composite(failures.len(), failures.join("; ")))
        }
    }

    async fn emit_shutdown(&self) {
        self.runtime
            .emit_event(Event::new(EventType::SystemPluginManagerShutdown, "scheduler"))
            .await;
    }

    /// Stop and unload a subset of plugins by name. If any remaining
    /// (non-unloaded) plugin declares a required dependency on a name in
    /// `names`, the configured `SubsetUnloadPolicy` decides whether this is
    /// a warning (proceed anyway) or a hard failure.
    pub async fn unload_by_name(&self, names: &[String]) -> Result<(), SchedulerError> {
        let remaining: Vec<PluginIdentity> = self
            .managed
            .iter()
            .filter(|e| !names.contains(&e.identity.name))
            .map(|e| e.identity.clone())
            .collect();

        let mut stranded = Vec::new();
        for identity in &remaining {
            for dep in &identity.dependencies {
                if dep.required && names.contains(&dep.id) {
                    stranded.push((identity.name.clone(), dep.id.clone()));
                }
            }
        }

        if !stranded.is_empty() {
            let message = stranded
                .iter()
                .map(|(dependent, dependency)| format!("{dependent} depends on {dependency}"))
                .collect::<Vec<_>>()
                .join("; ");
            match self.config.subset_unload_policy {
                SubsetUnloadPolicy::Fail => {
                    return Err(SchedulerError::Composite(stranded.len(), message));
                }
                SubsetUnloadPolicy::Warn => {
                    tracing::warn!(stranded = %message, "unloading plugins with dependents still active");
                    self.runtime
                        .emit_event(
                            Event::new(EventType::ErrorOccurred, "scheduler")
                                .with_priority(crate::event::EventPriority::High)
                                .with_category("warning")
                                .with_metadata("stranded_dependents", message.clone()),
                        )
                        .await;
                }
            }
        }

        // Dependencies pointing outside the subset are left active by this
        // call, so they're downgraded to optional purely for ordering
        // purposes here — only relative order *within* the subset matters.
        let subset: Vec<PluginIdentity> = self
            .managed
            .iter()
            .filter(|e| names.contains(&e.identity.name))
            .map(|e| {
                let mut identity = e.identity.clone();
                for dep in &mut identity.dependencies {
                    if !names.contains(&dep.id) {
                        dep.required = false;
                    }
                }
                identity
            })
            .collect();
        let mut subset_levels = self.resolver.resolve(&subset)?;
        subset_levels.reverse();

        let (_cancellation, scoped_runtime) = self.begin_operation();
        let mut first_err = None;
        for level in subset_levels {
            for identity in level {
                if let Err(err) = self.stop_plugin_with(&scoped_runtime, &identity.name).await {
                    first_err.get_or_insert(err);
                }
                self.managed.remove(&identity.name);
            }
        }
        self.end_operation();
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn status_of(&self, name: &str) -> Option<PluginStatus> {
        self.managed.get(name).map(|e| e.status)
    }

    pub fn active_plugin_names(&self) -> Vec<String> {
        self.managed
            .iter()
            .filter(|e| e.status == PluginStatus::Active)
            .map(|e| e.identity.name.clone())
            .collect()
    }
}

/// Move `name` to `status` if the transition is legal per
/// `PluginStatus::can_transition_to`, logging and ignoring it otherwise
/// rather than silently corrupting the recorded state machine.
fn set_status_in(managed: &DashMap<String, Managed>, name: &str, status: PluginStatus) {
    if let Some(mut entry) = managed.get_mut(name) {
        if entry.status.can_transition_to(status) {
            entry.status = status;
        } else {
            tracing::warn!(
                plugin = name,
                from = ?entry.status,
                to = ?status,
                "ignoring illegal plugin status transition"
            );
        }
    }
}

/// Run a single plugin step function with a timeout and panic isolation.
/// The step runs inside its own `tokio::spawn` so a panicking plugin
/// surfaces as a `JoinError` instead of unwinding through the scheduler.
async fn run_step<F, Fut>(
    plugin_name: &str,
    step: &str,
    timeout: Duration,
    body: F,
) -> Result<(), SchedulerError>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), crate::plugin::PluginError>> + Send + 'static,
{
    let join = tokio::spawn(async move { body().await });

    match tokio::time::timeout(timeout, join).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(plugin_err))) => {
            tracing::warn!(plugin = plugin_name, step, error = %plugin_err, "plugin step failed");
            Err(SchedulerError::StepFailed {
                plugin: plugin_name.to_string(),
                step: step.to_string(),
                message: plugin_err.to_string(),
            })
        }
        Ok(Err(join_err)) if join_err.is_panic() => {
            let panic = join_err.into_panic();
            let stack = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "plugin step panicked with a non-string payload".to_string());
            tracing::error!(plugin = plugin_name, step, panic = %stack, "plugin step panicked");
            Err(SchedulerError::StepPanic {
                plugin: plugin_name.to_string(),
                step: step.to_string(),
                stack,
            })
        }
        Ok(Err(join_err)) => {
            tracing::error!(plugin = plugin_name, step, error = %join_err, "plugin step task failed");
            Err(SchedulerError::StepFailed {
                plugin: plugin_name.to_string(),
                step: step.to_string(),
                message: join_err.to_string(),
            })
        }
        Err(_) => Err(SchedulerError::StepTimeout {
            plugin: plugin_name.to_string(),
            step: step.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as SyncMutex;

    struct Obedient {
        name: &'static str,
        deps: Vec<crate::identity::Dependency>,
        started: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Plugin for Obedient {
        fn name(&self) -> &str {
            self.name
        }
        fn version(&self) -> &str {
            "0.0.0"
        }
        fn dependencies(&self) -> Vec<crate::identity::Dependency> {
            self.deps.clone()
        }
        async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        async fn startup_tasks(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            self.started.store(true, Ordering::SeqCst);
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

    struct Faulty;

    #[async_trait]
    impl Plugin for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }
        fn version(&self) -> &str {
            "0.0.0"
        }
        async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Err(crate::plugin::PluginError::new("boom"))
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

    fn scheduler() -> LifecycleScheduler {
        let runtime = Runtime::new(EventBus::default());
        LifecycleScheduler::new(runtime, SchedulerConfig::default())
    }

    #[tokio::test]
    async fn load_starts_independent_plugins() {
        let sched = scheduler();
        let started = Arc::new(AtomicBool::new(false));
        sched
            .prepare(vec![Box::new(Obedient {
                name: "a",
                deps: vec![],
                started: started.clone(),
            })])
            .unwrap();

        let active = sched.load().await.unwrap();
        assert_eq!(active, vec!["a".to_string()]);
        assert!(started.load(Ordering::SeqCst));
        assert_eq!(sched.status_of("a"), Some(PluginStatus::Active));
    }

    #[tokio::test]
    async fn dependent_failure_cascades_without_running_step() {
        let sched = scheduler();
        let started = Arc::new(AtomicBool::new(false));
        sched
            .prepare(vec![
                Box::new(Faulty),
                Box::new(Obedient {
                    name: "dependent",
                    deps: vec![crate::identity::Dependency::required("faulty")],
                    started: started.clone(),
                }),
            ])
            .unwrap();

        let err = sched.load().await.unwrap_err();
        assert!(matches!(err, SchedulerError::Composite(2, _)));
        assert!(!started.load(Ordering::SeqCst));
        assert_eq!(sched.status_of("dependent"), Some(PluginStatus::Failed));
    }

    #[tokio::test]
    async fn stop_all_transitions_active_plugins_to_terminated() {
        let sched = scheduler();
        sched
            .prepare(vec![Box::new(Obedient {
                name: "a",
                deps: vec![],
                started: Arc::new(AtomicBool::new(false)),
            })])
            .unwrap();
        sched.load().await.unwrap();
        sched.stop_all().await.unwrap();
        assert_eq!(sched.status_of("a"), Some(PluginStatus::Terminated));
    }

    #[tokio::test]
    async fn unload_by_name_warns_but_proceeds_by_default() {
        let sched = scheduler();
        sched
            .prepare(vec![
                Box::new(Obedient {
                    name: "base",
                    deps: vec![],
                    started: Arc::new(AtomicBool::new(false)),
                }),
                Box::new(Obedient {
                    name: "dependent",
                    deps: vec![crate::identity::Dependency::required("base")],
                    started: Arc::new(AtomicBool::new(false)),
                }),
            ])
            .unwrap();
        sched.load().await.unwrap();
        sched.unload_by_name(&["base".to_string()]).await.unwrap();
        assert_eq!(sched.status_of("base"), Some(PluginStatus::Terminated));
    }

    #[tokio::test]
    async fn faulty_plugins_ordinary_error_is_not_mislabeled_as_a_panic() {
        let bus = EventBus::default();
        let runtime = Runtime::new(bus.clone());
        let sched = LifecycleScheduler::new(runtime, SchedulerConfig::default());
        sched.prepare(vec![Box::new(Faulty)]).unwrap();
        let err = sched.load().await.unwrap_err();
        assert!(matches!(err, SchedulerError::Composite(1, ref msg) if msg.contains("boom")));

        let failed = bus
            .history(&crate::event::EventFilter {
                types: Some(vec![EventType::PluginFailed]),
                ..Default::default()
            })
            .await;
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].metadata.get("cause"),
            Some(&Value::String("error".to_string()))
        );
    }

    #[tokio::test]
    async fn unload_by_name_preserves_dependency_order_within_subset() {
        let sched = scheduler();
        let stop_order = Arc::new(SyncMutex::new(Vec::new()));
        sched
            .prepare(vec![
                Box::new(OrderRecording {
                    name: "base",
                    deps: vec![],
                    order: stop_order.clone(),
                }),
                Box::new(OrderRecording {
                    name: "dependent",
                    deps: vec![crate::identity::Dependency::required("base")],
                    order: stop_order.clone(),
                }),
            ])
            .unwrap();
        sched.load().await.unwrap();

        sched
            .unload_by_name(&["base".to_string(), "dependent".to_string()])
            .await
            .unwrap();

        assert_eq!(
            stop_order.lock().unwrap().clone(),
            vec!["dependent".to_string(), "base".to_string()]
        );
    }

    struct OrderRecording {
        name: &'static str,
        deps: Vec<crate::identity::Dependency>,
        order: Arc<SyncMutex<Vec<String>>>,
    }

    #[async_trait]
    impl Plugin for OrderRecording {
        fn name(&self) -> &str {
            self.name
        }
        fn version(&self) -> &str {
            "0.0.0"
        }
        fn dependencies(&self) -> Vec<crate::identity::Dependency> {
            self.deps.clone()
        }
        async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        async fn startup_tasks(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            Ok(())
        }
        async fn cleanup_tasks(&self, _runtime: &Runtime) -> Result<(), crate::plugin::PluginError> {
            self.order.lock().unwrap().push(self.name.to_string());
            Ok(())
        }
        fn status(&self) -> PluginStatus {
            PluginStatus::Unknown
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }
}
