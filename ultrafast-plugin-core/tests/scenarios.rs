//! End-to-end lifecycle scenarios exercising the registry, resolver,
//! scheduler, and event bus together rather than in isolation.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ultrafast_plugin_core::{
    bus::{self, EventBus},
    event::{EventFilter, EventType},
    identity::Dependency,
    plugin::{Plugin, PluginError},
    runtime::Runtime,
    scheduler::{LifecycleScheduler, SchedulerConfig, SubsetUnloadPolicy},
    status::PluginStatus,
};

struct Leaf {
    name: &'static str,
    weight: i32,
    deps: Vec<Dependency>,
}

#[async_trait]
impl Plugin for Leaf {
    fn name(&self) -> &str {
        self.name
    }
    fn version(&self) -> &str {
        "1.0.0"
    }
    fn weight(&self) -> i32 {
        self.weight
    }
    fn dependencies(&self) -> Vec<Dependency> {
        self.deps.clone()
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
        PluginStatus::Unknown
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Sleeper {
    name: &'static str,
    sleep: Duration,
}

#[async_trait]
impl Plugin for Sleeper {
    fn name(&self) -> &str {
        self.name
    }
    fn version(&self) -> &str {
        "1.0.0"
    }
    async fn initialize_resources(&self, _runtime: &Runtime) -> Result<(), PluginError> {
        Ok(())
    }
    async fn startup_tasks(&self, _runtime: &Runtime) -> Result<(), PluginError> {
        tokio::time::sleep(self.sleep).await;
        Ok(())
    }
    async fn cleanup_tasks(&self, _runtime: &Runtime) -> Result<(), PluginError> {
        Ok(())
    }
    fn status(&self) -> PluginStatus {
        PluginStatus::Unknown
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct RequiresMissing;

#[async_trait]
impl Plugin for RequiresMissing {
    fn name(&self) -> &str {
        "X"
    }
    fn version(&self) -> &str {
        "1.0.0"
    }
    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::required("Y")]
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
        PluginStatus::Unknown
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

async fn collect_started_order(bus: &EventBus) -> Vec<String> {
    let filter = EventFilter {
        types: Some(vec![EventType::PluginStarted]),
        ..Default::default()
    };
    bus.history(&filter)
        .await
        .into_iter()
        .filter_map(|event| event.plugin_id)
        .collect()
}

#[tokio::test]
async fn s1_diamond_dependency_starts_in_expected_order() {
    let bus = EventBus::default();
    let runtime = Runtime::new(bus.clone());
    let scheduler = LifecycleScheduler::new(runtime, SchedulerConfig::default());

    scheduler
        .prepare(vec![
            Box::new(Leaf { name: "A", weight: 10, deps: vec![] }),
            Box::new(Leaf {
                name: "B",
                weight: 5,
                deps: vec![Dependency::required("A")],
            }),
            Box::new(Leaf {
                name: "C",
                weight: 5,
                deps: vec![Dependency::required("A")],
            }),
            Box::new(Leaf {
                name: "D",
                weight: 1,
                deps: vec![Dependency::required("B"), Dependency::required("C")],
            }),
        ])
        .unwrap();

    let active = scheduler.load().await.unwrap();
    assert_eq!(active.len(), 4);

    let order = collect_started_order(&bus).await;
    assert_eq!(order[0], "A");
    let mut middle = vec![order[1].clone(), order[2].clone()];
    middle.sort();
    assert_eq!(middle, vec!["B".to_string(), "C".to_string()]);
    assert_eq!(order[3], "D");
}

#[tokio::test]
async fn s2_required_missing_fails_without_initializing() {
    let bus = EventBus::default();
    let runtime = Runtime::new(bus.clone());
    let scheduler = LifecycleScheduler::new(runtime, SchedulerConfig::default());

    scheduler.prepare(vec![Box::new(RequiresMissing)]).unwrap();
    let err = scheduler.load().await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains('X') || format!("{err:?}").contains('X'));

    let initializing = bus
        .history(&EventFilter {
            types: Some(vec![EventType::PluginInitializing]),
            ..Default::default()
        })
        .await;
    assert!(initializing.is_empty());
}

#[tokio::test]
async fn s3_start_timeout_emits_plugin_failed_quickly() {
    let bus = EventBus::default();
    let runtime = Runtime::new(bus.clone());
    let config = SchedulerConfig {
        init_timeout: Duration::from_secs(30),
        start_timeout: Duration::from_millis(100),
        stop_timeout: Duration::from_secs(30),
        subset_unload_policy: SubsetUnloadPolicy::Warn,
    };
    let scheduler = LifecycleScheduler::new(runtime, config);
    scheduler
        .prepare(vec![Box::new(Sleeper {
            name: "Slow",
            sleep: Duration::from_millis(500),
        })])
        .unwrap();

    let start = Instant::now();
    let err = scheduler.load().await.unwrap_err();
    assert!(start.elapsed() < Duration::from_millis(250));
    assert!(err.to_string().contains("Slow"));

    let failed = bus
        .history(&EventFilter {
            types: Some(vec![EventType::PluginFailed]),
            ..Default::default()
        })
        .await;
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].plugin_id.as_deref(), Some("Slow"));
    assert_eq!(
        failed[0].metadata.get("step"),
        Some(&serde_json::Value::String("start".to_string()))
    );
    assert_eq!(
        failed[0].metadata.get("cause"),
        Some(&serde_json::Value::String("timeout".to_string()))
    );
}

#[tokio::test]
async fn s4_subset_unload_warns_and_preserves_remaining_plugins() {
    let bus = EventBus::default();
    let runtime = Runtime::new(bus.clone());
    let scheduler = LifecycleScheduler::new(runtime.clone(), SchedulerConfig::default());

    scheduler
        .prepare(vec![
            Box::new(Leaf { name: "A", weight: 0, deps: vec![] }),
            Box::new(Leaf {
                name: "B",
                weight: 0,
                deps: vec![Dependency::required("A")],
            }),
            Box::new(Leaf {
                name: "C",
                weight: 0,
                deps: vec![Dependency::required("B")],
            }),
        ])
        .unwrap();
    scheduler.load().await.unwrap();

    let scoped = runtime.with_plugin_context("B");
    scoped
        .register_shared_resource("b.exclusive", Arc::new(1u32), Default::default())
        .unwrap();

    scheduler.unload_by_name(&["B".to_string()]).await.unwrap();

    assert_eq!(scheduler.status_of("B"), Some(PluginStatus::Terminated));
    assert_eq!(scheduler.status_of("A"), Some(PluginStatus::Active));
    assert_eq!(scheduler.status_of("C"), Some(PluginStatus::Active));
    assert!(runtime.get_shared_resource("b.exclusive").is_err());
}

#[tokio::test]
async fn s5_publish_without_global_bus_does_not_panic() {
    bus::publish_to_global_bus(ultrafast_plugin_core::event::Event::new(
        EventType::PluginStarted,
        "scenario",
    ))
    .await;
}

#[tokio::test]
async fn s6_plugins_in_same_level_start_concurrently() {
    let bus = EventBus::default();
    let runtime = Runtime::new(bus.clone());
    let scheduler = LifecycleScheduler::new(runtime, SchedulerConfig::default());

    scheduler
        .prepare(vec![
            Box::new(Sleeper { name: "P1", sleep: Duration::from_millis(100) }),
            Box::new(Sleeper { name: "P2", sleep: Duration::from_millis(100) }),
            Box::new(Sleeper { name: "P3", sleep: Duration::from_millis(100) }),
        ])
        .unwrap();

    let start = Instant::now();
    let active = scheduler.load().await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(250));

    let mut names = active;
    names.sort();
    assert_eq!(names, vec!["P1".to_string(), "P2".to_string(), "P3".to_string()]);
}

#[tokio::test]
async fn empty_working_set_fails_with_no_plugins_prepared() {
    let runtime = Runtime::new(EventBus::default());
    let scheduler = LifecycleScheduler::new(runtime, SchedulerConfig::default());
    let err = scheduler.load().await.unwrap_err();
    assert!(matches!(
        err,
        ultrafast_plugin_core::error::SchedulerError::NoPluginsPrepared
    ));
}

#[tokio::test]
async fn linear_chain_loads_in_four_single_plugin_levels() {
    let runtime = Runtime::new(EventBus::default());
    let scheduler = LifecycleScheduler::new(runtime, SchedulerConfig::default());
    scheduler
        .prepare(vec![
            Box::new(Leaf { name: "A", weight: 0, deps: vec![] }),
            Box::new(Leaf { name: "B", weight: 0, deps: vec![Dependency::required("A")] }),
            Box::new(Leaf { name: "C", weight: 0, deps: vec![Dependency::required("B")] }),
            Box::new(Leaf { name: "D", weight: 0, deps: vec![Dependency::required("C")] }),
        ])
        .unwrap();
    let active = scheduler.load().await.unwrap();
    assert_eq!(active, vec!["A", "B", "C", "D"]);
}
