//! # Event Bus Module
//!
//! In-process pub/sub delivering lifecycle events to subscribers. Grounded
//! directly on `ultrafast_gateway::dashboard::websocket::WebSocketManager`:
//! a broadcast-style fan-out, a per-subscriber bounded queue, a fixed-size
//! worker pool, and a background task per live subscription, the same shape
//! as the dashboard's per-connection WebSocket tasks.
//!
//! ## Delivery model
//!
//! `publish` is synchronous as observed by the publisher: the event is
//! appended to history and handed to every matching subscription's queue
//! before `publish` returns. Each subscription then drains its queue on a
//! dedicated background task, bounded by a shared semaphore that caps how
//! many handler invocations run concurrently across the whole bus (the
//! "worker pool"). A handler that doesn't return within the configured
//! per-handler timeout is abandoned; a handler that panics is caught via
//! `tokio::spawn`'s `JoinError` and turned into an `error.occurred` event
//! instead of taking down the bus.
//!
//! ## Backpressure
//!
//! Each subscription's queue is a fixed-capacity, drop-oldest ring: when
//! full, the oldest still-queued event for that subscription is discarded
//! and a local "dropped" counter is incremented. The publisher is never
//! blocked by a slow subscriber.

use crate::event::{Event, EventFilter, EventPriority, EventType};
use parking_lot::Mutex as SyncMutex;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{Notify, RwLock, Semaphore};
use uuid::Uuid;

/// Opaque handle returned by `subscribe`/`subscribe_plugin`, used to
/// `unsubscribe` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(Uuid);

impl std::fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type EventHandler = Arc<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

/// A bounded, drop-oldest queue of pending events for one subscription.
struct DropOldestQueue {
    capacity: usize,
    items: SyncMutex<VecDeque<Event>>,
    notify: Notify,
    dropped: AtomicU64,
}

impl DropOldestQueue {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: SyncMutex::new(VecDeque::new()),
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
        }
    }

    fn push(&self, event: Event) {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            items.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        items.push_back(event);
        drop(items);
        self.notify.notify_one();
    }

    async fn pop(&self) -> Event {
        loop {
            if let Some(event) = self.items.lock().pop_front() {
                return event;
            }
            self.notify.notified().await;
        }
    }

    fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

struct Subscription {
    token: SubscriptionToken,
    plugin_id: Option<String>,
    filter: EventFilter,
    queue: Arc<DropOldestQueue>,
}

/// Bus-wide tuning. Mirrors `PluginCoreConfig`'s bus-related fields.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    pub history_capacity: usize,
    pub queue_capacity: usize,
    pub worker_count: usize,
    pub handler_timeout: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            history_capacity: 1024,
            queue_capacity: 256,
            worker_count: (2 * num_cpus::get()).max(4),
            handler_timeout: Duration::from_secs(30),
        }
    }
}

/// In-process event bus. Cheaply cloneable (`Arc` internals), safe to share
/// across every plugin's narrowed runtime view.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

struct Inner {
    config: EventBusConfig,
    history: RwLock<VecDeque<Event>>,
    subscriptions: RwLock<Vec<Subscription>>,
    worker_permits: Arc<Semaphore>,
    handler_panics: AtomicU64,
}

impl EventBus {
    pub fn new(config: EventBusConfig) -> Self {
        let worker_permits = Arc::new(Semaphore::new(config.worker_count.max(1)));
        Self {
            inner: Arc::new(Inner {
                history: RwLock::new(VecDeque::with_capacity(config.history_capacity)),
                subscriptions: RwLock::new(Vec::new()),
                worker_permits,
                handler_panics: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// Publish an event. Commits to history and enqueues for every matching
    /// subscription before returning (spec invariant 5: atomicity per
    /// event).
    pub async fn publish(&self, event: Event) {
        {
            let mut history = self.inner.history.write().await;
            if history.len() >= self.inner.config.history_capacity {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        let subscriptions = self.inner.subscriptions.read().await;
        for sub in subscriptions.iter() {
            if let Some(plugin_id) = &sub.plugin_id {
                if event.plugin_id.as_deref() != Some(plugin_id.as_str()) {
                    continue;
                }
            }
            if sub.filter.matches(&event) {
                sub.queue.push(event.clone());
            }
        }
    }

    pub async fn subscribe(&self, filter: EventFilter, handler: EventHandler) -> SubscriptionToken {
        self.subscribe_internal(None, filter, handler).await
    }

    pub async fn subscribe_plugin(
        &self,
        plugin_id: impl Into<String>,
        filter: EventFilter,
        handler: EventHandler,
    ) -> SubscriptionToken {
        self.subscribe_internal(Some(plugin_id.into()), filter, handler)
            .await
    }

    async fn subscribe_internal(
        &self,
        plugin_id: Option<String>,
        filter: EventFilter,
        handler: EventHandler,
    ) -> SubscriptionToken {
        let token = SubscriptionToken(Uuid::new_v4());
        let queue = Arc::new(DropOldestQueue::new(self.inner.config.queue_capacity));

        {
            let mut subscriptions = self.inner.subscriptions.write().await;
            subscriptions.push(Subscription {
                token,
                plugin_id: plugin_id.clone(),
                filter,
                queue: queue.clone(),
            });
        }

        let permits = self.inner.worker_permits.clone();
        let timeout = self.inner.config.handler_timeout;
        let bus = self.clone();
        let panicking_plugin_id = plugin_id;
        tokio::spawn(async move {
            loop {
                let event = queue.pop().await;
                let _permit = permits.acquire().await;
                let handler = handler.clone();
                let join = tokio::spawn({
                    let event = event.clone();
                    async move { handler(event).await }
                });
                match tokio::time::timeout(timeout, join).await {
                    Ok(Ok(())) => {}
                    Ok(Err(join_err)) if join_err.is_panic() => {
                        bus.inner.handler_panics.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(
                            subscription = %token,
                            "event bus handler panicked"
                        );
                        let mut error_event = Event::new(EventType::ErrorOccurred, "event_bus")
                            .with_priority(EventPriority::High)
                            .with_category("error")
                            .with_metadata("subscription", token.to_string())
                            .with_error(format!("handler for subscription {token} panicked on event {:?}", event.event_type));
                        if let Some(plugin_id) = &panicking_plugin_id {
                            error_event = error_event.with_plugin(plugin_id.clone());
                        }
                        bus.publish(error_event).await;
                    }
                    Ok(Err(join_err)) => {
                        tracing::warn!(subscription = %token, error = %join_err, "event bus handler task failed");
                    }
                    Err(_) => {
                        tracing::warn!(
                            subscription = %token,
                            timeout_secs = timeout.as_secs(),
                            "event bus handler timed out"
                        );
                    }
                }
            }
        });

        token
    }

    pub async fn unsubscribe(&self, token: SubscriptionToken) {
        let mut subscriptions = self.inner.subscriptions.write().await;
        subscriptions.retain(|s| s.token != token);
    }

    pub async fn history(&self, filter: &EventFilter) -> Vec<Event> {
        let history = self.inner.history.read().await;
        history.iter().filter(|e| filter.matches(e)).cloned().collect()
    }

    pub async fn history_for_plugin(&self, plugin_id: &str, filter: &EventFilter) -> Vec<Event> {
        let history = self.inner.history.read().await;
        history
            .iter()
            .filter(|e| e.plugin_id.as_deref() == Some(plugin_id) && filter.matches(e))
            .cloned()
            .collect()
    }

    /// Number of events dropped so far across all subscriptions, for
    /// metrics wiring. Exposed rather than kept private so the gateway's
    /// `MetricsCollector` can poll it the same way it polls cache hit
    /// rates.
    pub async fn total_dropped(&self) -> u64 {
        let subscriptions = self.inner.subscriptions.read().await;
        subscriptions.iter().map(|s| s.queue.dropped_count()).sum()
    }

    /// Count of handler invocations that panicked across every subscription
    /// on this bus, for the same metrics wiring `total_dropped` serves.
    pub fn total_handler_panics(&self) -> u64 {
        self.inner.handler_panics.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}

/// Process-wide fallback bus accessor, following the `OnceLock`-based
/// singleton pattern used for `RATE_LIMITER`/`AUTH_SERVICE` in
/// `ultrafast_gateway::auth`.
static GLOBAL_BUS: OnceLock<EventBus> = OnceLock::new();

/// Install the process-wide event bus. Call once during startup; later
/// calls are ignored (first writer wins, matching spec.md §9's "initialized
/// exactly once").
pub fn install_global_bus(bus: EventBus) {
    let _ = GLOBAL_BUS.set(bus);
}

/// Publish to the global bus if one is installed. If none is installed,
/// logs a structured warning and succeeds — this keeps plugin-local test
/// harnesses from crashing while making the absence observable (spec.md
/// §4.2 Fallback, scenario S5).
pub async fn publish_to_global_bus(event: Event) {
    match GLOBAL_BUS.get() {
        Some(bus) => bus.publish(event).await,
        None => {
            tracing::warn!(
                plugin_event_bus_fallback = true,
                event_type = ?event.event_type,
                plugin_id = ?event.plugin_id,
                "no event bus installed; event dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::Duration as TokioDuration;

    fn counting_handler(counter: Arc<AtomicUsize>) -> EventHandler {
        Arc::new(move |_event| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test]
    async fn publish_is_visible_in_history_immediately() {
        let bus = EventBus::default();
        bus.publish(Event::new(EventType::PluginStarted, "scheduler"))
            .await;
        let history = bus.history(&EventFilter::default()).await;
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn subscriber_receives_matching_events() {
        let bus = EventBus::default();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe(EventFilter::default(), counting_handler(counter.clone()))
            .await;

        bus.publish(Event::new(EventType::PluginStarted, "scheduler"))
            .await;

        tokio::time::sleep(TokioDuration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn plugin_scoped_subscription_ignores_other_plugins() {
        let bus = EventBus::default();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe_plugin("cache", EventFilter::default(), counting_handler(counter.clone()))
            .await;

        bus.publish(Event::new(EventType::PluginStarted, "scheduler").with_plugin("other"))
            .await;
        bus.publish(Event::new(EventType::PluginStarted, "scheduler").with_plugin("cache"))
            .await;

        tokio::time::sleep(TokioDuration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unsubscribe_stops_further_delivery() {
        let bus = EventBus::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let token = bus
            .subscribe(EventFilter::default(), counting_handler(counter.clone()))
            .await;
        bus.unsubscribe(token).await;

        bus.publish(Event::new(EventType::PluginStarted, "scheduler"))
            .await;
        tokio::time::sleep(TokioDuration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overflowing_queue_drops_oldest_not_publisher() {
        let config = EventBusConfig {
            queue_capacity: 2,
            ..EventBusConfig::default()
        };
        let bus = EventBus::new(config);
        // A handler that blocks forever so the queue backs up.
        let handler: EventHandler = Arc::new(|_event| {
            Box::pin(async move {
                tokio::time::sleep(TokioDuration::from_secs(3600)).await;
            })
        });
        bus.subscribe(EventFilter::default(), handler).await;

        for _ in 0..5 {
            bus.publish(Event::new(EventType::PluginStarted, "scheduler"))
                .await;
        }
        tokio::time::sleep(TokioDuration::from_millis(20)).await;
        assert!(bus.total_dropped().await >= 1);
    }

    #[tokio::test]
    async fn handler_panic_is_counted_and_surfaced_as_error_event() {
        let bus = EventBus::default();
        let handler: EventHandler = Arc::new(|_event| Box::pin(async move { panic!("boom") }));
        bus.subscribe_plugin("flaky", EventFilter::default(), handler).await;

        bus.publish(Event::new(EventType::PluginStarted, "scheduler").with_plugin("flaky"))
            .await;
        tokio::time::sleep(TokioDuration::from_millis(50)).await;

        assert_eq!(bus.total_handler_panics(), 1);

        let errors = bus
            .history(&EventFilter {
                types: Some(vec![EventType::ErrorOccurred]),
                ..Default::default()
            })
            .await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].plugin_id.as_deref(), Some("flaky"));
        assert!(errors[0].metadata.contains_key("subscription"));
    }

    #[tokio::test]
    async fn fallback_publish_without_global_bus_does_not_panic() {
        // A fresh process-local OnceLock would be needed for true isolation;
        // this just checks the no-bus path doesn't panic when called.
        publish_to_global_bus(Event::new(EventType::PluginStarted, "scheduler")).await;
    }
}
