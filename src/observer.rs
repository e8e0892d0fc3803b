//! Diagnostic observers for resolution traceability.
//!
//! This module provides hooks for observing resolution events, enabling
//! structured tracing, performance monitoring, and debugging of wiring
//! problems without coupling the container to any particular logging stack.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ContainerError;
use crate::key::BindingKey;

/// Observer trait for container resolution events.
///
/// This trait enables structured tracing and monitoring of the container's
/// behavior. Observers can track which contracts are being resolved, timing
/// information, and failure conditions.
///
/// # Performance
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight; for expensive work, queue events and process
/// them elsewhere.
///
/// # Examples
///
/// ```
/// use bindery::{BindingKey, ContainerBuilder, ContainerObserver, Resolver};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct TracingObserver {
///     trace_id: String,
/// }
///
/// impl ContainerObserver for TracingObserver {
///     fn resolving(&self, key: &BindingKey) {
///         println!("[{}] Resolving: {}", self.trace_id, key);
///     }
///
///     fn resolved(&self, key: &BindingKey, duration: Duration) {
///         println!("[{}] Resolved: {} in {:?}", self.trace_id, key, duration);
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(Arc::new(TracingObserver { trace_id: "run-123".to_string() }));
/// builder.bind::<u32>().to_instance(7u32).register().unwrap();
///
/// // All subsequent resolutions are traced
/// let container = builder.build().unwrap();
/// let _ = container.get::<u32>().unwrap();
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called when resolution of a binding starts.
    ///
    /// Invoked before the provider runs. Use this to start timing
    /// measurements and emit trace events.
    fn resolving(&self, key: &BindingKey);

    /// Called when a binding resolves successfully.
    ///
    /// `duration` is the time elapsed from `resolving` to `resolved`,
    /// including any transitive dependency construction.
    fn resolved(&self, key: &BindingKey, duration: Duration);

    /// Called when resolution of a binding fails.
    ///
    /// The error still propagates to the caller after this hook runs. The
    /// default implementation ignores the event.
    fn resolution_failed(&self, key: &BindingKey, error: &ContainerError) {
        let _ = (key, error);
    }
}

/// Set of registered observers.
///
/// Holds all registered observers and fans resolution events out to them.
/// Designed to cost nothing when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    /// Absorbs observers registered on a staged builder during module
    /// adoption.
    pub(crate) fn extend(&mut self, other: Observers) {
        self.observers.extend(other.observers);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &BindingKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &BindingKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &BindingKey, error: &ContainerError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }
}

/// Built-in observer that logs events to stdout.
///
/// A simple implementation useful for development and debugging. For
/// production use, implement a custom observer that feeds your own
/// logging or tracing infrastructure.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(Arc::new(LoggingObserver::new()));
///
/// // All resolutions will be logged to stdout
/// let container = builder.build().unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with the default prefix.
    pub fn new() -> Self {
        Self { prefix: "[bindery]".to_string() }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn resolving(&self, key: &BindingKey) {
        println!("{} Resolving: {}", self.prefix, key);
    }

    fn resolved(&self, key: &BindingKey, duration: Duration) {
        println!("{} Resolved: {} in {:?}", self.prefix, key, duration);
    }

    fn resolution_failed(&self, key: &BindingKey, error: &ContainerError) {
        eprintln!("{} FAILED {}: {}", self.prefix, key, error);
    }
}

/// Performance-focused observer that aggregates resolution metrics.
///
/// Collects timing data, resolution counts, and failure counts for
/// post-run analysis.
pub struct MetricsObserver {
    resolution_count: std::sync::atomic::AtomicU64,
    total_resolution_time: std::sync::atomic::AtomicU64,
    failure_count: std::sync::atomic::AtomicU64,
}

impl MetricsObserver {
    /// Creates a new metrics observer with all counters at zero.
    pub fn new() -> Self {
        Self {
            resolution_count: std::sync::atomic::AtomicU64::new(0),
            total_resolution_time: std::sync::atomic::AtomicU64::new(0),
            failure_count: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Total number of successful resolutions observed.
    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Average resolution time, or `None` before the first resolution.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        let total_ns = self.total_resolution_time.load(std::sync::atomic::Ordering::Relaxed);
        Some(Duration::from_nanos(total_ns / count))
    }

    /// Total time spent resolving.
    pub fn total_resolution_time(&self) -> Duration {
        let total_ns = self.total_resolution_time.load(std::sync::atomic::Ordering::Relaxed);
        Duration::from_nanos(total_ns)
    }

    /// Number of failed resolutions observed.
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.resolution_count.store(0, std::sync::atomic::Ordering::Relaxed);
        self.total_resolution_time.store(0, std::sync::atomic::Ordering::Relaxed);
        self.failure_count.store(0, std::sync::atomic::Ordering::Relaxed);
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for MetricsObserver {
    fn resolving(&self, _key: &BindingKey) {}

    fn resolved(&self, _key: &BindingKey, duration: Duration) {
        self.resolution_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.total_resolution_time
            .fetch_add(duration.as_nanos() as u64, std::sync::atomic::Ordering::Relaxed);
    }

    fn resolution_failed(&self, _key: &BindingKey, _error: &ContainerError) {
        self.failure_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}
