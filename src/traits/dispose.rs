//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g., flushing caches,
/// closing connections). Hooks registered through
/// [`Resolver::register_disposer`](crate::Resolver::register_disposer) run in LIFO order
/// when the owning container or application context tears down.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Dispose, Resolver};
/// use std::sync::Arc;
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         println!("Flushing cache: {}", self.name);
///         // Perform cleanup...
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Cache>()
///     .to_provider(|ctx| {
///         let cache = Arc::new(Cache { name: "user_cache".to_string() });
///         ctx.register_disposer(cache.clone());
///         Ok(cache)
///     })
///     .register()
///     .unwrap();
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
