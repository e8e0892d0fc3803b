//! Lifecycle scope definitions.

/// Lifecycle scopes controlling instance caching behavior
///
/// Defines how resolved instances are created, cached, and shared by the
/// container. Each scope bounds how many live instances may exist per
/// (contract, qualifier) key: one for [`Scope::Singleton`], one per
/// application context for [`Scope::Application`], unbounded for
/// [`Scope::Prototype`].
///
/// The set is open: additional lifecycle kinds may appear in later versions,
/// which is why the enum is `#[non_exhaustive]`.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut builder = ContainerBuilder::new();
///
/// // Singleton: one instance for the container's lifetime
/// builder.bind::<Database>()
///     .scoped(Scope::Singleton)
///     .to_instance(Database { url: "postgres://localhost".to_string() })
///     .register()?;
///
/// // Prototype (the default): a fresh instance every resolution
/// builder.bind::<RequestModel>()
///     .to_provider(|_| Ok(Arc::new(RequestModel { id: 12345 })))
///     .register()?;
///
/// let container = builder.build()?;
///
/// let db1 = container.get::<Database>()?;
/// let db2 = container.get::<Database>()?;
/// assert!(Arc::ptr_eq(&db1, &db2)); // Same instance
///
/// let model1 = container.get::<RequestModel>()?;
/// let model2 = container.get::<RequestModel>()?;
/// assert!(!Arc::ptr_eq(&model1, &model2)); // Always different
/// # Ok::<(), bindery::ContainerError>(())
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance per container, cached for the container's lifetime
    ///
    /// Constructed once on first resolve and shared across every context and
    /// thread afterwards. Torn down with the container.
    Singleton,
    /// One instance per application context, evictable
    ///
    /// Cached under an externally supplied context identifier. Resolving the
    /// same key through the same context returns the same instance; distinct
    /// contexts get distinct instances. [`Container::reset_scope`] evicts one
    /// context without touching singletons or other contexts.
    ///
    /// [`Container::reset_scope`]: crate::Container::reset_scope
    Application,
    /// New instance per resolution, never cached
    ///
    /// The default when no scope is declared. Instances are caller-owned;
    /// the container performs no teardown for them.
    Prototype,
}

impl Scope {
    /// Stable lowercase name, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Application => "application",
            Scope::Prototype => "prototype",
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Prototype
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
