//! Container construction and contract resolution.
//!
//! This module contains the [`Container`] produced by a frozen builder, the
//! per-context [`AppContext`] handle, and the [`ResolverContext`] passed to
//! providers during construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::binding::{AnyArc, Binding, BindingRegistry};
use crate::descriptors::BindingDescriptor;
use crate::error::{ContainerError, ContainerResult};
use crate::internal::{ChainGuard, DisposeBag};
use crate::key::BindingKey;
use crate::observer::Observers;
use crate::scope::Scope;
use crate::traits::{Resolver, ResolverCore};

mod context;
mod scopes;

pub use context::ResolverContext;
pub use scopes::{AppContext, ContextId};
pub(crate) use scopes::ScopeManager;

/// Runs a provider and normalizes its error.
///
/// Resolution errors surfacing from nested `ctx.get` calls pass through
/// untouched so the original caller sees the real failure (circular path,
/// unbound dependency). Anything else becomes a construction error carrying
/// the provider's error as its source.
pub(crate) fn run_provider(
    binding: &Binding,
    key: &BindingKey,
    ctx: &ResolverContext<'_>,
) -> ContainerResult<AnyArc> {
    (binding.provider)(ctx).map_err(|err| match err.downcast::<ContainerError>() {
        Ok(resolution) => *resolution,
        Err(foreign) => ContainerError::Construction {
            key: key.rendered(),
            source: Arc::from(foreign),
        },
    })
}

/// Wraps one resolution in observer notifications.
///
/// Kept out of the hot path entirely when no observers are registered.
pub(crate) fn observe<F>(observers: &Observers, key: &BindingKey, resolve: F) -> ContainerResult<AnyArc>
where
    F: FnOnce() -> ContainerResult<AnyArc>,
{
    if !observers.has_observers() {
        return resolve();
    }
    let start = Instant::now();
    observers.resolving(key);
    let result = resolve();
    match &result {
        Ok(_) => observers.resolved(key, start.elapsed()),
        Err(error) => observers.resolution_failed(key, error),
    }
    result
}

/// Resolution root built from a frozen registry.
///
/// The `Container` resolves contracts according to their declared scope:
/// singletons are cached for the container's lifetime, application-scoped
/// contracts are cached per [`AppContext`], and prototypes are built fresh
/// on every request.
///
/// # Thread safety
///
/// The container is fully thread-safe and cheap to clone (it shares its
/// internals through an `Arc`). Singleton construction is synchronized so
/// racing resolvers observe at most one successful construction; after
/// initialization, singleton reads take no locks.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Database>()
///     .scoped(Scope::Singleton)
///     .to_provider(|_| Ok(Arc::new(Database { url: "postgres://localhost".to_string() })))
///     .register()?;
/// builder.bind::<UserService>()
///     .to_provider(|ctx| Ok(Arc::new(UserService { db: ctx.get::<Database>()? })))
///     .register()?;
///
/// let container = builder.build()?;
/// let service = container.get::<UserService>()?;
/// assert_eq!(service.db.url, "postgres://localhost");
/// # Ok::<(), bindery::ContainerError>(())
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) registry: BindingRegistry,
    pub(crate) scopes: ScopeManager,
    pub(crate) root_disposers: Mutex<DisposeBag>,
    pub(crate) observers: Observers,
    pub(crate) torn_down: AtomicBool,
}

impl Container {
    pub(crate) fn from_parts(registry: BindingRegistry, observers: Observers) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                scopes: ScopeManager::new(),
                root_disposers: Mutex::new(DisposeBag::default()),
                observers,
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ContainerInner {
        &self.inner
    }

    /// Opens a resolution handle for one application context.
    ///
    /// Contexts are created lazily on first attach; calling `context` twice
    /// with the same id yields handles sharing the same cached instances.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Resolver, Scope};
    /// use std::sync::Arc;
    ///
    /// struct RequestLog;
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<RequestLog>()
    ///     .scoped(Scope::Application)
    ///     .to_provider(|_| Ok(Arc::new(RequestLog)))
    ///     .register()
    ///     .unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// let first = container.context("session-9").get::<RequestLog>().unwrap();
    /// let again = container.context("session-9").get::<RequestLog>().unwrap();
    /// assert!(Arc::ptr_eq(&first, &again));
    /// ```
    pub fn context(&self, id: impl Into<ContextId>) -> AppContext {
        let id = id.into();
        let cells = self.inner.scopes.attach(&id, self.inner.registry.app_slot_count());
        AppContext {
            container: self.clone(),
            id,
            cells,
        }
    }

    /// Evicts every application-scoped instance cached under `id`.
    ///
    /// Teardown hooks registered within the context run in LIFO order before
    /// this returns. Singletons and other contexts are untouched; the next
    /// [`context`](Self::context) call for the same id starts clean. Returns
    /// `false` when no such context was live.
    pub fn reset_scope(&self, id: &ContextId) -> bool {
        match self.inner.scopes.evict(id) {
            Some(cells) => {
                cells.run_disposers();
                true
            }
            None => false,
        }
    }

    /// Number of live application contexts.
    pub fn context_count(&self) -> usize {
        self.inner.scopes.context_count()
    }

    /// Tears the container down, running all registered teardown hooks.
    ///
    /// Every live application context is evicted and its hooks run (per
    /// context, LIFO), then container-level hooks run in LIFO order.
    /// Calling `teardown` a second time is a no-op.
    pub fn teardown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        for cells in self.inner.scopes.drain() {
            cells.run_disposers();
        }
        self.inner.root_disposers.lock().unwrap().run_all_reverse();
    }

    /// True when a binding exists for the unqualified contract `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.contains_key(&BindingKey::of::<T>())
    }

    /// The frozen registry backing this container.
    pub fn registry(&self) -> &BindingRegistry {
        &self.inner.registry
    }

    /// Metadata for every registered binding, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Scope};
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<String>().to_instance("cfg".to_string()).register().unwrap();
    /// builder.bind::<u32>()
    ///     .scoped(Scope::Application)
    ///     .to_provider(|_| Ok(std::sync::Arc::new(0u32)))
    ///     .register()
    ///     .unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// let descriptors = container.descriptors();
    /// assert_eq!(descriptors.len(), 2);
    /// assert!(descriptors.iter().any(|d| d.scope == Scope::Application));
    /// ```
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.inner.registry.descriptors()
    }

    /// Embedded-cell singleton resolution with a lock-free fast path.
    ///
    /// Dependencies of a singleton resolve through the container itself, so
    /// an application context triggering the construction is never captured
    /// by the longer-lived instance.
    #[inline(always)]
    pub(crate) fn resolve_singleton(
        &self,
        binding: &Binding,
        key: &BindingKey,
    ) -> ContainerResult<AnyArc> {
        if let Some(cell) = &binding.singleton {
            if let Some(value) = cell.get() {
                return Ok(value.clone());
            }
            let value = cell.get_or_try_init(|| {
                let ctx = ResolverContext::new(self);
                run_provider(binding, key, &ctx)
            })?;
            return Ok(value.clone());
        }
        // No cell means the binding never went through freeze; construct
        // without caching.
        let ctx = ResolverContext::new(self);
        run_provider(binding, key, &ctx)
    }

    fn resolve_any_impl(&self, key: &BindingKey) -> ContainerResult<AnyArc> {
        match self.inner.registry.get(key) {
            Some(binding) => match binding.scope {
                Scope::Singleton => self.resolve_singleton(binding, key),
                Scope::Application => Err(ContainerError::WrongScope {
                    key: key.rendered(),
                    scope: Scope::Application,
                }),
                Scope::Prototype => {
                    let ctx = ResolverContext::new(self);
                    run_provider(binding, key, &ctx)
                }
            },
            None => Err(ContainerError::Unbound(key.rendered())),
        }
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 && !self.inner.torn_down.load(Ordering::SeqCst) {
            if let Ok(bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    eprintln!(
                        "[bindery] Container dropped with pending teardown hooks. Call teardown() before dropping."
                    );
                }
            }
        }
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &BindingKey) -> ContainerResult<AnyArc> {
        observe(&self.inner.observers, key, || {
            let _guard = ChainGuard::push(key)?;
            self.resolve_any_impl(key)
        })
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.inner.root_disposers.lock().unwrap().push(f);
    }
}

impl Resolver for Container {}
