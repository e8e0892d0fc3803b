//! Application-scoped resolution and per-context lifecycle management.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::binding::{AnyArc, Binding};
use crate::error::ContainerResult;
use crate::internal::{ChainGuard, DisposeBag};
use crate::key::BindingKey;
use crate::scope::Scope;
use crate::traits::{Resolver, ResolverCore};
use crate::ContainerError;

use super::{observe, run_provider, Container, ResolverContext};

/// Identifier of one application context.
///
/// Externally supplied (a tenant id, a session id, a test case name) and
/// compared verbatim. Cloning is cheap (shared `Arc<str>`).
///
/// # Examples
///
/// ```
/// use bindery::ContextId;
///
/// let a = ContextId::new("tenant-1");
/// let b: ContextId = "tenant-1".into();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "tenant-1");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextId(Arc<str>);

impl ContextId {
    /// Creates a context identifier from its external key.
    pub fn new(id: impl AsRef<str>) -> Self {
        ContextId(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({:?})", &*self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        ContextId::new(id)
    }
}

impl From<String> for ContextId {
    fn from(id: String) -> Self {
        ContextId::new(id)
    }
}

/// Per-context cache cells and teardown hooks.
///
/// One slot per application-scoped binding, indexed by the slot assigned at
/// freeze. Cell initialization synchronizes racing resolvers per slot; the
/// bag collects hooks registered while resolving inside the context.
pub(crate) struct AppCells {
    pub(crate) cells: Box<[OnceCell<AnyArc>]>,
    pub(crate) disposers: Mutex<DisposeBag>,
}

impl AppCells {
    fn new(slot_count: usize) -> Self {
        let cells: Box<[OnceCell<AnyArc>]> = (0..slot_count)
            .map(|_| OnceCell::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            cells,
            disposers: Mutex::new(DisposeBag::default()),
        }
    }

    pub(crate) fn run_disposers(&self) {
        self.disposers.lock().unwrap().run_all_reverse();
    }
}

/// Map of live application contexts, keyed by [`ContextId`].
///
/// The lock covers only map structure (attach, evict); instance construction
/// happens against the per-slot cells after the lock is released.
pub(crate) struct ScopeManager {
    contexts: Mutex<HashMap<ContextId, Arc<AppCells>>>,
}

impl ScopeManager {
    pub(crate) fn new() -> Self {
        Self {
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cells for `id`, creating them on first attach.
    pub(crate) fn attach(&self, id: &ContextId, slot_count: usize) -> Arc<AppCells> {
        let mut contexts = self.contexts.lock().unwrap();
        contexts
            .entry(id.clone())
            .or_insert_with(|| Arc::new(AppCells::new(slot_count)))
            .clone()
    }

    /// Detaches one context, returning its cells for teardown.
    pub(crate) fn evict(&self, id: &ContextId) -> Option<Arc<AppCells>> {
        self.contexts.lock().unwrap().remove(id)
    }

    /// Detaches every context at once.
    pub(crate) fn drain(&self) -> Vec<Arc<AppCells>> {
        let mut contexts = self.contexts.lock().unwrap();
        contexts.drain().map(|(_, cells)| cells).collect()
    }

    pub(crate) fn context_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}

/// Resolution handle bound to one application context.
///
/// Obtained from [`Container::context`]. Resolving an application-scoped
/// contract through this handle caches the instance under the handle's
/// [`ContextId`]; handles for the same id share instances, and singleton or
/// prototype contracts behave exactly as they do on the container itself.
///
/// After [`Container::reset_scope`] evicts the id, handles created earlier
/// keep the evicted instances alive until dropped; a fresh
/// [`Container::context`] call observes a clean context.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct SessionCache {
///     hits: u32,
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<SessionCache>()
///     .scoped(Scope::Application)
///     .to_provider(|_| Ok(Arc::new(SessionCache { hits: 0 })))
///     .register()
///     .unwrap();
///
/// let container = builder.build().unwrap();
///
/// let tenant_a = container.context("tenant-a");
/// let tenant_b = container.context("tenant-b");
///
/// let a1 = tenant_a.get::<SessionCache>().unwrap();
/// let a2 = tenant_a.get::<SessionCache>().unwrap();
/// let b = tenant_b.get::<SessionCache>().unwrap();
///
/// assert!(Arc::ptr_eq(&a1, &a2)); // same context, same instance
/// assert!(!Arc::ptr_eq(&a1, &b)); // contexts are isolated
/// ```
#[derive(Clone)]
pub struct AppContext {
    pub(crate) container: Container,
    pub(crate) id: ContextId,
    pub(crate) cells: Arc<AppCells>,
}

impl AppContext {
    /// The context identifier this handle resolves under.
    pub fn id(&self) -> &ContextId {
        &self.id
    }

    /// The container this handle resolves against.
    pub fn container(&self) -> &Container {
        &self.container
    }

    fn resolve_any_impl(&self, key: &BindingKey) -> ContainerResult<AnyArc> {
        let inner = self.container.inner();
        match inner.registry.get(key) {
            Some(binding) => match binding.scope {
                // Singletons resolve through the container so their own
                // dependencies never capture this context.
                Scope::Singleton => self.container.resolve_singleton(binding, key),
                Scope::Application => self.resolve_application(binding, key),
                Scope::Prototype => {
                    let ctx = ResolverContext::new(self);
                    run_provider(binding, key, &ctx)
                }
            },
            None => Err(ContainerError::Unbound(key.rendered())),
        }
    }

    #[inline(always)]
    fn resolve_application(&self, binding: &Binding, key: &BindingKey) -> ContainerResult<AnyArc> {
        match binding.app_slot {
            Some(slot) => {
                let cell = &self.cells.cells[slot];
                if let Some(value) = cell.get() {
                    return Ok(value.clone());
                }
                let value = cell.get_or_try_init(|| {
                    let ctx = ResolverContext::new(self);
                    run_provider(binding, key, &ctx)
                })?;
                Ok(value.clone())
            }
            // Slot missing means the binding never went through freeze;
            // construct without caching.
            None => {
                let ctx = ResolverContext::new(self);
                run_provider(binding, key, &ctx)
            }
        }
    }
}

impl ResolverCore for AppContext {
    fn resolve_any(&self, key: &BindingKey) -> ContainerResult<AnyArc> {
        observe(&self.container.inner().observers, key, || {
            let _guard = ChainGuard::push(key)?;
            self.resolve_any_impl(key)
        })
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.cells.disposers.lock().unwrap().push(f);
    }
}

impl Resolver for AppContext {}
