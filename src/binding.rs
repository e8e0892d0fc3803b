//! Binding records and the frozen registry that stores them.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::BoxError;
use crate::key::BindingKey;
use crate::scope::Scope;

pub(crate) use crate::container::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased provider closure stored per binding.
pub(crate) type ProviderFn =
    dyn for<'a> Fn(&ResolverContext<'a>) -> Result<AnyArc, BoxError> + Send + Sync;

/// One registered binding: scope, provider, and cache anchors
pub(crate) struct Binding {
    pub(crate) scope: Scope,
    pub(crate) provider: Arc<ProviderFn>,
    /// Module that declared this binding, for conflict attribution.
    pub(crate) declared_by: Option<&'static str>,
    /// When set, registering over an existing entry replaces it instead of
    /// raising a conflict.
    pub(crate) allows_override: bool,
    /// Singleton cache cell, present iff the scope is `Singleton`.
    pub(crate) singleton: Option<OnceCell<AnyArc>>,
    /// Slot index into each context's cell array, assigned at freeze for
    /// `Application` bindings.
    pub(crate) app_slot: Option<usize>,
}

impl Binding {
    pub(crate) fn new(
        scope: Scope,
        provider: Arc<ProviderFn>,
        declared_by: Option<&'static str>,
    ) -> Self {
        let singleton = match scope {
            Scope::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self {
            scope,
            provider,
            declared_by,
            allows_override: false,
            singleton,
            app_slot: None,
        }
    }
}

/// Raised by [`BindingRegistry::insert`] on a duplicate key without override.
pub(crate) struct DuplicateBinding {
    /// Declaring module of the binding already present, if known.
    pub(crate) first: Option<&'static str>,
}

/// Immutable set of bindings produced by freezing a builder
///
/// Lookup is by exact (contract, qualifier) key. Storage is a hybrid of a
/// small linear-scan `Vec` and a `HashMap` spill for larger registries; the
/// `Vec` is sorted at freeze for cache-friendly scans. After
/// [`freeze`](crate::ContainerBuilder::freeze) the registry never changes,
/// so it is shared across resolver threads without locks.
pub struct BindingRegistry {
    /// Fast Vec lookup for the first N bindings (cache-friendly)
    small: Vec<(BindingKey, Binding)>,
    /// HashMap fallback for the rest
    large: HashMap<BindingKey, Binding>,
    /// Total count of application-scoped bindings, for context cell arrays
    app_slots: usize,
    /// Threshold for Vec vs HashMap storage
    small_threshold: usize,
}

impl BindingRegistry {
    pub(crate) fn new() -> Self {
        Self {
            small: Vec::new(),
            large: HashMap::new(),
            app_slots: 0,
            small_threshold: 16,
        }
    }

    /// Inserts a binding, enforcing (contract, qualifier) uniqueness.
    ///
    /// A binding whose `allows_override` flag is set discards the prior
    /// entry; otherwise a duplicate reports the prior declarer so conflicts
    /// can name both modules.
    pub(crate) fn insert(
        &mut self,
        key: BindingKey,
        binding: Binding,
    ) -> Result<(), DuplicateBinding> {
        if let Some(pos) = self.small.iter().position(|(k, _)| k == &key) {
            if !binding.allows_override {
                return Err(DuplicateBinding {
                    first: self.small[pos].1.declared_by,
                });
            }
            self.small[pos] = (key, binding);
            return Ok(());
        }
        if let Some(existing) = self.large.get(&key) {
            if !binding.allows_override {
                return Err(DuplicateBinding {
                    first: existing.declared_by,
                });
            }
            self.large.insert(key, binding);
            return Ok(());
        }
        if self.small.len() < self.small_threshold {
            self.small.push((key, binding));
        } else {
            self.large.insert(key, binding);
        }
        Ok(())
    }

    /// Exact-match lookup.
    #[inline(always)]
    pub(crate) fn get(&self, key: &BindingKey) -> Option<&Binding> {
        for (k, binding) in &self.small {
            if k == key {
                return Some(binding);
            }
        }
        self.large.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &BindingKey) -> bool {
        self.get(key).is_some()
    }

    /// Iterator over all key-binding pairs.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&BindingKey, &Binding)> {
        self.small
            .iter()
            .map(|(k, b)| (k, b))
            .chain(self.large.iter())
    }

    /// Removes and returns every entry, leaving the registry empty.
    pub(crate) fn drain(&mut self) -> Vec<(BindingKey, Binding)> {
        let mut entries: Vec<_> = self.small.drain(..).collect();
        entries.extend(self.large.drain());
        entries
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }

    /// True when no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.small.is_empty() && self.large.is_empty()
    }

    /// Cell-array width required per application context.
    pub(crate) fn app_slot_count(&self) -> usize {
        self.app_slots
    }

    /// Metadata for every binding, sorted by (type name, qualifier).
    pub fn descriptors(&self) -> Vec<crate::descriptors::BindingDescriptor> {
        let mut all: Vec<_> = self
            .iter()
            .map(|(key, binding)| crate::descriptors::BindingDescriptor {
                type_name: key.type_name(),
                qualifier: key.qualifier().clone(),
                scope: binding.scope,
                declared_by: binding.declared_by,
            })
            .collect();
        all.sort_by(|a, b| (a.type_name, &a.qualifier).cmp(&(b.type_name, &b.qualifier)));
        all
    }

    /// Sorts the small Vec and assigns application slot indices.
    pub(crate) fn finalize(&mut self) {
        self.small.sort_by(|a, b| {
            (a.0.type_name(), a.0.qualifier()).cmp(&(b.0.type_name(), b.0.qualifier()))
        });

        let mut next_slot = 0;
        for (_, binding) in &mut self.small {
            if binding.scope == Scope::Application {
                binding.app_slot = Some(next_slot);
                next_slot += 1;
            }
        }
        for binding in self.large.values_mut() {
            if binding.scope == Scope::Application {
                binding.app_slot = Some(next_slot);
                next_slot += 1;
            }
        }
        self.app_slots = next_slot;
    }
}
