//! Fluent binding registration and container bootstrap.
//!
//! This module contains the [`ContainerBuilder`] and the chained binding
//! builders it hands out, plus the module system for packaging related
//! bindings into reusable units.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::binding::{AnyArc, Binding, BindingRegistry, ProviderFn};
use crate::container::{Container, ResolverContext};
use crate::descriptors::BindingDescriptor;
use crate::error::{BoxError, ContainerError, ContainerResult};
use crate::key::BindingKey;
use crate::marker::{Marker, Qualifier};
use crate::observer::{ContainerObserver, Observers};
use crate::scope::Scope;
use crate::traits::Implement;

pub mod modules;
pub use modules::{Module, ModuleLoader};

/// Mutable collection of bindings used to bootstrap a [`Container`].
///
/// This is the main entry point for wiring. Bindings are registered through
/// the fluent [`bind`](ContainerBuilder::bind) and
/// [`bind_trait`](ContainerBuilder::bind_trait) chains, each keyed by
/// (contract type, qualifier). Registering the same key twice is a conflict
/// unless the later binding opts into
/// [`allow_override`](BindingFor::allow_override).
///
/// Calling [`build`](ContainerBuilder::build) freezes the registry and
/// produces the immutable container; [`freeze`](ContainerBuilder::freeze)
/// can seal the builder earlier so that any later registration fails with
/// [`ContainerError::FrozenRegistry`].
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct Config {
///     database_url: String,
/// }
///
/// struct Pool {
///     url: String,
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .bind::<Config>()
///     .to_instance(Config { database_url: "postgres://localhost".to_string() })
///     .register()?;
/// builder
///     .bind::<Pool>()
///     .scoped(Scope::Singleton)
///     .to_provider(|ctx| {
///         let config = ctx.get::<Config>()?;
///         Ok(Arc::new(Pool { url: config.database_url.clone() }))
///     })
///     .register()?;
///
/// let container = builder.build()?;
/// let pool = container.get::<Pool>()?;
/// assert_eq!(pool.url, "postgres://localhost");
/// # Ok::<(), bindery::ContainerError>(())
/// ```
pub struct ContainerBuilder {
    registry: BindingRegistry,
    observers: Observers,
    frozen: bool,
    /// Name stamped onto bindings registered while a module builds, for
    /// conflict attribution.
    current_module: Option<&'static str>,
}

impl ContainerBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            registry: BindingRegistry::new(),
            observers: Observers::new(),
            frozen: false,
            current_module: None,
        }
    }

    /// Starts a binding chain for the concrete contract `T`.
    ///
    /// The chain selects scope, qualifier and source, then lands the binding
    /// with [`register`](PendingBinding::register).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, Resolver, Scope};
    /// use std::sync::Arc;
    ///
    /// struct Clock;
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder
    ///     .bind::<Clock>()
    ///     .scoped(Scope::Singleton)
    ///     .to_provider(|_| Ok(Arc::new(Clock)))
    ///     .register()?;
    ///
    /// let container = builder.build()?;
    /// let a = container.get::<Clock>()?;
    /// let b = container.get::<Clock>()?;
    /// assert!(Arc::ptr_eq(&a, &b));
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn bind<T: Send + Sync + 'static>(&mut self) -> BindingFor<'_, T> {
        BindingFor {
            builder: self,
            scope: Scope::default(),
            qualifier: Qualifier::Unqualified,
            allow_override: false,
            _contract: PhantomData,
        }
    }

    /// Starts a binding chain for the trait-object contract `T`.
    ///
    /// Use this to bind `dyn Trait` contracts; resolution goes through
    /// [`get_trait`](crate::Resolver::get_trait).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Notifier: Send + Sync {
    ///     fn channel(&self) -> &str;
    /// }
    ///
    /// struct Email;
    /// impl Notifier for Email {
    ///     fn channel(&self) -> &str {
    ///         "email"
    ///     }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder
    ///     .bind_trait::<dyn Notifier>()
    ///     .to_provider(|_| Ok(Arc::new(Email) as Arc<dyn Notifier>))
    ///     .register()?;
    ///
    /// let container = builder.build()?;
    /// let notifier = container.get_trait::<dyn Notifier>()?;
    /// assert_eq!(notifier.channel(), "email");
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn bind_trait<T: ?Sized + Send + Sync + 'static>(&mut self) -> TraitBindingFor<'_, T> {
        TraitBindingFor {
            builder: self,
            scope: Scope::default(),
            qualifier: Qualifier::Unqualified,
            allow_override: false,
            _contract: PhantomData,
        }
    }

    /// Installs a module, adopting its bindings atomically.
    ///
    /// The module builds into a staging area first. If its
    /// [`build`](Module::build) step or any of its registrations fails,
    /// this builder is left exactly as it was; nothing from the module is
    /// kept. Bindings adopted from a module carry the module's
    /// [`name`](Module::name) for conflict attribution.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, ContainerResult, Module, Resolver};
    ///
    /// struct HttpDefaults;
    ///
    /// impl Module for HttpDefaults {
    ///     fn name(&self) -> &'static str {
    ///         "http-defaults"
    ///     }
    ///
    ///     fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
    ///         builder.bind::<u16>().to_instance(8080u16).register()
    ///     }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.install(&HttpDefaults)?;
    ///
    /// let container = builder.build()?;
    /// assert_eq!(*container.get::<u16>()?, 8080);
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn install(&mut self, module: &dyn Module) -> ContainerResult<()> {
        if self.frozen {
            return Err(ContainerError::FrozenRegistry);
        }
        let mut staged = ContainerBuilder::new();
        staged.current_module = Some(module.name());
        module.build(&mut staged)?;
        self.adopt(staged)
    }

    /// Merges a staged builder into this one, all or nothing.
    ///
    /// Every staged key is checked for conflicts before any is inserted, so
    /// a failed adoption leaves this builder untouched.
    pub(crate) fn adopt(&mut self, mut staged: ContainerBuilder) -> ContainerResult<()> {
        if self.frozen {
            return Err(ContainerError::FrozenRegistry);
        }
        for (key, binding) in staged.registry.iter() {
            if !binding.allows_override {
                if let Some(existing) = self.registry.get(key) {
                    return Err(ContainerError::Conflict {
                        key: key.rendered(),
                        first: existing.declared_by,
                        second: binding.declared_by,
                    });
                }
            }
        }
        for (key, binding) in staged.registry.drain() {
            let second = binding.declared_by;
            let rendered = key.rendered();
            self.registry
                .insert(key, binding)
                .map_err(|dup| ContainerError::Conflict {
                    key: rendered,
                    first: dup.first,
                    second,
                })?;
        }
        self.observers.extend(staged.observers);
        Ok(())
    }

    /// Registers an observer that will receive resolution events from the
    /// built container.
    pub fn add_observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Seals the builder and returns a read-only view of its registry.
    ///
    /// Finalizes lookup slots, then rejects every later
    /// [`register`](PendingBinding::register),
    /// [`install`](ContainerBuilder::install) or repeated `freeze` call
    /// with [`ContainerError::FrozenRegistry`]. The bindings already present
    /// remain available to [`build`](ContainerBuilder::build).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, ContainerError};
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<u32>().to_instance(1u32).register()?;
    ///
    /// let registry = builder.freeze()?;
    /// assert_eq!(registry.len(), 1);
    ///
    /// let err = builder.bind::<u64>().to_instance(2u64).register().unwrap_err();
    /// assert!(matches!(err, ContainerError::FrozenRegistry));
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn freeze(&mut self) -> ContainerResult<&BindingRegistry> {
        if self.frozen {
            return Err(ContainerError::FrozenRegistry);
        }
        self.frozen = true;
        self.registry.finalize();
        Ok(&self.registry)
    }

    /// True once [`freeze`](ContainerBuilder::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Metadata for every binding registered so far, sorted by
    /// (type name, qualifier).
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry.descriptors()
    }

    /// Number of bindings registered so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no bindings have been registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Freezes the registry and produces the immutable [`Container`].
    ///
    /// Lookup slots are finalized here; the container shares the frozen
    /// registry across threads without locking. Building a builder that was
    /// frozen earlier is fine; the seal only blocks registration.
    pub fn build(mut self) -> ContainerResult<Container> {
        if !self.frozen {
            self.frozen = true;
            self.registry.finalize();
        }
        Ok(Container::from_parts(self.registry, self.observers))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn pending_for<T: ?Sized + 'static>(
    builder: &mut ContainerBuilder,
    scope: Scope,
    qualifier: Qualifier,
    allow_override: bool,
    provider: Arc<ProviderFn>,
) -> PendingBinding<'_> {
    let key = match qualifier {
        Qualifier::Unqualified => BindingKey::of::<T>(),
        Qualifier::Marked(marker) => BindingKey::qualified::<T>(marker),
    };
    let mut binding = Binding::new(scope, provider, builder.current_module);
    binding.allows_override = allow_override;
    PendingBinding { builder, key, binding }
}

/// Binding chain for a concrete contract `T`.
///
/// Produced by [`ContainerBuilder::bind`]. Scope defaults to
/// [`Scope::Prototype`] and the qualifier to unqualified; both can be set
/// before choosing a source.
pub struct BindingFor<'a, T: Send + Sync + 'static> {
    builder: &'a mut ContainerBuilder,
    scope: Scope,
    qualifier: Qualifier,
    allow_override: bool,
    _contract: PhantomData<fn() -> T>,
}

impl<'a, T: Send + Sync + 'static> BindingFor<'a, T> {
    /// Sets the lifecycle scope for this binding.
    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Attaches a qualifier so several bindings of `T` can coexist.
    ///
    /// The marker label is trimmed and compared case-sensitively; resolve
    /// qualified bindings with [`get_with`](crate::Resolver::get_with).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, Resolver};
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder
    ///     .bind::<String>()
    ///     .qualified_by("primary")
    ///     .to_instance("postgres://primary".to_string())
    ///     .register()?;
    /// builder
    ///     .bind::<String>()
    ///     .qualified_by("replica")
    ///     .to_instance("postgres://replica".to_string())
    ///     .register()?;
    ///
    /// let container = builder.build()?;
    /// assert_eq!(*container.get_with::<String>("primary")?, "postgres://primary");
    /// assert_eq!(*container.get_with::<String>("replica")?, "postgres://replica");
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn qualified_by(mut self, marker: impl Into<Marker>) -> Self {
        self.qualifier = Qualifier::Marked(marker.into());
        self
    }

    /// Lets this binding replace an existing one for the same key instead
    /// of raising a conflict.
    pub fn allow_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    /// Sources the binding from a [`Construct`](crate::Construct)
    /// implementation `I`.
    ///
    /// `I` builds itself from the resolver context and is stored under the
    /// contract `T`; use `I = T` for self-implementing contracts.
    pub fn to<I>(self) -> PendingBinding<'a>
    where
        I: Implement<T>,
    {
        let ctor: Arc<ProviderFn> =
            Arc::new(move |ctx: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                let built = Arc::new(I::construct(ctx)?);
                Ok(built.as_contract())
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }

    /// Sources the binding from a pre-built instance.
    ///
    /// The instance is wrapped in an `Arc` once and shared by every
    /// resolution, so the binding is always singleton-scoped.
    pub fn to_instance(mut self, value: T) -> PendingBinding<'a> {
        self.scope = Scope::Singleton;
        let any_arc: AnyArc = Arc::new(value);
        let ctor: Arc<ProviderFn> =
            Arc::new(move |_: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                Ok(any_arc.clone())
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }

    /// Sources the binding from a provider closure.
    ///
    /// The closure receives a [`ResolverContext`] for resolving
    /// dependencies and runs according to the binding's scope. Failures
    /// surface as [`ContainerError::Construction`] with the original cause
    /// attached.
    pub fn to_provider<F>(self, provider: F) -> PendingBinding<'a>
    where
        F: for<'c> Fn(&ResolverContext<'c>) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let ctor: Arc<ProviderFn> =
            Arc::new(move |ctx: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                Ok(provider(ctx)?)
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }
}

/// Binding chain for a trait-object contract `T`.
///
/// Produced by [`ContainerBuilder::bind_trait`]. Trait objects are stored
/// double-wrapped as `Arc<Arc<dyn Trait>>` so they fit the type-erased
/// cache.
pub struct TraitBindingFor<'a, T: ?Sized + Send + Sync + 'static> {
    builder: &'a mut ContainerBuilder,
    scope: Scope,
    qualifier: Qualifier,
    allow_override: bool,
    _contract: PhantomData<fn() -> Box<T>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> TraitBindingFor<'a, T> {
    /// Sets the lifecycle scope for this binding.
    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Attaches a qualifier so several bindings of `T` can coexist.
    pub fn qualified_by(mut self, marker: impl Into<Marker>) -> Self {
        self.qualifier = Qualifier::Marked(marker.into());
        self
    }

    /// Lets this binding replace an existing one for the same key instead
    /// of raising a conflict.
    pub fn allow_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    /// Sources the binding from an [`Implement`] of the trait contract.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::{ContainerBuilder, Construct, Implement, Resolver, ResolverContext};
    /// use bindery::BoxError;
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    ///
    /// impl Construct for English {
    ///     fn construct(_: &ResolverContext<'_>) -> Result<Self, BoxError> {
    ///         Ok(English)
    ///     }
    /// }
    ///
    /// impl Implement<dyn Greeter> for English {
    ///     fn as_contract(self: Arc<Self>) -> Arc<dyn Greeter> {
    ///         self
    ///     }
    /// }
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".to_string()
    ///     }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind_trait::<dyn Greeter>().to::<English>().register()?;
    ///
    /// let container = builder.build()?;
    /// assert_eq!(container.get_trait::<dyn Greeter>()?.greet(), "hello");
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn to<I>(self) -> PendingBinding<'a>
    where
        I: Implement<T>,
    {
        let ctor: Arc<ProviderFn> =
            Arc::new(move |ctx: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                let built = Arc::new(I::construct(ctx)?);
                let contract: Arc<T> = built.as_contract();
                Ok(Arc::new(contract))
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }

    /// Sources the binding from a pre-built trait object.
    ///
    /// Always singleton-scoped; every resolution shares the given `Arc`.
    pub fn to_instance(mut self, instance: Arc<T>) -> PendingBinding<'a> {
        self.scope = Scope::Singleton;
        let any_arc: AnyArc = Arc::new(instance);
        let ctor: Arc<ProviderFn> =
            Arc::new(move |_: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                Ok(any_arc.clone())
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }

    /// Sources the binding from a provider closure returning the trait
    /// object.
    pub fn to_provider<F>(self, provider: F) -> PendingBinding<'a>
    where
        F: for<'c> Fn(&ResolverContext<'c>) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let ctor: Arc<ProviderFn> =
            Arc::new(move |ctx: &ResolverContext<'_>| -> Result<AnyArc, BoxError> {
                Ok(Arc::new(provider(ctx)?))
            });
        pending_for::<T>(self.builder, self.scope, self.qualifier, self.allow_override, ctor)
    }
}

/// A fully specified binding waiting to be landed in the builder.
#[must_use = "a binding does nothing until register() is called"]
pub struct PendingBinding<'a> {
    builder: &'a mut ContainerBuilder,
    key: BindingKey,
    binding: Binding,
}

impl PendingBinding<'_> {
    /// Lands the binding in the builder's registry.
    ///
    /// Fails with [`ContainerError::FrozenRegistry`] after
    /// [`freeze`](ContainerBuilder::freeze), or with
    /// [`ContainerError::Conflict`] when the (contract, qualifier) key is
    /// already taken and the binding did not opt into
    /// [`allow_override`](BindingFor::allow_override).
    pub fn register(self) -> ContainerResult<()> {
        if self.builder.frozen {
            return Err(ContainerError::FrozenRegistry);
        }
        let second = self.binding.declared_by;
        let rendered = self.key.rendered();
        self.builder
            .registry
            .insert(self.key, self.binding)
            .map_err(|dup| ContainerError::Conflict {
                key: rendered,
                first: dup.first,
                second,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;

    struct Port(u16);

    #[test]
    fn duplicate_key_reports_conflict() {
        let mut builder = ContainerBuilder::new();
        builder.bind::<Port>().to_instance(Port(1)).register().unwrap();
        let err = builder
            .bind::<Port>()
            .to_instance(Port(2))
            .register()
            .unwrap_err();
        assert!(matches!(err, ContainerError::Conflict { .. }));
    }

    #[test]
    fn override_replaces_prior_binding() {
        let mut builder = ContainerBuilder::new();
        builder.bind::<Port>().to_instance(Port(1)).register().unwrap();
        builder
            .bind::<Port>()
            .allow_override()
            .to_instance(Port(2))
            .register()
            .unwrap();

        let container = builder.build().unwrap();
        assert_eq!(container.get::<Port>().unwrap().0, 2);
    }

    #[test]
    fn qualified_bindings_do_not_collide() {
        let mut builder = ContainerBuilder::new();
        builder.bind::<Port>().to_instance(Port(80)).register().unwrap();
        builder
            .bind::<Port>()
            .qualified_by("admin")
            .to_instance(Port(8443))
            .register()
            .unwrap();

        let container = builder.build().unwrap();
        assert_eq!(container.get::<Port>().unwrap().0, 80);
        assert_eq!(container.get_with::<Port>("admin").unwrap().0, 8443);
    }

    #[test]
    fn frozen_builder_rejects_registration() {
        let mut builder = ContainerBuilder::new();
        builder.freeze().unwrap();
        let err = builder.bind::<Port>().to_instance(Port(1)).register().unwrap_err();
        assert!(matches!(err, ContainerError::FrozenRegistry));
        assert!(matches!(builder.freeze(), Err(ContainerError::FrozenRegistry)));
    }

    #[test]
    fn failed_install_leaves_builder_untouched() {
        struct GoodThenBad;

        impl Module for GoodThenBad {
            fn name(&self) -> &'static str {
                "good-then-bad"
            }

            fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
                builder.bind::<Port>().to_instance(Port(1)).register()?;
                Err(ContainerError::Payload("boom".to_string()))
            }
        }

        let mut builder = ContainerBuilder::new();
        assert!(builder.install(&GoodThenBad).is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn conflicting_module_adopts_nothing() {
        struct Pair;

        impl Module for Pair {
            fn name(&self) -> &'static str {
                "pair"
            }

            fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
                builder.bind::<Port>().to_instance(Port(2)).register()?;
                builder.bind::<String>().to_instance("kept?".to_string()).register()
            }
        }

        let mut builder = ContainerBuilder::new();
        builder.bind::<Port>().to_instance(Port(1)).register().unwrap();

        let err = builder.install(&Pair).unwrap_err();
        match err {
            ContainerError::Conflict { second, .. } => assert_eq!(second, Some("pair")),
            other => panic!("unexpected error: {}", other),
        }

        // The module's non-conflicting String binding must not leak in.
        assert_eq!(builder.len(), 1);
    }
}
