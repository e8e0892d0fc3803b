//! Resolver traits for contract resolution.

use std::sync::Arc;

use crate::error::ContainerResult;
use crate::key::BindingKey;
use crate::marker::Marker;
use crate::traits::Dispose;

/// Core resolver trait for object-safe contract resolution.
///
/// This trait provides the fundamental resolution capabilities that are
/// object-safe (can be used as trait objects). It handles the low-level
/// mechanics including scope caching and circular dependency detection
/// through thread-local resolution chains.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// type-safe generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single binding by key.
    ///
    /// This is the core resolution method. It walks the registry, applies the
    /// binding's scope, and detects circular dependency chains. The resolved
    /// instance comes back type-erased in an `Arc<dyn Any>`.
    ///
    /// # Arguments
    ///
    /// * `key` - The binding key to resolve (contract type plus qualifier)
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn Any>)` - The resolved instance, type-erased
    /// * `Err(ContainerError)` - Resolution failure (unbound, circular, scope
    ///   misuse, construction failure)
    fn resolve_any(&self, key: &BindingKey) -> ContainerResult<Arc<dyn std::any::Any + Send + Sync>>;

    /// Registers a teardown hook with the owning container or context.
    ///
    /// Used internally by providers to register cleanup callbacks that run
    /// when the container (or, inside an application context, that context)
    /// is torn down.
    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>);
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// This trait provides the main API users interact with when pulling instances
/// out of the container. It builds on [`ResolverCore`] to offer type-safe
/// generic methods that handle type erasure and downcasting internally.
///
/// [`Container`](crate::Container), [`AppContext`](crate::AppContext), and
/// [`ResolverContext`](crate::ResolverContext) all implement this trait,
/// making them interchangeable for resolution within their respective
/// contexts.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Construct, Implement, Resolver, ResolverContext, BoxError};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
///
/// impl Construct for ConsoleLogger {
///     fn construct(_: &ResolverContext<'_>) -> Result<Self, BoxError> {
///         Ok(ConsoleLogger)
///     }
/// }
///
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// impl Implement<dyn Logger> for ConsoleLogger {
///     fn as_contract(self: Arc<Self>) -> Arc<dyn Logger> {
///         self
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<usize>().to_instance(42usize).register().unwrap();
/// builder.bind_trait::<dyn Logger>().to::<ConsoleLogger>().register().unwrap();
///
/// let container = builder.build().unwrap();
///
/// // Resolve concrete types
/// let number = container.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// // Resolve trait objects
/// let logger = container.get_trait_required::<dyn Logger>();
/// logger.log("resolved");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves an unqualified concrete contract.
    ///
    /// Returns the instance wrapped in an `Arc` for thread-safe sharing. The
    /// contract must have been bound with the exact type `T` and no marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Resolver};
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<String>().to_instance("configuration".to_string()).register().unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// let config = container.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: 'static + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        let key = BindingKey::of::<T>();
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| crate::error::ContainerError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete contract qualified by a marker.
    ///
    /// The binding must have been registered with the same marker label
    /// (leading and trailing whitespace ignored). Bindings for the same type
    /// under different markers are independent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Resolver};
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<String>()
    ///     .qualified_by("primary")
    ///     .to_instance("first".to_string())
    ///     .register()
    ///     .unwrap();
    /// builder.bind::<String>()
    ///     .qualified_by("fallback")
    ///     .to_instance("second".to_string())
    ///     .register()
    ///     .unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// assert_eq!(&*container.get_with::<String>("primary").unwrap(), "first");
    /// assert_eq!(&*container.get_with::<String>("fallback").unwrap(), "second");
    /// ```
    fn get_with<T: 'static + Send + Sync>(&self, marker: impl Into<Marker>) -> ContainerResult<Arc<T>> {
        let key = BindingKey::qualified::<T>(marker);
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| crate::error::ContainerError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an unqualified trait contract.
    ///
    /// Returns the implementation bound for the trait `T`. Trait contracts are
    /// bound through [`ContainerBuilder::bind_trait`](crate::ContainerBuilder::bind_trait).
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Construct, Implement, Resolver, ResolverContext, BoxError};
    /// use std::sync::Arc;
    ///
    /// trait Database: Send + Sync {
    ///     fn connect(&self) -> &str;
    /// }
    ///
    /// struct PostgresDb;
    ///
    /// impl Construct for PostgresDb {
    ///     fn construct(_: &ResolverContext<'_>) -> Result<Self, BoxError> {
    ///         Ok(PostgresDb)
    ///     }
    /// }
    ///
    /// impl Database for PostgresDb {
    ///     fn connect(&self) -> &str { "postgres://..." }
    /// }
    ///
    /// impl Implement<dyn Database> for PostgresDb {
    ///     fn as_contract(self: Arc<Self>) -> Arc<dyn Database> { self }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind_trait::<dyn Database>().to::<PostgresDb>().register().unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// let db = container.get_trait::<dyn Database>().unwrap();
    /// assert_eq!(db.connect(), "postgres://...");
    /// ```
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> ContainerResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = BindingKey::of::<T>();
        let any = self.resolve_any(&key)?;
        // Trait objects are stored double-wrapped as Arc<Arc<dyn Trait>>.
        any.downcast::<Arc<T>>()
            .map(|outer| (*outer).clone())
            .map_err(|_| crate::error::ContainerError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait contract qualified by a marker.
    fn get_trait_with<T: ?Sized + 'static + Send + Sync>(&self, marker: impl Into<Marker>) -> ContainerResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = BindingKey::qualified::<T>(marker);
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|outer| (*outer).clone())
            .map_err(|_| crate::error::ContainerError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an unqualified concrete contract, panicking on failure.
    ///
    /// Convenience wrapper over [`get`](Self::get) for wiring code where a
    /// missing binding is a configuration bug and failing fast is wanted.
    ///
    /// # Panics
    ///
    /// Panics if the contract cannot be resolved (unbound, circular
    /// dependency, scope misuse, construction failure).
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves an unqualified trait contract, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the contract cannot be resolved.
    fn get_trait_required<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve trait {}: {}", std::any::type_name::<T>(), e))
    }

    /// Registers an instance for teardown.
    ///
    /// Call this from providers for instances that need cleanup. Hooks run in
    /// LIFO order when the owning container tears down; hooks registered while
    /// resolving inside an application context run when that context is reset.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery::{ContainerBuilder, Dispose, Resolver, Scope};
    /// use std::sync::Arc;
    ///
    /// struct Connection {
    ///     url: String,
    /// }
    ///
    /// impl Dispose for Connection {
    ///     fn dispose(&self) {
    ///         println!("Closing {}", self.url);
    ///     }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.bind::<Connection>()
    ///     .scoped(Scope::Singleton)
    ///     .to_provider(|ctx| {
    ///         let conn = Arc::new(Connection { url: "db://main".to_string() });
    ///         ctx.register_disposer(conn.clone());
    ///         Ok(conn)
    ///     })
    ///     .register()
    ///     .unwrap();
    ///
    /// let container = builder.build().unwrap();
    /// let _conn = container.get::<Connection>().unwrap();
    /// container.teardown(); // prints "Closing db://main"
    /// ```
    fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.push_disposer(Box::new(move || service.dispose()));
    }
}
