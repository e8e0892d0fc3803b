//! # bindery
//!
//! Qualifier-aware dependency injection with deterministic stub rendering
//! and selective persistence for scoped state.
//!
//! ## Features
//!
//! - **Typed bindings**: concrete and trait-object contracts, disambiguated
//!   by qualifiers, registered through a fluent builder
//! - **Three scopes**: `Singleton` (container lifetime), `Application`
//!   (per-context, evictable), `Prototype` (fresh every resolution)
//! - **Thread-safe**: lock-free cached reads with at-most-one construction
//!   per key under contention
//! - **Cycle detection**: circular chains fail fast with the full
//!   dependency path instead of recursing
//! - **Modules**: atomic bootstrap units whose conflicts name both
//!   declaring modules
//! - **Stub rendering**: deterministic signature/literal rendering with a
//!   content-hash cache for generated text
//! - **Selective persistence**: field-selected payloads carry scoped state
//!   across lifecycle boundaries
//!
//! ## Quick Start
//!
//! ```rust
//! use bindery::{ContainerBuilder, Resolver, Scope};
//! use std::sync::Arc;
//!
//! // Define your services
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! // Register bindings
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .bind::<Database>()
//!     .to_instance(Database {
//!         connection_string: "postgres://localhost".to_string(),
//!     })
//!     .register()?;
//! builder
//!     .bind::<UserService>()
//!     .scoped(Scope::Singleton)
//!     .to_provider(|ctx| {
//!         Ok(Arc::new(UserService { db: ctx.get::<Database>()? }))
//!     })
//!     .register()?;
//!
//! // Build and resolve
//! let container = builder.build()?;
//! let users = container.get::<UserService>()?;
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! # Ok::<(), bindery::ContainerError>(())
//! ```
//!
//! ## Scopes
//!
//! - **Singleton**: constructed once and shared for the container's lifetime
//! - **Application**: constructed once per [`ContextId`] and evictable with
//!   [`Container::reset_scope`]
//! - **Prototype**: constructed fresh on every resolution (the default)
//!
//! ```rust
//! use bindery::{ContainerBuilder, Resolver, Scope};
//! use std::sync::Arc;
//!
//! struct Session {
//!     user: String,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .bind::<Session>()
//!     .scoped(Scope::Application)
//!     .to_provider(|_| Ok(Arc::new(Session { user: "ada".to_string() })))
//!     .register()?;
//!
//! let container = builder.build()?;
//!
//! let request = container.context("request-1");
//! let a = request.get::<Session>()?;
//! let b = request.get::<Session>()?;
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! // A different context constructs its own instance.
//! let other = container.context("request-2");
//! assert!(!Arc::ptr_eq(&a, &other.get::<Session>()?));
//! # Ok::<(), bindery::ContainerError>(())
//! ```
//!
//! ## Trait Resolution
//!
//! ```rust
//! use bindery::{ContainerBuilder, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .bind_trait::<dyn Logger>()
//!     .to_instance(Arc::new(ConsoleLogger))
//!     .register()?;
//!
//! let container = builder.build()?;
//! let logger = container.get_trait::<dyn Logger>()?;
//! logger.log("Hello, World!");
//! # Ok::<(), bindery::ContainerError>(())
//! ```

// Module declarations
pub mod builder;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod marker;
pub mod observer;
pub mod persist;
pub mod scope;
pub mod signature;
pub mod traits;

// Internal modules
mod binding;
mod internal;

// Re-export core types
pub use binding::BindingRegistry;
pub use builder::{BindingFor, ContainerBuilder, Module, ModuleLoader, PendingBinding, TraitBindingFor};
pub use container::{AppContext, Container, ContextId, ResolverContext};
pub use descriptors::BindingDescriptor;
pub use error::{BoxError, ContainerError, ContainerResult};
pub use key::BindingKey;
pub use marker::{Marker, Qualifier};
pub use observer::{ContainerObserver, LoggingObserver, MetricsObserver};
pub use persist::{MemoryStore, Payload, PayloadStore, Persist, SchemaDrift, SerializationAdapter};
pub use scope::Scope;
pub use signature::{
    ContentHash, FieldSignature, Literal, MethodSignature, ParamSignature, RenderOptions,
    SignatureDescriptor, SignatureRenderer, StubCache, TypeRef, Visibility,
};
pub use traits::{Construct, Dispose, Implement, Resolver, ResolverCore};
