//! Construction traits for container-built implementations.

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::BoxError;

/// Trait for types the container knows how to build.
///
/// Implementations pull their dependencies from the supplied
/// [`ResolverContext`], which resolves against the same container (and
/// application context, when one is active) that triggered construction.
/// Dependency resolution errors propagate with `?` and surface to the original
/// caller with their cause intact.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Construct, Resolver, ResolverContext, BoxError};
/// use std::sync::Arc;
///
/// struct Settings {
///     url: String,
/// }
///
/// impl Construct for Settings {
///     fn construct(_: &ResolverContext<'_>) -> Result<Self, BoxError> {
///         Ok(Settings { url: "db://local".to_string() })
///     }
/// }
///
/// struct Repository {
///     settings: Arc<Settings>,
/// }
///
/// impl Construct for Repository {
///     fn construct(ctx: &ResolverContext<'_>) -> Result<Self, BoxError> {
///         Ok(Repository { settings: ctx.get::<Settings>()? })
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Settings>().to::<Settings>().register().unwrap();
/// builder.bind::<Repository>().to::<Repository>().register().unwrap();
///
/// let container = builder.build().unwrap();
/// let repo = container.get::<Repository>().unwrap();
/// assert_eq!(repo.settings.url, "db://local");
/// ```
pub trait Construct: Sized + Send + Sync + 'static {
    /// Builds an instance, resolving dependencies through `ctx`.
    fn construct(ctx: &ResolverContext<'_>) -> Result<Self, BoxError>;
}

/// Marks a constructible type as an implementation of contract `C`.
///
/// Binding an implementation to a trait contract requires the unsizing step
/// from `Arc<Self>` to `Arc<dyn Trait>`, which [`as_contract`](Self::as_contract)
/// performs. Every [`Construct`] type implements its own concrete contract, so
/// `bind::<T>().to::<T>()` works without extra code; trait contracts need one
/// explicit impl per implementation:
///
/// ```
/// use bindery::{Construct, Implement, ResolverContext, BoxError};
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
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// impl Implement<dyn Greeter> for English {
///     fn as_contract(self: Arc<Self>) -> Arc<dyn Greeter> { self }
/// }
/// ```
pub trait Implement<C: ?Sized + Send + Sync + 'static>: Construct {
    /// Converts the freshly built implementation into the contract's shape.
    fn as_contract(self: Arc<Self>) -> Arc<C>;
}

impl<T: Construct> Implement<T> for T {
    fn as_contract(self: Arc<Self>) -> Arc<T> {
        self
    }
}
