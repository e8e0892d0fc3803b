//! Resolution context handed to providers.

use crate::traits::{Resolver, ResolverCore};

/// Context passed to providers and [`Construct`](crate::Construct) impls for
/// resolving dependencies.
///
/// `ResolverContext` wraps whichever resolver triggered construction (a
/// [`Container`](crate::Container) or an [`AppContext`](crate::AppContext))
/// so provider code stays independent of the concrete resolver type.
/// Dependencies resolved through it join the caller's resolution chain, which
/// is how circular dependencies across providers are caught.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Database>()
///     .to_instance(Database { url: "postgres://localhost".to_string() })
///     .register()
///     .unwrap();
/// builder.bind::<UserService>()
///     .to_provider(|ctx| {
///         // ctx resolves against the container that invoked this provider
///         Ok(Arc::new(UserService { db: ctx.get::<Database>()? }))
///     })
///     .register()
///     .unwrap();
///
/// let container = builder.build().unwrap();
/// let service = container.get::<UserService>().unwrap();
/// assert_eq!(service.db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(
        &self,
        key: &crate::BindingKey,
    ) -> crate::ContainerResult<crate::binding::AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn push_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.resolver.push_disposer(f);
    }
}

impl Resolver for ResolverContext<'_> {}
