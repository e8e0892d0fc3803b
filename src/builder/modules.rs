//! Module system for packaging bindings into reusable units.
//!
//! A [`Module`] groups related bindings behind a single `build` step so
//! subsystems can be wired independently and composed at bootstrap. The
//! [`ModuleLoader`] applies a set of modules in order, atomically.

use crate::container::Container;
use crate::error::{ContainerError, ContainerResult};

use super::ContainerBuilder;

/// A unit of related bindings that registers itself into a builder.
///
/// Modules make bootstrap compositional: each subsystem ships a module, and
/// the application lists them in the order it wants them applied. Bindings
/// registered inside [`build`](Module::build) carry the module's
/// [`name`](Module::name), so a duplicate-key conflict can name both
/// declaring modules.
///
/// Installation is atomic. If `build` returns an error, or any of the
/// module's bindings conflicts with one already present, nothing from the
/// module is kept.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, ContainerResult, Module, Resolver, Scope};
/// use std::sync::Arc;
///
/// struct UserConfig {
///     page_size: usize,
/// }
///
/// struct UserService {
///     page_size: usize,
/// }
///
/// struct UserModule;
///
/// impl Module for UserModule {
///     fn name(&self) -> &'static str {
///         "users"
///     }
///
///     fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
///         builder
///             .bind::<UserConfig>()
///             .to_instance(UserConfig { page_size: 25 })
///             .register()?;
///         builder
///             .bind::<UserService>()
///             .scoped(Scope::Singleton)
///             .to_provider(|ctx| {
///                 let config = ctx.get::<UserConfig>()?;
///                 Ok(Arc::new(UserService { page_size: config.page_size }))
///             })
///             .register()
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.install(&UserModule)?;
///
/// let container = builder.build()?;
/// assert_eq!(container.get::<UserService>()?.page_size, 25);
/// # Ok::<(), bindery::ContainerError>(())
/// ```
pub trait Module {
    /// Name used in conflict reports and diagnostics.
    ///
    /// Defaults to the implementing type's name.
    fn name(&self) -> &'static str {
        std::any::type_name_of_val(self)
    }

    /// Registers this module's bindings into the given builder.
    fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()>;
}

/// Applies a list of modules to a builder in registration order.
///
/// The whole load is atomic: every module builds into a staging area first,
/// and the target builder adopts the combined result only when all of them
/// succeed. A failure in any module, or a conflict between modules, leaves
/// the target builder untouched.
///
/// Later modules may replace a binding from an earlier module only through
/// the explicit [`allow_override`](super::BindingFor::allow_override) flag.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, ContainerResult, Module, ModuleLoader, Resolver};
///
/// struct Defaults;
/// impl Module for Defaults {
///     fn name(&self) -> &'static str {
///         "defaults"
///     }
///     fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
///         builder.bind::<u16>().to_instance(8080u16).register()
///     }
/// }
///
/// struct Production;
/// impl Module for Production {
///     fn name(&self) -> &'static str {
///         "production"
///     }
///     fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
///         builder
///             .bind::<u16>()
///             .allow_override()
///             .to_instance(443u16)
///             .register()
///     }
/// }
///
/// let mut loader = ModuleLoader::new();
/// loader.register(Defaults);
/// loader.register(Production);
///
/// let container = loader.build_container()?;
/// assert_eq!(*container.get::<u16>()?, 443);
/// # Ok::<(), bindery::ContainerError>(())
/// ```
#[derive(Default)]
pub struct ModuleLoader {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self { modules: Vec::new() }
    }

    /// Queues a module. Modules are applied in the order they were
    /// registered.
    pub fn register(&mut self, module: impl Module + 'static) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Number of queued modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when no modules are queued.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Applies every queued module to the builder, all or nothing.
    ///
    /// Modules build into a shared staging area in registration order, so a
    /// later module sees (and may override) the bindings of earlier ones.
    /// Any failure aborts the whole load and leaves `builder` untouched.
    pub fn load_all(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
        if builder.is_frozen() {
            return Err(ContainerError::FrozenRegistry);
        }
        let mut staged = ContainerBuilder::new();
        for module in &self.modules {
            staged.install(module.as_ref())?;
        }
        builder.adopt(staged)
    }

    /// Bootstraps a container from the queued modules alone.
    pub fn build_container(&self) -> ContainerResult<Container> {
        let mut builder = ContainerBuilder::new();
        self.load_all(&mut builder)?;
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;

    struct Flag(&'static str);

    struct First;

    impl Module for First {
        fn name(&self) -> &'static str {
            "first"
        }

        fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
            builder.bind::<Flag>().to_instance(Flag("first")).register()
        }
    }

    struct Second;

    impl Module for Second {
        fn name(&self) -> &'static str {
            "second"
        }

        fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
            builder
                .bind::<Flag>()
                .allow_override()
                .to_instance(Flag("second"))
                .register()
        }
    }

    struct SecondNoOverride;

    impl Module for SecondNoOverride {
        fn name(&self) -> &'static str {
            "second-no-override"
        }

        fn build(&self, builder: &mut ContainerBuilder) -> ContainerResult<()> {
            builder.bind::<Flag>().to_instance(Flag("second")).register()
        }
    }

    struct Failing;

    impl Module for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn build(&self, _builder: &mut ContainerBuilder) -> ContainerResult<()> {
            Err(ContainerError::Payload("module refused to build".to_string()))
        }
    }

    #[test]
    fn modules_apply_in_registration_order() {
        let mut loader = ModuleLoader::new();
        loader.register(First);
        loader.register(Second);

        let container = loader.build_container().unwrap();
        assert_eq!(container.get::<Flag>().unwrap().0, "second");
    }

    #[test]
    fn cross_module_conflict_names_both_modules() {
        let mut loader = ModuleLoader::new();
        loader.register(First);
        loader.register(SecondNoOverride);

        let mut builder = ContainerBuilder::new();
        let err = loader.load_all(&mut builder).unwrap_err();
        match err {
            ContainerError::Conflict { first, second, .. } => {
                assert_eq!(first, Some("first"));
                assert_eq!(second, Some("second-no-override"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(builder.is_empty());
    }

    #[test]
    fn failing_module_aborts_whole_load() {
        let mut loader = ModuleLoader::new();
        loader.register(First);
        loader.register(Failing);

        let mut builder = ContainerBuilder::new();
        builder.bind::<u8>().to_instance(1u8).register().unwrap();

        assert!(loader.load_all(&mut builder).is_err());
        // Only the pre-existing binding survives.
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn default_module_name_is_the_type_name() {
        struct Anonymous;
        impl Module for Anonymous {
            fn build(&self, _: &mut ContainerBuilder) -> ContainerResult<()> {
                Ok(())
            }
        }

        assert!(Anonymous.name().contains("Anonymous"));
    }
}
