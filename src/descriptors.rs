//! Binding descriptors for introspection and diagnostics.

use crate::marker::{Marker, Qualifier};
use crate::scope::Scope;

/// Binding metadata for introspection and diagnostics
///
/// Describes one registered binding without exposing its provider. Useful
/// for debugging a container's configuration, asserting wiring in tests,
/// and generating startup reports.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, Scope};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository;
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Database>()
///     .scoped(Scope::Singleton)
///     .to_instance(Database { url: "postgres://localhost".to_string() })
///     .register()
///     .unwrap();
/// builder.bind::<Repository>()
///     .qualified_by("users")
///     .to_provider(|_| Ok(Arc::new(Repository)))
///     .register()
///     .unwrap();
///
/// let descriptors = builder.descriptors();
///
/// let db = descriptors.iter()
///     .find(|d| d.type_name.contains("Database"))
///     .unwrap();
/// assert_eq!(db.scope, Scope::Singleton);
/// assert!(!db.is_qualified());
///
/// let repo = descriptors.iter()
///     .find(|d| d.marker().map(|m| m.label()) == Some("users"))
///     .unwrap();
/// assert_eq!(repo.scope, Scope::Prototype);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// Contract type name, as reported by `std::any::type_name`.
    pub type_name: &'static str,
    /// Qualifier the binding was registered under.
    pub qualifier: Qualifier,
    /// Declared lifecycle scope.
    pub scope: Scope,
    /// Module that declared the binding, when registered through one.
    pub declared_by: Option<&'static str>,
}

impl BindingDescriptor {
    /// True when the binding carries a marker.
    pub fn is_qualified(&self) -> bool {
        self.marker().is_some()
    }

    /// The binding's marker, if any.
    pub fn marker(&self) -> Option<&Marker> {
        self.qualifier.marker()
    }

    /// Rendered `name@marker` key form.
    pub fn rendered_key(&self) -> String {
        format!("{}{}", self.type_name, self.qualifier)
    }
}
