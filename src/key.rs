//! Binding keys pairing a contract identity with a qualifier.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Marker, Qualifier};

/// Registry and cache key: contract identity plus qualifier
///
/// A contract is identified by its `TypeId` (concrete types and `dyn Trait`
/// object types both have one); the type name rides along for display only.
/// Equality and hashing cover `(TypeId, Qualifier)`, so the same contract
/// under different markers forms distinct keys. Lookup is exact-match only,
/// with no supertype or partial matching.
///
/// # Examples
///
/// ```rust
/// use bindery::{BindingKey, Marker};
///
/// trait Logger: Send + Sync {}
///
/// let plain = BindingKey::of::<dyn Logger>();
/// let named = BindingKey::qualified::<dyn Logger>(Marker::new("audit"));
///
/// assert_ne!(plain, named);
/// assert!(named.to_string().ends_with("@audit"));
/// ```
#[derive(Debug, Clone)]
pub struct BindingKey {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Qualifier,
}

impl BindingKey {
    /// Key for an unqualified contract.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        BindingKey {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            qualifier: Qualifier::Unqualified,
        }
    }

    /// Key for a contract disambiguated by a marker.
    #[inline]
    pub fn qualified<T: ?Sized + 'static>(marker: impl Into<Marker>) -> Self {
        BindingKey {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            qualifier: Qualifier::Marked(marker.into()),
        }
    }

    /// The contract's type name, as reported by `std::any::type_name`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The qualifier component.
    #[inline]
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// Rendered `name@marker` form used in error messages and observers.
    pub fn rendered(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_name, self.qualifier)
    }
}

impl PartialEq for BindingKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for BindingKey {}

impl Hash for BindingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn qualifier_splits_keys() {
        let a = BindingKey::of::<Widget>();
        let b = BindingKey::qualified::<Widget>("spare");
        assert_ne!(a, b);
        assert_eq!(b, BindingKey::qualified::<Widget>(" spare "));
    }

    #[test]
    fn display_includes_marker() {
        let key = BindingKey::qualified::<Widget>("spare");
        assert!(key.to_string().ends_with("Widget@spare"));
    }
}
