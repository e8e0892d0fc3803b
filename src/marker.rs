//! Qualifier markers for disambiguating multiple bindings of one contract.

use std::fmt;
use std::sync::Arc;

/// Immutable qualifier label
///
/// A `Marker` disambiguates multiple bindings of the same contract. The raw
/// label is normalized by trimming surrounding whitespace at construction;
/// two markers are interchangeable iff their normalized labels are equal.
/// Comparison is case-sensitive. Cloning is cheap (shared `Arc<str>`).
///
/// # Examples
///
/// ```rust
/// use bindery::Marker;
///
/// let a = Marker::new("primary");
/// let b = Marker::new("  primary  ");
/// let c = Marker::new("Primary");
///
/// assert_eq!(a, b); // whitespace trimmed
/// assert_ne!(a, c); // case-sensitive
/// assert_eq!(a.label(), "primary");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(Arc<str>);

impl Marker {
    /// Creates a marker from a raw label, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Self {
        Marker(Arc::from(label.as_ref().trim()))
    }

    /// Returns the normalized label.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({:?})", &*self.0)
    }
}

impl From<&str> for Marker {
    fn from(label: &str) -> Self {
        Marker::new(label)
    }
}

impl From<String> for Marker {
    fn from(label: String) -> Self {
        Marker::new(label)
    }
}

/// Qualifier position of a binding key
///
/// Every binding key carries a qualifier. The absence of a marker is itself a
/// distinct `Unqualified` value, so an unqualified binding and a marked
/// binding of the same contract never collide.
///
/// # Examples
///
/// ```rust
/// use bindery::{Marker, Qualifier};
///
/// let plain = Qualifier::Unqualified;
/// let named = Qualifier::Marked(Marker::new("replica"));
///
/// assert_ne!(plain, named);
/// assert_eq!(named.to_string(), "@replica");
/// assert_eq!(plain.to_string(), "");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Qualifier {
    /// No marker declared.
    Unqualified,
    /// Disambiguated by a normalized marker label.
    Marked(Marker),
}

impl Qualifier {
    /// Returns the marker, if one is present.
    pub fn marker(&self) -> Option<&Marker> {
        match self {
            Qualifier::Unqualified => None,
            Qualifier::Marked(m) => Some(m),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Unqualified => Ok(()),
            Qualifier::Marked(m) => write!(f, "@{}", m),
        }
    }
}

impl From<Marker> for Qualifier {
    fn from(marker: Marker) -> Self {
        Qualifier::Marked(marker)
    }
}
