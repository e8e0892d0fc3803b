//! Error types for the container.

use std::fmt;
use std::sync::Arc;

use crate::Scope;

/// Boxed error type carried by fallible providers and store backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Container errors
///
/// Represents the error conditions that can occur during binding
/// registration, bootstrap, resolution, rendering, or persistence.
///
/// Bootstrap-phase errors ([`Conflict`], [`FrozenRegistry`], any module build
/// failure) abort the entire bootstrap; no partially built container is ever
/// exposed. Resolution-phase errors are returned to the immediate caller and
/// never poison a key: a failed construction leaves its key eligible for
/// retry.
///
/// [`Conflict`]: ContainerError::Conflict
/// [`FrozenRegistry`]: ContainerError::FrozenRegistry
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, ContainerError, Resolver};
///
/// let container = ContainerBuilder::new().build()?;
/// match container.get::<String>() {
///     Err(ContainerError::Unbound(name)) => {
///         assert!(name.contains("String"));
///     }
///     _ => unreachable!(),
/// }
/// # Ok::<(), bindery::ContainerError>(())
/// ```
///
/// ```rust
/// use bindery::ContainerError;
///
/// let unbound = ContainerError::Unbound("app::Logger".to_string());
/// let circular = ContainerError::Circular(vec![
///     "app::A".to_string(),
///     "app::B".to_string(),
///     "app::A".to_string(),
/// ]);
///
/// // All errors implement Display
/// assert_eq!(unbound.to_string(), "No binding for app::Logger");
/// assert_eq!(circular.to_string(), "Circular dependency: app::A -> app::B -> app::A");
/// ```
#[derive(Debug, Clone)]
pub enum ContainerError {
    /// Duplicate (contract, qualifier) registration without an explicit
    /// override; declaring module names attached when known
    Conflict {
        /// Rendered binding key.
        key: String,
        /// Module that declared the existing binding, if any.
        first: Option<&'static str>,
        /// Module that declared the conflicting binding, if any.
        second: Option<&'static str>,
    },
    /// Registration attempted after `freeze()`
    FrozenRegistry,
    /// No binding for the requested contract/qualifier
    Unbound(String),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected within one resolution chain (includes path)
    Circular(Vec<String>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// Scope cannot be satisfied at the point of resolution
    /// (e.g., application-scoped resolve without a context)
    WrongScope {
        /// Rendered binding key.
        key: String,
        /// Declared scope of the binding.
        scope: Scope,
    },
    /// Provider or constructor failure, original cause attached
    Construction {
        /// Rendered binding key.
        key: String,
        /// The underlying failure, exposed via [`std::error::Error::source`].
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// Literal encoder given a value kind it cannot render
    UnrenderableLiteral(&'static str),
    /// Malformed payload text or custom decoder failure
    Payload(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Conflict { key, first: Some(first), second: Some(second) } => {
                write!(f, "Duplicate binding for {}: declared by {} and {}", key, first, second)
            }
            ContainerError::Conflict { key, .. } => {
                write!(f, "Duplicate binding for {}", key)
            }
            ContainerError::FrozenRegistry => write!(f, "Registry is frozen"),
            ContainerError::Unbound(key) => write!(f, "No binding for {}", key),
            ContainerError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            ContainerError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            ContainerError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            ContainerError::WrongScope { key, scope } => {
                write!(f, "Scope error: {} ({}) requires an application context", key, scope)
            }
            ContainerError::Construction { key, source } => {
                write!(f, "Construction of {} failed: {}", key, source)
            }
            ContainerError::UnrenderableLiteral(kind) => {
                write!(f, "Cannot render literal: {}", kind)
            }
            ContainerError::Payload(msg) => write!(f, "Payload error: {}", msg),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Construction { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Result type for container operations
///
/// A convenience alias for `Result<T, ContainerError>` used throughout the
/// crate.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerError, ContainerResult};
///
/// fn lookup() -> ContainerResult<String> {
///     Err(ContainerError::Unbound("app::Config".to_string()))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ContainerResult<T> = Result<T, ContainerError>;
