//! Core traits for the dependency injection container.

mod construct;
mod dispose;
mod resolver;

pub use construct::{Construct, Implement};
pub use dispose::Dispose;
pub use resolver::{Resolver, ResolverCore};
