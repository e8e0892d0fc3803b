//! Thread-local resolution chain tracking for cycle detection.

use std::cell::RefCell;

use crate::error::{ContainerError, ContainerResult};
use crate::key::BindingKey;

/// Maximum resolution depth before aborting.
pub(crate) const MAX_DEPTH: usize = 1024;

thread_local! {
    /// Keys currently resolving on this thread, outermost first.
    ///
    /// The chain is per-thread, so independent concurrent resolutions of the
    /// same key never observe each other as a cycle.
    static CHAIN: RefCell<Vec<BindingKey>> = RefCell::new(Vec::new());
}

/// RAII marker placing one key on the current resolution chain.
///
/// The key stays on the chain for the guard's lifetime and is popped on drop,
/// including along error paths, so a failed construction leaves no stale
/// RESOLVING marker behind.
pub(crate) struct ChainGuard {
    _private: (),
}

impl ChainGuard {
    /// Pushes `key` onto this thread's chain.
    ///
    /// Fails with `Circular` (carrying the full rendered path) when the key
    /// is already on the chain, and with `DepthExceeded` past [`MAX_DEPTH`].
    pub(crate) fn push(key: &BindingKey) -> ContainerResult<ChainGuard> {
        CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();
            if chain.len() >= MAX_DEPTH {
                return Err(ContainerError::DepthExceeded(chain.len()));
            }
            if chain.iter().any(|k| k == key) {
                let mut path: Vec<String> = chain.iter().map(|k| k.rendered()).collect();
                path.push(key.rendered());
                return Err(ContainerError::Circular(path));
            }
            chain.push(key.clone());
            Ok(ChainGuard { _private: () })
        })
    }
}

impl Drop for ChainGuard {
    fn drop(&mut self) {
        CHAIN.with(|chain| {
            chain.borrow_mut().pop();
        });
    }
}
