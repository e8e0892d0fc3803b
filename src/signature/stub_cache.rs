//! Content-hash cache for generated stub text.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use crate::error::ContainerResult;

use super::{RenderOptions, SignatureDescriptor, SignatureRenderer};

/// Hash of a rendered stub's full text.
///
/// Two requests whose descriptors render to the same text always produce
/// the same hash, which is what allows the cache to hand back one shared
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(u64);

impl ContentHash {
    /// Hashes rendered text.
    pub fn of(text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        ContentHash(hasher.finish())
    }

    /// The raw hash value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Cache of generated stub surfaces, keyed by content hash.
///
/// A surface is rendered once per distinct signature set; repeated requests
/// for the same descriptor and options return the same shared `Arc<str>`
/// without re-rendering storage. Safe to share across resolver threads.
///
/// # Examples
///
/// ```rust
/// use bindery::signature::{
///     FieldSignature, RenderOptions, SignatureDescriptor, StubCache, TypeRef,
/// };
/// use std::sync::Arc;
///
/// let cache = StubCache::new();
/// let descriptor = SignatureDescriptor::new("Session")
///     .field(FieldSignature::new("id", TypeRef::named("u64")));
///
/// let (first_hash, first) = cache.surface(&descriptor, RenderOptions::default())?;
/// let (second_hash, second) = cache.surface(&descriptor, RenderOptions::default())?;
///
/// assert_eq!(first_hash, second_hash);
/// assert!(Arc::ptr_eq(&first, &second));
/// # Ok::<(), bindery::ContainerError>(())
/// ```
pub struct StubCache {
    renderer: SignatureRenderer,
    entries: Mutex<HashMap<ContentHash, Arc<str>>>,
}

impl StubCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            renderer: SignatureRenderer::new(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Renders the descriptor's surface, reusing the cached text when the
    /// rendering already exists.
    ///
    /// Returns the content hash together with the shared text. Rendering
    /// failures (opaque defaults) propagate without touching the cache.
    pub fn surface(
        &self,
        descriptor: &SignatureDescriptor,
        options: RenderOptions,
    ) -> ContainerResult<(ContentHash, Arc<str>)> {
        let rendered = self.renderer.surface(descriptor, options)?;
        let hash = ContentHash::of(&rendered);
        let mut entries = self.entries.lock().unwrap();
        let shared = entries
            .entry(hash)
            .or_insert_with(|| Arc::from(rendered.as_str()))
            .clone();
        Ok((hash, shared))
    }

    /// Number of distinct cached surfaces.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Default for StubCache {
    fn default() -> Self {
        Self::new()
    }
}
