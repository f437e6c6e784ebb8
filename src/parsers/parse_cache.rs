//! Content-addressed cache for compiled documents
//!
//! Every request re-analyses the full document text. Compiling a document
//! (parse, bind, check) dominates request latency, while consecutive requests
//! against the same text are the common case: a hover after a completion, or
//! the diagnostics pass that follows an edit.
//!
//! ## Cache Strategy
//!
//! - **Key**: blake3 hash of the document text
//! - **Value**: (content_string, compiled value) tuple for collision detection
//! - **Size**: configurable, 64 entries by default
//! - **Eviction**: drop ~10% of entries when full
//! - **Invalidation**: implicit; edited text hashes to a new key, so a cached
//!   answer is always identical to a fresh compile

use dashmap::DashMap;
use std::sync::Arc;

type ContentHash = [u8; 32];

/// Cache of values derived from document text.
///
/// Uses DashMap so concurrent requests on different documents never contend
/// on a single lock.
pub struct ParseCache<V> {
    /// Maps content hash -> (original content, value)
    cache: Arc<DashMap<ContentHash, (String, V)>>,

    /// Maximum number of cached entries
    max_size: usize,
}

impl<V: Clone> ParseCache<V> {
    /// Creates a new cache holding at most `max_size` entries (minimum 1).
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            cache: Arc::new(DashMap::with_capacity(max_size)),
            max_size,
        }
    }

    fn hash_content(content: &str) -> ContentHash {
        *blake3::hash(content.as_bytes()).as_bytes()
    }

    /// Returns the cached value for `content`, if present.
    ///
    /// The stored text is compared on every hit, so a hash collision is
    /// treated as a miss rather than returning another document's value.
    pub fn get(&self, content: &str) -> Option<V> {
        let hash = Self::hash_content(content);

        self.cache.get(&hash).and_then(|entry| {
            let (cached_content, value) = entry.value();
            (cached_content == content).then(|| value.clone())
        })
    }

    /// Stores a value for `content`, evicting ~10% of entries when full.
    pub fn insert(&self, content: String, value: V) {
        if self.cache.len() >= self.max_size {
            let to_remove = (self.max_size / 10).max(1);
            let mut removed = 0;

            // DashMap iteration order is undefined, so this is pseudo-random eviction
            self.cache.retain(|_, _| {
                if removed < to_remove {
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        }

        let hash = Self::hash_content(&content);
        self.cache.insert(hash, (content, value));
    }

    /// Returns the cached value or computes, stores and returns a new one.
    pub fn get_or_insert_with<F>(&self, content: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(content) {
            return value;
        }
        let value = compute();
        self.insert(content.to_string(), value.clone());
        value
    }

    /// Drops the entry for `content`, e.g. once no open document has it.
    pub fn invalidate(&self, content: &str) {
        let hash = Self::hash_content(content);
        self.cache.remove(&hash);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            capacity: self.max_size,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Maximum capacity
    pub capacity: usize,
}
