//! Glyph path cache — LRU over extracted outline path data.
//!
//! Outlines are stored in font units, so one entry serves every font size;
//! keys are glyph ids alone, which is sound only because the system holds a
//! single active font for the process lifetime. Glyphs without an outline
//! (whitespace) are cached as `None` so they are not re-extracted either.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

/// Cached outline for one glyph: path data in font units, or `None` for
/// glyphs with no outline.
pub type CachedPath = Option<Arc<str>>;

/// LRU cache of glyph id → SVG path data.
pub struct PathCache {
    lru: LruCache<u16, CachedPath>,
    hits: u64,
    misses: u64,
}

impl PathCache {
    /// Default capacity: comfortably more glyphs than any sample document.
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            lru: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a glyph. Outer `None` means "not cached"; the inner value is
    /// the cached extraction result.
    pub fn get(&mut self, glyph: u16) -> Option<CachedPath> {
        match self.lru.get(&glyph) {
            Some(path) => {
                self.hits += 1;
                Some(path.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, glyph: u16, path: CachedPath) {
        self.lru.put(glyph, path);
    }

    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.lru.clear();
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

// ===================================================================
// Tests
// ===================================================================
