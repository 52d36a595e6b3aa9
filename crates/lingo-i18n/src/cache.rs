//! Process-wide dictionary cache keyed by normalized file location.
//!
//! # Invariants
//!
//! 1. **Write-once per location**: [`LocaleCache::put`] never replaces an
//!    existing entry. Concurrent first loads of the same location may both
//!    read the source, but only the first write is kept.
//!
//! 2. **Shared, never mutated in place**: entries are handed out as
//!    `Arc<Dictionary>`. Engines that auto-register keys copy on write, so
//!    per-request registrations never leak into the cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::dictionary::Dictionary;

/// Dictionaries loaded so far, shared by every engine built against it.
///
/// Construct one at process start and hand an `Arc<LocaleCache>` to each
/// engine. Tests can build a fresh one to isolate themselves.
#[derive(Debug, Default)]
pub struct LocaleCache {
    entries: RwLock<HashMap<PathBuf, Arc<Dictionary>>>,
}

impl LocaleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache ready to be shared.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Cached dictionary for `location`, if any.
    #[must_use]
    pub fn get(&self, location: &Path) -> Option<Arc<Dictionary>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
    }

    /// Store `dictionary` for `location` unless one is already cached.
    ///
    /// Returns `true` if this call populated the entry.
    pub fn put(&self, location: &Path, dictionary: Arc<Dictionary>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(location) {
            return false;
        }
        tracing::debug!(location = %location.display(), "caching locale dictionary");
        entries.insert(location.to_path_buf(), dictionary);
        true
    }

    /// Number of cached locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
