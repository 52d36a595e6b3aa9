//! Per-engine mapping from locale identifier to dictionary.
//!
//! Identifiers are compared case-insensitively: every key is lowercased on
//! the way in. Dictionaries adopted from the shared cache stay shared until
//! the first auto-registration, which clones them (`Arc::make_mut`).

use std::collections::HashMap;
use std::sync::Arc;

use crate::dictionary::Dictionary;

/// Dictionaries known to one engine instance.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    locales: HashMap<String, Arc<Dictionary>>,
}

/// Store key for a locale identifier.
#[must_use]
pub fn locale_key(locale: &str) -> String {
    locale.to_lowercase()
}

impl TranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a dictionary exists for `locale`.
    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.contains_key(&locale_key(locale))
    }

    /// Dictionary for `locale`, if present.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&Dictionary> {
        self.locales.get(&locale_key(locale)).map(Arc::as_ref)
    }

    /// Mutable dictionary for `locale`, detaching it from the shared cache
    /// copy if needed.
    pub fn get_mut(&mut self, locale: &str) -> Option<&mut Dictionary> {
        self.locales.get_mut(&locale_key(locale)).map(Arc::make_mut)
    }

    /// Adopt `dictionary` for `locale` unless one is already present.
    ///
    /// Returns `true` if the entry was populated by this call.
    pub fn init(&mut self, locale: &str, dictionary: Arc<Dictionary>) -> bool {
        let key = locale_key(locale);
        if self.locales.contains_key(&key) {
            return false;
        }
        self.locales.insert(key, dictionary);
        true
    }

    /// Make sure `locale` has a dictionary, starting an empty one if not.
    pub fn ensure(&mut self, locale: &str) -> &mut Dictionary {
        let dictionary = self.locales.entry(locale_key(locale)).or_default();
        Arc::make_mut(dictionary)
    }

    /// Known locale identifiers, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}
