//! Per-locale translation dictionaries.
//!
//! A dictionary maps a translation key to either a plain string or a
//! `{one, other}` pair. Keys are only ever added: by loading from a
//! [`LocaleSource`](crate::source::LocaleSource) or by auto-registration on a
//! lookup miss. Nothing removes or rewrites an existing key.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::Deserialize;

/// Singular/other forms for count-driven messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluralForms {
    /// Used when the count is not greater than one.
    pub one: String,
    /// Used when the count is greater than one.
    pub other: String,
}

impl PluralForms {
    #[must_use]
    pub fn new(one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            other: other.into(),
        }
    }

    /// Pick the form for a count comparison outcome.
    #[must_use]
    pub fn select(&self, many: bool) -> &str {
        if many { &self.other } else { &self.one }
    }
}

/// A single dictionary value: either a simple string or plural forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// A simple, non-pluralized string.
    Simple(String),
    /// Count-driven forms.
    Plural(PluralForms),
}

impl Entry {
    /// The string used when this entry is rendered without a count.
    ///
    /// Plural entries render their `other` form.
    #[must_use]
    pub fn as_simple(&self) -> &str {
        match self {
            Self::Simple(s) => s,
            Self::Plural(forms) => &forms.other,
        }
    }

    /// The string used for a count comparison outcome.
    ///
    /// Simple entries render unchanged regardless of the count.
    #[must_use]
    pub fn select(&self, many: bool) -> &str {
        match self {
            Self::Simple(s) => s,
            Self::Plural(forms) => forms.select(many),
        }
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Self::Simple(value.to_owned())
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Self::Simple(value)
    }
}

impl From<PluralForms> for Entry {
    fn from(value: PluralForms) -> Self {
        Self::Plural(value)
    }
}

/// Translation strings for a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: HashMap<String, Entry>,
}

impl Dictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a simple string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Entry::Simple(value.into()));
    }

    /// Insert plural forms.
    pub fn insert_plural(&mut self, key: impl Into<String>, forms: PluralForms) {
        self.entries.insert(key.into(), Entry::Plural(forms));
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the entry for `key`, inserting the caller's literal text first
    /// if the key is missing.
    ///
    /// The inserted value is `singular` itself, or `{one: singular, other:
    /// plural}` when a plural companion is given. The boolean is `true` when
    /// the key was newly registered.
    pub fn get_or_register(&mut self, singular: &str, plural: Option<&str>) -> (&Entry, bool) {
        match self.entries.entry(singular.to_owned()) {
            hash_map::Entry::Occupied(slot) => (slot.into_mut(), false),
            hash_map::Entry::Vacant(slot) => {
                let value = match plural {
                    Some(plural) => Entry::Plural(PluralForms::new(singular, plural)),
                    None => Entry::Simple(singular.to_owned()),
                };
                (slot.insert(value), true)
            }
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Entry>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
