//! Where dictionaries come from.
//!
//! The engine only ever asks a [`LocaleSource`] for the dictionary at a
//! normalized location. [`FileSource`] reads JSON files from disk; tests and
//! embedders can supply their own implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dictionary::Dictionary;
use crate::error::I18nError;

/// Produces the dictionary stored at a location.
pub trait LocaleSource: Send + Sync {
    /// Load the dictionary at `location`.
    ///
    /// # Errors
    ///
    /// [`I18nError::SourceRead`] when the location cannot be read and
    /// [`I18nError::SourceParse`] when its content is not a dictionary.
    fn load(&self, location: &Path) -> Result<Dictionary, I18nError>;
}

/// Reads dictionaries as JSON objects from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl LocaleSource for FileSource {
    fn load(&self, location: &Path) -> Result<Dictionary, I18nError> {
        let bytes = fs::read(location).map_err(|e| I18nError::read(location, e))?;
        parse_dictionary(location, &bytes)
    }
}

/// Dictionaries held in memory, keyed by location.
///
/// Useful for dictionaries compiled into the binary. Counts how many loads
/// it has served so cache behavior can be observed.
#[derive(Debug, Default)]
pub struct MemorySource {
    dictionaries: HashMap<PathBuf, Dictionary>,
    loads: AtomicUsize,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dictionary` at `location` (normalized).
    #[must_use]
    pub fn with(mut self, location: impl AsRef<Path>, dictionary: Dictionary) -> Self {
        self.dictionaries.insert(normalize(location.as_ref()), dictionary);
        self
    }

    /// Register JSON `text` at `location`.
    ///
    /// # Errors
    ///
    /// [`I18nError::SourceParse`] if `text` is not a dictionary.
    pub fn with_json(self, location: impl AsRef<Path>, text: &str) -> Result<Self, I18nError> {
        let dictionary = parse_dictionary(location.as_ref(), text.as_bytes())?;
        Ok(self.with(location, dictionary))
    }

    /// Number of `load` calls served so far, including failed ones.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl LocaleSource for MemorySource {
    fn load(&self, location: &Path) -> Result<Dictionary, I18nError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.dictionaries
            .get(&normalize(location))
            .cloned()
            .ok_or_else(|| I18nError::read(location, "no such dictionary"))
    }
}

/// Parse JSON `bytes` read from `location` into a dictionary.
///
/// # Errors
///
/// [`I18nError::SourceParse`] if `bytes` is not UTF-8 JSON holding an object
/// whose values are strings or `{one, other}` string pairs.
pub fn parse_dictionary(location: &Path, bytes: &[u8]) -> Result<Dictionary, I18nError> {
    serde_json::from_slice(bytes).map_err(|e| I18nError::parse(location, e))
}

/// Dictionary location for `locale`: `directory/<locale><extension>`,
/// lexically normalized.
#[must_use]
pub fn locate(directory: &Path, locale: &str, extension: &str) -> PathBuf {
    normalize(&directory.join(format!("{locale}{extension}")))
}

/// Lexical path normalization without touching the filesystem.
///
/// Drops `.` segments and repeated separators, and resolves `..` against a
/// preceding normal segment. A `..` with nothing to pop is kept unless it
/// would climb above the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
