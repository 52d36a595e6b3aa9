#![forbid(unsafe_code)]

//! Per-request locale resolution and message translation.
//!
//! An [`I18n`] engine is built once per request (or session). It preloads
//! the configured locale dictionaries through a process-wide
//! [`LocaleCache`], picks the active locale from request signals (subdomain,
//! `lang` query parameter, cookie) and translates message keys with
//! positional substitution and singular/other pluralization.

pub mod binding;
pub mod cache;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod format;
pub mod request;
pub mod source;
pub mod store;

pub use binding::{Binder, HELPER_NAMES, Helpers};
pub use cache::LocaleCache;
pub use config::I18nConfig;
pub use dictionary::{Dictionary, Entry, PluralForms};
pub use engine::{I18n, I18nBuilder};
pub use error::I18nError;
pub use format::{Arg, vsprintf};
pub use request::{Request, RequestSignals};
pub use source::{FileSource, LocaleSource, MemorySource};
pub use store::TranslationStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
