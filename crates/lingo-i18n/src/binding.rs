//! Glue for web frameworks.
//!
//! A framework hook calls [`Binder::bind`] once per incoming request and
//! hands the resulting engine to its rendering layer through the
//! [`Helpers`] capability.

use std::sync::Arc;

use crate::cache::LocaleCache;
use crate::config::I18nConfig;
use crate::engine::I18n;
use crate::error::I18nError;
use crate::format::Arg;
use crate::request::RequestSignals;
use crate::source::{FileSource, LocaleSource};

/// Template-facing names of the [`Helpers`] operations, in trait order.
pub const HELPER_NAMES: [&str; 4] = ["__", "__n", "getLocale", "isPreferredLocale"];

/// The operations exposed to views and templates.
pub trait Helpers {
    /// `__`: translate a key and substitute positional arguments.
    fn translate_simple(&mut self, key: &str, args: &[Arg]) -> String;

    /// `__n`: translate a count-driven message.
    fn translate_plural(&mut self, singular: &str, plural: &str, count: Arg, args: &[Arg])
    -> String;

    /// `getLocale`: the active locale.
    fn get_locale(&self) -> &str;

    /// `isPreferredLocale`: whether the active locale matches the client's
    /// top preference.
    fn is_preferred_locale(&self) -> bool;
}

impl Helpers for I18n {
    fn translate_simple(&mut self, key: &str, args: &[Arg]) -> String {
        I18n::translate_simple(self, key, args)
    }

    fn translate_plural(
        &mut self,
        singular: &str,
        plural: &str,
        count: Arg,
        args: &[Arg],
    ) -> String {
        I18n::translate_plural(self, singular, plural, count, args)
    }

    fn get_locale(&self) -> &str {
        I18n::get_locale(self)
    }

    fn is_preferred_locale(&self) -> bool {
        I18n::is_preferred_locale(self)
    }
}

/// Builds one engine per request, all sharing one dictionary cache.
pub struct Binder {
    config: I18nConfig,
    cache: Arc<LocaleCache>,
    source: Arc<dyn LocaleSource>,
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Binder {
    /// Validate `config` and start a fresh shared cache.
    ///
    /// # Errors
    ///
    /// [`I18nError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: I18nConfig) -> Result<Self, I18nError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: LocaleCache::shared(),
            source: Arc::new(FileSource),
        })
    }

    /// Share an existing cache instead of the binder's own.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<LocaleCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Load dictionaries from `source` instead of the filesystem.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn LocaleSource>) -> Self {
        self.source = source;
        self
    }

    /// Engine for one incoming request.
    #[must_use]
    pub fn bind(&self, request: &dyn RequestSignals) -> I18n {
        I18n::builder(self.config.clone())
            .cache(Arc::clone(&self.cache))
            .source(Arc::clone(&self.source))
            .request(request)
            .build()
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<LocaleCache> {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &I18nConfig {
        &self.config
    }
}
