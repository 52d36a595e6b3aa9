//! The per-request translation engine.
//!
//! # Invariants
//!
//! 1. **Never fails a lookup**: every translation call returns a string.
//!    Unknown locales fall back to the default locale, unknown keys are
//!    auto-registered with the caller's literal text, and an absent key
//!    yields `""`.
//!
//! 2. **Write-once keys**: a key present in a locale's dictionary is never
//!    removed or replaced, neither by later lookups nor by a later load of
//!    the same locale.
//!
//! 3. **Later signals win**: subdomain, then query, are applied in that
//!    order at construction; each override replaces the active locale.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing dictionary file | Source read error | Logged, locale stays unloaded |
//! | Malformed dictionary | Source parse error | Logged, locale stays unloaded |
//! | Default locale unloaded | Bad configuration | Logged, keys translate to themselves |
//! | Missing key | Not in dictionary | Auto-registered (dev mode: warned) |
//! | Unknown locale signal | Not a loaded locale | Ignored |

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cache::LocaleCache;
use crate::config::I18nConfig;
use crate::dictionary::Entry;
use crate::error::I18nError;
use crate::format::{Arg, vsprintf};
use crate::request::{
    ACCEPT_LANGUAGE_HEADER, HOST_HEADER, LANG_QUERY, Request, RequestSignals,
    accept_language_tags, host_label, primary_subtag,
};
use crate::source::{self, FileSource, LocaleSource};
use crate::store::{TranslationStore, locale_key};

/// Translation engine for one request or session.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lingo_i18n::{I18n, I18nConfig, LocaleCache, MemorySource, Request, args};
///
/// let source = MemorySource::new()
///     .with_json("locales/en.json", r#"{ "Hello %s": "Hello %s" }"#).unwrap()
///     .with_json("locales/de.json", r#"{
///         "Hello %s": "Hallo %s",
///         "%s cat": { "one": "%s Katze", "other": "%s Katzen" }
///     }"#).unwrap();
///
/// let request = Request::new().with_query("lang", "DE");
/// let mut i18n = I18n::builder(I18nConfig::new().with_locales(["en", "de"]))
///     .cache(LocaleCache::shared())
///     .source(Arc::new(source))
///     .request(&request)
///     .build();
///
/// assert_eq!(i18n.get_locale(), "de");
/// assert_eq!(i18n.translate_simple("Hello %s", &args!["Welt"]), "Hallo Welt");
/// assert_eq!(i18n.translate_plural("%s cat", "%s cats", 3, &[]), "3 Katzen");
/// ```
pub struct I18n {
    config: I18nConfig,
    store: TranslationStore,
    cache: Arc<LocaleCache>,
    source: Arc<dyn LocaleSource>,
    locale: String,
    request: Option<Request>,
    preferred: Option<String>,
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("locale", &self.locale)
            .field("default_locale", &self.config.default_locale)
            .field("locales", &self.store.locales())
            .field("preferred", &self.preferred)
            .field("dev_mode", &self.config.dev_mode)
            .finish_non_exhaustive()
    }
}

/// Collects the collaborators of an [`I18n`] before construction.
pub struct I18nBuilder<'r> {
    config: I18nConfig,
    cache: Option<Arc<LocaleCache>>,
    source: Option<Arc<dyn LocaleSource>>,
    request: Option<&'r dyn RequestSignals>,
}

impl<'r> I18nBuilder<'r> {
    /// Share `cache` with other engines. Defaults to a private cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<LocaleCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Load dictionaries from `source`. Defaults to [`FileSource`].
    #[must_use]
    pub fn source(mut self, source: Arc<dyn LocaleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Resolve the active locale from `request`.
    #[must_use]
    pub fn request(mut self, request: &'r dyn RequestSignals) -> Self {
        self.request = Some(request);
        self
    }

    /// Load the configured locales and resolve the active locale.
    ///
    /// Problems are logged, never returned: a misconfigured engine still
    /// translates, falling back to the keys themselves.
    #[must_use]
    pub fn build(self) -> I18n {
        let Self {
            mut config,
            cache,
            source,
            request,
        } = self;

        let preload = config.preload().map(<[String]>::to_vec).unwrap_or_default();
        if let Some(first) = preload.first() {
            config.default_locale.clone_from(first);
        }
        config.default_locale = locale_key(&config.default_locale);

        let mut i18n = I18n {
            locale: config.default_locale.clone(),
            config,
            store: TranslationStore::new(),
            cache: cache.unwrap_or_else(LocaleCache::shared),
            source: source.unwrap_or_else(|| Arc::new(FileSource)),
            request: None,
            preferred: None,
        };

        for locale in &preload {
            // Already logged by load_locale.
            let _ = i18n.load_locale(locale);
        }

        let default_locale = i18n.config.default_locale.clone();
        i18n.set_locale(Some(&default_locale));
        if !i18n.store.contains(&default_locale) {
            let err = I18nError::Configuration(format!(
                "not a valid default locale: {default_locale}"
            ));
            error!(locale = %default_locale, "{err}");
        }

        if let Some(request) = request {
            i18n.request = Some(Request::capture(request, &i18n.config.cookie_name));
            if i18n.config.subdomain {
                i18n.set_locale_from_subdomain(Some(request));
            }
            if i18n.config.query {
                i18n.set_locale_from_query(Some(request));
            }
            i18n.preferred = i18n.preferred_locale(Some(request));
        }

        i18n
    }
}

impl I18n {
    /// Start building an engine from `config`.
    #[must_use]
    pub fn builder<'r>(config: I18nConfig) -> I18nBuilder<'r> {
        I18nBuilder {
            config,
            cache: None,
            source: None,
            request: None,
        }
    }

    /// Build an engine with a private cache, reading from the filesystem.
    #[must_use]
    pub fn new(config: I18nConfig) -> Self {
        Self::builder(config).build()
    }

    // -----------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------

    /// Load the dictionary for `locale` unless one is already present.
    ///
    /// Outside development mode the shared cache is consulted first and
    /// populated after a successful read.
    ///
    /// # Errors
    ///
    /// The source's read or parse error. It is also logged, and `locale`
    /// stays unloaded.
    pub fn load_locale(&mut self, locale: &str) -> Result<(), I18nError> {
        let result = self.try_load_locale(locale);
        if let Err(err) = &result {
            error!(locale, "{err}");
        }
        result
    }

    fn try_load_locale(&mut self, locale: &str) -> Result<(), I18nError> {
        if self.store.contains(locale) {
            return Ok(());
        }

        let location = source::locate(&self.config.directory, locale, &self.config.extension);
        let dev_mode = self.config.dev_mode;

        if !dev_mode && let Some(cached) = self.cache.get(&location) {
            debug!(locale, location = %location.display(), "locale cache hit");
            self.store.init(locale, cached);
            return Ok(());
        }

        let dictionary = Arc::new(self.source.load(&location)?);
        self.store.init(locale, Arc::clone(&dictionary));
        if !dev_mode {
            self.cache.put(&location, dictionary);
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------

    /// Resolve `singular` in `locale`.
    ///
    /// An absent `singular` yields an empty string. An absent or unknown
    /// `locale` uses the default locale, starting an empty dictionary for
    /// it if needed. A missing key is registered with the literal text:
    /// `singular`, or `{one: singular, other: plural}` if `plural` is given.
    pub fn translate(
        &mut self,
        locale: Option<&str>,
        singular: Option<&str>,
        plural: Option<&str>,
    ) -> Entry {
        let Some(singular) = singular else {
            return Entry::Simple(String::new());
        };
        let dev_mode = self.config.dev_mode;

        let locale = match locale {
            Some(locale) if self.store.contains(locale) => locale.to_owned(),
            _ => {
                let fallback = self.config.default_locale.clone();
                if dev_mode {
                    warn!(
                        requested = locale.unwrap_or_default(),
                        locale = %fallback,
                        "no locale found, using the default as current locale"
                    );
                }
                self.store.ensure(&fallback);
                fallback
            }
        };

        if let Some(entry) = self.store.get(&locale).and_then(|d| d.get(singular)) {
            return entry.clone();
        }

        let (entry, _) = self.store.ensure(&locale).get_or_register(singular, plural);
        if dev_mode {
            warn!(
                key = singular,
                locale = %locale,
                "key not found, using the key as translation"
            );
        }
        entry.clone()
    }

    /// Translate `key` in the active locale, then substitute `args`.
    ///
    /// With no arguments the resolved string is returned untouched, so
    /// literal `%` signs survive.
    pub fn translate_simple(&mut self, key: &str, args: &[Arg]) -> String {
        let locale = self.locale.clone();
        let entry = self.translate(Some(&locale), Some(key), None);
        let message = entry.as_simple();
        if args.is_empty() {
            message.to_owned()
        } else {
            vsprintf(message, args)
        }
    }

    /// Translate a count-driven message in the active locale.
    ///
    /// The `other` form is chosen when the integer value of `count` is
    /// greater than one; zero, one, negatives and non-numbers choose `one`.
    /// `count` is substituted first, then any further `args`.
    pub fn translate_plural(
        &mut self,
        singular: &str,
        plural: &str,
        count: impl Into<Arg>,
        args: &[Arg],
    ) -> String {
        let count = count.into();
        let locale = self.locale.clone();
        let entry = self.translate(Some(&locale), Some(singular), Some(plural));

        let many = count.to_int().is_some_and(|n| n > 1);
        let message = vsprintf(entry.select(many), std::slice::from_ref(&count));
        if args.is_empty() {
            message
        } else {
            vsprintf(&message, args)
        }
    }

    // -----------------------------------------------------------------
    // Locale resolution
    // -----------------------------------------------------------------

    /// Make `locale` active, or the default locale if it is unknown.
    ///
    /// `None` leaves the active locale unchanged. Returns the active locale.
    pub fn set_locale(&mut self, locale: Option<&str>) -> &str {
        let Some(locale) = locale else {
            return &self.locale;
        };

        self.locale = if self.store.contains(locale) {
            locale.to_owned()
        } else {
            if self.config.dev_mode {
                warn!(locale, "locale not found");
            }
            self.config.default_locale.clone()
        };
        &self.locale
    }

    /// The active locale.
    #[must_use]
    pub fn get_locale(&self) -> &str {
        &self.locale
    }

    /// Whether the active locale is the client's top preference.
    ///
    /// True when no preference was computed.
    #[must_use]
    pub fn is_preferred_locale(&self) -> bool {
        self.preferred
            .as_deref()
            .is_none_or(|preferred| preferred.eq_ignore_ascii_case(&self.locale))
    }

    /// Apply the `lang` query parameter if it names a known locale.
    ///
    /// `None` reads the request the engine was built with. Returns whether
    /// the active locale was overridden.
    pub fn set_locale_from_query(&mut self, request: Option<&dyn RequestSignals>) -> bool {
        let candidate = self.signal(request, |r| {
            r.query(LANG_QUERY)
                .filter(|lang| !lang.is_empty())
                .map(str::to_lowercase)
        });
        self.apply_candidate(candidate, "query")
    }

    /// Apply the host's leading label if it names a known locale.
    pub fn set_locale_from_subdomain(&mut self, request: Option<&dyn RequestSignals>) -> bool {
        let candidate = self.signal(request, |r| r.header(HOST_HEADER).and_then(host_label));
        self.apply_candidate(candidate, "host")
    }

    /// Apply the configured cookie if it names a known locale.
    ///
    /// Never applied automatically at construction.
    pub fn set_locale_from_cookie(&mut self, request: Option<&dyn RequestSignals>) -> bool {
        let name = self.config.cookie_name.clone();
        let candidate = self.signal(request, |r| {
            r.cookie(&name)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase)
        });
        self.apply_candidate(candidate, "cookie")
    }

    /// The known locale the client's Accept-Language header prefers.
    ///
    /// Tags are scanned in header order; the first tag that is a known
    /// locale, or whose primary subtag is, wins. Falls back to the default
    /// locale, or `None` when there is no request at all. Does not change
    /// the active locale.
    #[must_use]
    pub fn preferred_locale(&self, request: Option<&dyn RequestSignals>) -> Option<String> {
        let header = self.signal(request, |r| {
            Some(r.header(ACCEPT_LANGUAGE_HEADER).unwrap_or_default().to_owned())
        })?;

        let preferred = accept_language_tags(&header).into_iter().find_map(|tag| {
            if self.store.contains(tag) {
                Some(locale_key(tag))
            } else {
                primary_subtag(tag)
                    .filter(|primary| self.store.contains(primary))
                    .map(locale_key)
            }
        });
        Some(preferred.unwrap_or_else(|| self.config.default_locale.clone()))
    }

    /// Preference computed at construction, if a request was supplied.
    #[must_use]
    pub fn preferred(&self) -> Option<&str> {
        self.preferred.as_deref()
    }

    /// Read a signal from `request`, or from the construction request.
    fn signal<F>(&self, request: Option<&dyn RequestSignals>, read: F) -> Option<String>
    where
        F: Fn(&dyn RequestSignals) -> Option<String>,
    {
        match request {
            Some(request) => read(request),
            None => self
                .request
                .as_ref()
                .and_then(|request| read(request as &dyn RequestSignals)),
        }
    }

    fn apply_candidate(&mut self, candidate: Option<String>, signal: &'static str) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        if !self.store.contains(&candidate) {
            return false;
        }
        if self.config.dev_mode {
            debug!(locale = %candidate, signal, "overriding locale from request");
        }
        self.set_locale(Some(&candidate));
        true
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// The effective default locale.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    /// Locales with a dictionary, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.store.locales()
    }

    #[must_use]
    pub fn is_dev_mode(&self) -> bool {
        self.config.dev_mode
    }

    #[must_use]
    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// The dictionaries this engine has loaded or started.
    #[must_use]
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::dictionary::PluralForms;
    use crate::source::MemorySource;
    use tracing_test::traced_test;

    fn source() -> Arc<MemorySource> {
        let source = MemorySource::new()
            .with_json(
                "locales/en.json",
                r#"{ "Hello": "Hello", "%s cat": { "one": "%s cat", "other": "%s cats" } }"#,
            )
            .and_then(|s| {
                s.with_json(
                    "locales/de.json",
                    r#"{
                        "Hello": "Hallo",
                        "Hello %s, how are you today?": "Hallo %s, wie geht es dir heute?",
                        "%s cat": { "one": "%s Katze", "other": "%s Katzen" }
                    }"#,
                )
            })
            .unwrap();
        Arc::new(source)
    }

    fn engine(config: I18nConfig) -> I18n {
        I18n::builder(config)
            .source(source())
            .cache(LocaleCache::shared())
            .build()
    }

    fn en_de() -> I18nConfig {
        I18nConfig::new().with_locales(["en", "de"])
    }

    #[test]
    fn first_configured_locale_is_default() {
        let i18n = engine(en_de().with_default_locale("fr"));
        assert_eq!(i18n.default_locale(), "en");
        assert_eq!(i18n.get_locale(), "en");
        assert_eq!(i18n.locales(), vec!["de", "en"]);
    }

    #[test]
    fn explicit_default_without_list() {
        let mut i18n = engine(I18nConfig::new().with_default_locale("de"));
        // Nothing preloaded: the default locale starts empty on first use.
        assert!(i18n.locales().is_empty());
        assert_eq!(i18n.translate_simple("Hello", &[]), "Hello");
        assert_eq!(i18n.locales(), vec!["de"]);
    }

    #[traced_test]
    #[test]
    fn unloadable_default_is_reported() {
        let i18n = engine(I18nConfig::new().with_locales(["xx"]));
        assert!(logs_contain("not a valid default locale"));
        assert!(logs_contain("no such dictionary"));
        assert_eq!(i18n.get_locale(), "xx");
    }

    #[test]
    fn absent_key_is_empty() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.translate(Some("de"), None, None), Entry::Simple(String::new()));
        assert_eq!(i18n.translate(None, None, Some("x")), Entry::Simple(String::new()));
    }

    #[test]
    fn translate_known_key() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.translate(Some("de"), Some("Hello"), None), Entry::from("Hallo"));
        assert_eq!(i18n.translate(Some("DE"), Some("Hello"), None), Entry::from("Hallo"));
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.translate(Some("fr"), Some("Hello"), None), Entry::from("Hello"));
        assert_eq!(i18n.translate(None, Some("Hello"), None), Entry::from("Hello"));
        assert!(!i18n.store().contains("fr"));
    }

    #[test]
    fn missing_key_is_registered() {
        let mut i18n = engine(en_de());
        assert_eq!(
            i18n.translate(Some("de"), Some("Goodbye"), None),
            Entry::from("Goodbye")
        );
        assert!(i18n.store().get("de").unwrap().contains_key("Goodbye"));

        assert_eq!(
            i18n.translate(Some("de"), Some("%s dog"), Some("%s dogs")),
            Entry::Plural(PluralForms::new("%s dog", "%s dogs"))
        );
    }

    #[test]
    fn registration_is_idempotent() {
        let mut i18n = engine(en_de());
        let first = i18n.translate(Some("de"), Some("New"), Some("News"));
        let second = i18n.translate(Some("de"), Some("New"), None);
        assert_eq!(first, second);
    }

    #[test]
    fn registered_key_survives_reload() {
        let mut i18n = engine(I18nConfig::new().with_default_locale("de"));
        i18n.translate(Some("de"), Some("Hello"), None);
        assert!(i18n.load_locale("de").is_ok());
        assert_eq!(i18n.translate(Some("de"), Some("Hello"), None), Entry::from("Hello"));
    }

    #[traced_test]
    #[test]
    fn dev_mode_warns_on_missing_key() {
        let mut i18n = engine(en_de().with_dev_mode(true));
        i18n.translate_simple("Nope", &[]);
        assert!(logs_contain("key not found"));
    }

    #[traced_test]
    #[test]
    fn missing_key_is_silent_outside_dev_mode() {
        let mut i18n = engine(en_de());
        i18n.translate_simple("Nope", &[]);
        assert!(!logs_contain("key not found"));
    }

    #[test]
    fn simple_with_args() {
        let mut i18n = engine(en_de());
        i18n.set_locale(Some("de"));
        assert_eq!(
            i18n.translate_simple("Hello %s, how are you today?", &args!["Marcus"]),
            "Hallo Marcus, wie geht es dir heute?"
        );
    }

    #[test]
    fn simple_without_args_keeps_placeholders() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.translate_simple("100%% %s", &[]), "100%% %s");
    }

    #[test]
    fn plural_selection() {
        let mut i18n = engine(en_de());
        i18n.set_locale(Some("de"));
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", 1, &[]), "1 Katze");
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", 0, &[]), "0 Katze");
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", 2, &[]), "2 Katzen");
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", "3", &[]), "3 Katzen");
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", "abc", &[]), "abc Katze");
        assert_eq!(i18n.translate_plural("%s cat", "%s cats", 1.9, &[]), "1.9 Katze");
    }

    #[test]
    fn plural_registers_missing_pair() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.translate_plural("%d bird", "%d birds", 5, &[]), "5 birds");
        assert_eq!(i18n.translate_plural("%d bird", "%d birds", 1, &[]), "1 bird");
    }

    #[test]
    fn plural_second_pass_args() {
        let mut i18n = engine(en_de());
        assert_eq!(
            i18n.translate_plural("%s file in %%s", "%s files in %%s", 4, &args!["/tmp"]),
            "4 files in /tmp"
        );
    }

    #[test]
    fn plural_on_simple_entry_renders_string() {
        let mut i18n = engine(en_de());
        i18n.set_locale(Some("de"));
        assert_eq!(i18n.translate_plural("Hello", "Hellos", 3, &[]), "Hallo");
    }

    #[test]
    fn oversized_precision_in_dictionary_is_literal() {
        let source = MemorySource::new()
            .with_json(
                "locales/en.json",
                r#"{
                    "total": "Total: %.70000f",
                    "%s unit": { "one": "%.70000e unit", "other": "%.70000e units" }
                }"#,
            )
            .unwrap();
        let mut i18n = I18n::builder(I18nConfig::new().with_locales(["en"]))
            .source(Arc::new(source))
            .cache(LocaleCache::shared())
            .build();

        assert_eq!(i18n.translate_simple("total", &args![2.5]), "Total: %.70000f");
        assert_eq!(i18n.translate_plural("%s unit", "%s units", 3, &[]), "%.70000e units");
    }

    #[test]
    fn set_locale_unknown_uses_default() {
        let mut i18n = engine(en_de());
        assert_eq!(i18n.set_locale(Some("de")), "de");
        assert_eq!(i18n.set_locale(None), "de");
        assert_eq!(i18n.set_locale(Some("fr")), "en");
    }

    #[traced_test]
    #[test]
    fn set_locale_unknown_warns_in_dev_mode() {
        let mut i18n = engine(en_de().with_dev_mode(true));
        i18n.set_locale(Some("fr"));
        assert!(logs_contain("locale not found"));
    }

    #[test]
    fn query_override() {
        let request = Request::new().with_query("lang", "DE");
        let i18n = I18n::builder(en_de()).source(source()).request(&request).build();
        assert_eq!(i18n.get_locale(), "de");
    }

    #[test]
    fn unknown_query_ignored() {
        let request = Request::new().with_query("lang", "xx");
        let i18n = I18n::builder(en_de()).source(source()).request(&request).build();
        assert_eq!(i18n.get_locale(), "en");
    }

    #[test]
    fn query_can_be_disabled() {
        let request = Request::new().with_query("lang", "de");
        let i18n = I18n::builder(en_de().with_query(false))
            .source(source())
            .request(&request)
            .build();
        assert_eq!(i18n.get_locale(), "en");
    }

    #[test]
    fn subdomain_override_requires_flag() {
        let request = Request::new().with_header("host", "de.example.com");
        let off = I18n::builder(en_de()).source(source()).request(&request).build();
        assert_eq!(off.get_locale(), "en");

        let on = I18n::builder(en_de().with_subdomain(true))
            .source(source())
            .request(&request)
            .build();
        assert_eq!(on.get_locale(), "de");
    }

    #[test]
    fn query_beats_subdomain() {
        let request = Request::new()
            .with_header("host", "de.example.com")
            .with_query("lang", "en");
        let i18n = I18n::builder(I18nConfig::new().with_locales(["de", "en"]).with_subdomain(true))
            .source(source())
            .request(&request)
            .build();
        assert_eq!(i18n.get_locale(), "en");
    }

    #[test]
    fn cookie_only_on_request() {
        let request = Request::new().with_cookie("locale", "DE");
        let mut i18n = I18n::builder(en_de().with_cookie_name("locale"))
            .source(source())
            .request(&request)
            .build();
        assert_eq!(i18n.get_locale(), "en");

        assert!(i18n.set_locale_from_cookie(None));
        assert_eq!(i18n.get_locale(), "de");
    }

    #[test]
    fn cookie_from_explicit_request() {
        let mut i18n = engine(en_de());
        let request = Request::new().with_cookie("lang", "fr");
        assert!(!i18n.set_locale_from_cookie(Some(&request)));
        let request = Request::new().with_cookie("lang", "de");
        assert!(i18n.set_locale_from_cookie(Some(&request)));
        assert_eq!(i18n.get_locale(), "de");
    }

    #[test]
    fn signals_without_any_request() {
        let mut i18n = engine(en_de());
        assert!(!i18n.set_locale_from_query(None));
        assert!(!i18n.set_locale_from_subdomain(None));
        assert!(!i18n.set_locale_from_cookie(None));
        assert_eq!(i18n.preferred_locale(None), None);
        assert!(i18n.is_preferred_locale());
    }

    #[test]
    fn preferred_exact_then_primary() {
        let i18n = engine(en_de());
        let req = Request::new().with_header("accept-language", "fr-FR, de-AT;q=0.8, en;q=0.5");
        assert_eq!(i18n.preferred_locale(Some(&req)).as_deref(), Some("de"));

        let req = Request::new().with_header("accept-language", "en-GB,de;q=0.9");
        assert_eq!(i18n.preferred_locale(Some(&req)).as_deref(), Some("en"));

        let req = Request::new().with_header("accept-language", "DE");
        assert_eq!(i18n.preferred_locale(Some(&req)).as_deref(), Some("de"));
    }

    #[test]
    fn preferred_defaults_when_nothing_matches() {
        let i18n = engine(en_de());
        let req = Request::new().with_header("accept-language", "ja, zh-CN");
        assert_eq!(i18n.preferred_locale(Some(&req)).as_deref(), Some("en"));
        let req = Request::new();
        assert_eq!(i18n.preferred_locale(Some(&req)).as_deref(), Some("en"));
    }

    #[test]
    fn preferred_locale_is_advisory() {
        let request = Request::new().with_header("accept-language", "de");
        let mut i18n = I18n::builder(en_de()).source(source()).request(&request).build();
        assert_eq!(i18n.get_locale(), "en");
        assert_eq!(i18n.preferred(), Some("de"));
        assert!(!i18n.is_preferred_locale());

        i18n.set_locale(Some("de"));
        assert!(i18n.is_preferred_locale());
    }

    #[test]
    fn cache_is_reused_between_engines() {
        let cache = LocaleCache::shared();
        let source = source();
        let shared: Arc<dyn LocaleSource> = source.clone();

        let _a = I18n::builder(en_de()).cache(cache.clone()).source(shared.clone()).build();
        let _b = I18n::builder(en_de()).cache(cache.clone()).source(shared).build();
        assert_eq!(source.loads(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn dev_mode_bypasses_cache() {
        let cache = LocaleCache::shared();
        let source = source();
        let shared: Arc<dyn LocaleSource> = source.clone();
        let config = en_de().with_dev_mode(true);

        let _a = I18n::builder(config.clone()).cache(cache.clone()).source(shared.clone()).build();
        let _b = I18n::builder(config).cache(cache.clone()).source(shared).build();
        assert_eq!(source.loads(), 4);
        assert!(cache.is_empty());
    }

    #[test]
    fn registrations_do_not_leak_between_engines() {
        let cache = LocaleCache::shared();
        let shared: Arc<dyn LocaleSource> = source();

        let mut a = I18n::builder(en_de()).cache(cache.clone()).source(shared.clone()).build();
        a.translate_simple("Only in a", &[]);

        let b = I18n::builder(en_de()).cache(cache).source(shared).build();
        assert!(!b.store().get("en").unwrap().contains_key("Only in a"));
    }

    #[test]
    fn debug_output_names_locale() {
        let i18n = engine(en_de());
        assert!(format!("{i18n:?}").contains("locale: \"en\""));
    }
}
