//! Engine configuration.
//!
//! Every recognized option is a named field; anything else is rejected when
//! parsing from JSON.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::I18nError;

/// Options for building an [`I18n`](crate::engine::I18n) engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct I18nConfig {
    /// Locales to preload. The first one becomes the default locale.
    pub locales: Option<Vec<String>>,
    /// Locale used when nothing else applies.
    pub default_locale: String,
    /// Dictionary file suffix, including the dot.
    pub extension: String,
    /// Directory holding the dictionary files.
    pub directory: PathBuf,
    /// Cookie consulted by `set_locale_from_cookie`.
    pub cookie_name: String,
    /// Bypass the shared cache and emit diagnostics.
    pub dev_mode: bool,
    /// Apply the host's leading label as a locale at construction.
    pub subdomain: bool,
    /// Apply the `lang` query parameter at construction.
    pub query: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: None,
            default_locale: "en".into(),
            extension: ".json".into(),
            directory: PathBuf::from("./locales"),
            cookie_name: "lang".into(),
            dev_mode: false,
            subdomain: false,
            query: true,
        }
    }
}

impl I18nConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration object and validate it.
    ///
    /// # Errors
    ///
    /// [`I18nError::InvalidConfig`] for malformed JSON, unknown keys, or
    /// values rejected by [`validate`](Self::validate).
    pub fn from_json(text: &str) -> Result<Self, I18nError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| I18nError::invalid_config("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// [`I18nError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), I18nError> {
        if self.default_locale.trim().is_empty() {
            return Err(I18nError::invalid_config(
                "defaultLocale",
                "must not be empty",
            ));
        }
        if self.extension.is_empty() {
            return Err(I18nError::invalid_config("extension", "must not be empty"));
        }
        if self.cookie_name.is_empty() {
            return Err(I18nError::invalid_config("cookieName", "must not be empty"));
        }
        if let Some(locales) = &self.locales
            && locales.iter().any(|l| l.trim().is_empty())
        {
            return Err(I18nError::invalid_config(
                "locales",
                "locale identifiers must not be empty",
            ));
        }
        Ok(())
    }

    /// The preload list, if one is configured and non-empty.
    #[must_use]
    pub fn preload(&self) -> Option<&[String]> {
        self.locales.as_deref().filter(|l| !l.is_empty())
    }

    #[must_use]
    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    #[must_use]
    pub fn with_subdomain(mut self, subdomain: bool) -> Self {
        self.subdomain = subdomain;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: bool) -> Self {
        self.query = query;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = I18nConfig::default();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.cookie_name, "lang");
        assert_eq!(config.extension, ".json");
        assert!(config.query);
        assert!(!config.subdomain);
        assert!(!config.dev_mode);
        assert!(config.preload().is_none());
    }

    #[test]
    fn from_json_camel_case() {
        let config = I18nConfig::from_json(
            r#"{
                "locales": ["en", "de"],
                "directory": "cloud/locales",
                "cookieName": "locale",
                "devMode": true,
                "subdomain": true,
                "query": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.preload(), Some(&["en".to_string(), "de".to_string()][..]));
        assert_eq!(config.directory, PathBuf::from("cloud/locales"));
        assert_eq!(config.cookie_name, "locale");
        assert!(config.dev_mode && config.subdomain && !config.query);
        assert_eq!(config.extension, ".json");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = I18nConfig::from_json(r#"{ "register": {} }"#).unwrap_err();
        assert!(matches!(err, I18nError::InvalidConfig { field: "config", .. }));
        assert!(err.to_string().contains("register"));
    }

    #[test]
    fn empty_values_rejected() {
        let err = I18nConfig::from_json(r#"{ "cookieName": "" }"#).unwrap_err();
        assert!(matches!(err, I18nError::InvalidConfig { field: "cookieName", .. }));

        let err = I18nConfig::new().with_default_locale(" ").validate().unwrap_err();
        assert!(matches!(err, I18nError::InvalidConfig { field: "defaultLocale", .. }));

        let err = I18nConfig::new().with_locales(["en", ""]).validate().unwrap_err();
        assert!(matches!(err, I18nError::InvalidConfig { field: "locales", .. }));
    }

    #[test]
    fn empty_locale_list_is_no_preload() {
        let config = I18nConfig::new().with_locales(Vec::<String>::new());
        assert!(config.validate().is_ok());
        assert!(config.preload().is_none());
    }
}
