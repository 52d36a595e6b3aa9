//! Request-side locale signals.
//!
//! The engine never sees a concrete HTTP type. Anything that can answer
//! header, query and cookie lookups implements [`RequestSignals`]; the
//! parsers here are pure functions over the extracted strings.

use std::collections::HashMap;

/// Header carrying the request host.
pub const HOST_HEADER: &str = "host";
/// Header carrying the client's language preferences.
pub const ACCEPT_LANGUAGE_HEADER: &str = "accept-language";
/// Query parameter naming an explicit locale.
pub const LANG_QUERY: &str = "lang";

/// Read access to the parts of a request that can carry a locale.
pub trait RequestSignals {
    /// Header value by lowercase name.
    fn header(&self, name: &str) -> Option<&str>;
    /// Query parameter value.
    fn query(&self, name: &str) -> Option<&str>;
    /// Cookie value.
    fn cookie(&self, name: &str) -> Option<&str>;
}

/// Owned request signals.
///
/// Usable directly by callers without a web framework, and kept by the
/// engine as a snapshot of the request it was built for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the signals the engine consults from any request.
    #[must_use]
    pub fn capture(request: &dyn RequestSignals, cookie_name: &str) -> Self {
        let mut snapshot = Self::new();
        for name in [HOST_HEADER, ACCEPT_LANGUAGE_HEADER] {
            if let Some(value) = request.header(name) {
                snapshot = snapshot.with_header(name, value);
            }
        }
        if let Some(value) = request.query(LANG_QUERY) {
            snapshot = snapshot.with_query(LANG_QUERY, value);
        }
        if let Some(value) = request.cookie(cookie_name) {
            snapshot = snapshot.with_cookie(cookie_name, value);
        }
        snapshot
    }

    /// Set a header. Names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }
}

impl RequestSignals for Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Lowercased leading label of a host, up to the first `.`.
///
/// `"DE.example.com"` yields `"de"`. Empty hosts and hosts starting with a
/// dot yield `None`.
#[must_use]
pub fn host_label(host: &str) -> Option<String> {
    let label = host.split('.').next().unwrap_or_default();
    (!label.is_empty()).then(|| label.to_lowercase())
}

/// Language tags of an Accept-Language header, in header order.
///
/// A tag is the run of ASCII letters and hyphens at the start of each
/// comma-separated item, after optional whitespace. Quality weights and
/// wildcard items are skipped; order is never changed.
#[must_use]
pub fn accept_language_tags(header: &str) -> Vec<&str> {
    header
        .split(',')
        .filter_map(|item| {
            let item = item.trim_start();
            let end = item
                .find(|c: char| !(c.is_ascii_alphabetic() || c == '-'))
                .unwrap_or(item.len());
            let tag = &item[..end];
            (!tag.is_empty()).then_some(tag)
        })
        .collect()
}

/// Primary subtag of a region-qualified tag: `"de"` for `"de-AT"`.
///
/// Tags without a hyphen have no separate primary subtag and yield `None`.
#[must_use]
pub fn primary_subtag(tag: &str) -> Option<&str> {
    tag.split_once('-').map(|(primary, _)| primary)
}
