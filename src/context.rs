//! Run-scoped substitution context.
//!
//! A [`Context`] lives for exactly one chain run. It tracks the most recent
//! successful response and resolves placeholder tokens against it. Two
//! resolution rules coexist on purpose, because they apply to different
//! places in a step:
//!
//! - URL tokens (`/posts/{id}`) take the string form of the matching field,
//!   and a missing field becomes the empty string.
//! - Body values (`"postId": "{id}"`) take the field's typed JSON value, and
//!   a missing field leaves the literal `"{id}"` in place.

use regex::Regex;
use serde_json::{Map, Value};

/// Matches `{name}` tokens in URLs. The name is anything up to the closing
/// brace, so dotted or dashed keys pass through to the lookup unchanged.
const URL_TOKEN_PATTERN: &str = r"\{([^}]+)\}";

/// Holds the last successful response of the current run.
#[derive(Debug, Default)]
pub struct Context {
    last: Option<Value>,
}

impl Context {
    /// Create an empty context. No substitution happens until a response is
    /// recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent successful response, if any step has produced one.
    pub fn last(&self) -> Option<&Value> {
        self.last.as_ref()
    }

    /// Record a step's decoded response as the new substitution source.
    pub(crate) fn record(&mut self, response: Value) {
        self.last = Some(response);
    }

    /// Replace every `{name}` token in `url` with the string form of the
    /// matching top-level field of the last response.
    ///
    /// A token whose field is missing (or whose value is JSON null) resolves
    /// to the empty string. Lookups are shallow; `{user.id}` is a lookup for
    /// the literal key `"user.id"`, not a path.
    pub fn resolve_url(&self, url: &str) -> String {
        let Some(last) = self.last.as_ref() else {
            return url.to_string();
        };
        let re = Regex::new(URL_TOKEN_PATTERN).unwrap();
        re.replace_all(url, |caps: &regex::Captures| {
            match last.get(&caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        })
        .into_owned()
    }

    /// Substitute brace-wrapped string values in a request body.
    ///
    /// Only top-level string values shaped exactly like `"{name}"` are
    /// candidates. A matching field replaces the placeholder with its typed
    /// value, so `"postId": "{id}"` can become `"postId": 7`. A missing
    /// field (or JSON null) keeps the literal placeholder so the mismatch is
    /// visible downstream. Nested objects are not descended into.
    pub fn resolve_body(&self, body: &Map<String, Value>) -> Map<String, Value> {
        let Some(last) = self.last.as_ref() else {
            return body.clone();
        };
        body.iter()
            .map(|(key, value)| {
                let resolved = match value {
                    Value::String(s) => match placeholder_name(s) {
                        Some(name) => match last.get(name) {
                            Some(Value::Null) | None => value.clone(),
                            Some(found) => found.clone(),
                        },
                        None => value.clone(),
                    },
                    other => other.clone(),
                };
                (key.clone(), resolved)
            })
            .collect()
    }
}

/// The field name inside a `"{name}"` placeholder, or `None` if the string
/// is not brace-wrapped.
fn placeholder_name(s: &str) -> Option<&str> {
    s.strip_prefix('{')?.strip_suffix('}')
}
