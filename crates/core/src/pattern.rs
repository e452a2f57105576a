//! Wildcard resolution of remote keys
//!
//! User patterns are matched against a bucket listing:
//! - `*` alone matches every key
//! - a pattern with glob metacharacters is matched against the full key,
//!   and `*` crosses `/` the way fnmatch does
//! - anything else must equal the key exactly

use std::collections::HashSet;

use glob::Pattern;

use crate::traits::ObjectInfo;

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

/// A single parsed user pattern
#[derive(Debug, Clone)]
pub enum KeyPattern {
    All,
    Glob(Pattern),
    Exact(String),
}

impl KeyPattern {
    /// Parse a user pattern, trimming surrounding whitespace
    ///
    /// A pattern that is not valid glob syntax (e.g. an unclosed `[`) is
    /// treated as an exact key.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            return KeyPattern::All;
        }
        if !raw.contains(GLOB_CHARS) {
            return KeyPattern::Exact(raw.to_string());
        }
        match Pattern::new(raw) {
            Ok(pattern) => KeyPattern::Glob(pattern),
            Err(e) => {
                tracing::debug!(pattern = raw, error = %e, "Invalid glob, matching literally");
                KeyPattern::Exact(raw.to_string())
            }
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::All => true,
            KeyPattern::Glob(pattern) => pattern.matches(key),
            KeyPattern::Exact(exact) => exact == key,
        }
    }
}

/// Keys selected by a set of patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matched keys, deduplicated, in order of first match
    pub keys: Vec<String>,
    /// Patterns that matched nothing
    pub unmatched: Vec<String>,
}

/// Resolve user patterns against a listing
pub fn resolve_patterns<S: AsRef<str>>(patterns: &[S], objects: &[ObjectInfo]) -> Resolution {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolution = Resolution::default();

    for raw in patterns {
        let raw = raw.as_ref();
        let pattern = KeyPattern::parse(raw);
        let mut matched_any = false;

        for object in objects.iter().filter(|o| pattern.matches(&o.key)) {
            matched_any = true;
            if seen.insert(object.key.as_str()) {
                resolution.keys.push(object.key.clone());
            }
        }

        if !matched_any {
            resolution.unmatched.push(raw.trim().to_string());
        }
    }

    resolution
}
