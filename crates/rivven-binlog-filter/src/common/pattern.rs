//! # Pattern Matching for Schema and Table Names
//!
//! Compiled glob matchers used by the block-allow list and the
//! binlog event rule filter.
//!
//! - **Glob syntax**: `*` and `?` wildcards, converted to anchored regex
//! - **Case-insensitive**: MySQL identifiers compare case-insensitively
//! - **Qualified names**: a table pattern matches `schema.table` or `table`
//!
//! ## Example
//!
//! ```rust
//! use rivven_binlog_filter::common::pattern::{PatternMatcher, PatternSet};
//!
//! let matcher = PatternMatcher::new("shop_*").unwrap();
//! assert!(matcher.matches("shop_eu"));
//! assert!(!matcher.matches("billing"));
//!
//! let set = PatternSet::from_patterns(&["*.orders".to_string()]).unwrap();
//! assert!(set.matches_qualified("shop_eu", "orders"));
//! ```

use regex::Regex;

/// Error type for pattern operations
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Empty pattern")]
    EmptyPattern,
}

/// A compiled pattern matcher
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    /// `*` matches everything, including the empty schema of table-less queries
    is_wildcard: bool,
}

impl PatternMatcher {
    /// Create a new matcher from a glob pattern
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let regex = regex::RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            regex,
            is_wildcard: pattern.chars().all(|c| c == '*'),
        })
    }

    /// Check if text matches the pattern
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.is_wildcard || self.regex.is_match(text)
    }

    /// Check if `schema.table` or the bare `table` matches the pattern
    pub fn matches_qualified(&self, schema: &str, table: &str) -> bool {
        if self.is_wildcard {
            return true;
        }
        let full_name = format!("{}.{}", schema, table);
        self.regex.is_match(&full_name) || self.regex.is_match(table)
    }

    /// Check if this is a wildcard pattern (matches everything)
    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }
}

/// A set of patterns; matches when any member matches
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<PatternMatcher>,
    has_wildcard: bool,
}

impl PatternSet {
    /// Create an empty pattern set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pattern set from a list of glob patterns
    pub fn from_patterns(patterns: &[String]) -> Result<Self, PatternError> {
        let mut set = Self::new();
        for pattern in patterns {
            set.add(pattern)?;
        }
        Ok(set)
    }

    /// Add a glob pattern to the set
    pub fn add(&mut self, pattern: &str) -> Result<(), PatternError> {
        let matcher = PatternMatcher::new(pattern)?;
        self.has_wildcard |= matcher.is_wildcard();
        self.patterns.push(matcher);
        Ok(())
    }

    /// Check if text matches any pattern in the set
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.has_wildcard || self.patterns.iter().any(|p| p.matches(text))
    }

    /// Check if a qualified name matches any pattern in the set
    pub fn matches_qualified(&self, schema: &str, table: &str) -> bool {
        self.has_wildcard
            || self
                .patterns
                .iter()
                .any(|p| p.matches_qualified(schema, table))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Convert a glob pattern to an anchored regex
fn glob_to_regex(pattern: &str) -> String {
    let escaped = regex::escape(pattern);
    let regex_pattern = escaped.replace(r"\*", ".*").replace(r"\?", ".");
    format!("^{}$", regex_pattern)
}
