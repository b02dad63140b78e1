//! Namespaced registry keys.
//!
//! Blocks, interactions and block states are registered under stable
//! `namespace:path` identifiers (e.g. `tutorial:trash_block`). Keys are
//! validated on parse and ordered lexically so registries iterate the same way
//! on every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "tutorial";

/// Error returned when parsing an invalid [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryKeyError {
    /// Input was blank.
    #[error("registry key cannot be empty")]
    Empty,
    /// Namespace or path exceeded its length limit.
    #[error("registry key {part} too long (max {max})")]
    TooLong {
        /// Which half of the key was rejected.
        part: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// Namespace or path was empty after splitting on `:`.
    #[error("registry key {0} cannot be empty")]
    EmptyPart(&'static str),
    /// Namespace or path contained a character outside the allowed set.
    #[error("registry key {part} has invalid character {found:?}")]
    InvalidChar {
        /// Which half of the key was rejected.
        part: &'static str,
        /// First offending character.
        found: char,
    },
}

/// A namespaced key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryKey {
    namespace: String,
    path: String,
}

impl RegistryKey {
    /// Parse a registry key.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RegistryKeyError::Empty);
        }

        let (namespace, path) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));
        let namespace = namespace.trim();
        let path = path.trim();

        validate("namespace", namespace, 64, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
        })?;
        validate("path", path, 128, |c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/')
        })?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Registry key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn validate(
    part: &'static str,
    value: &str,
    max: usize,
    allowed: impl Fn(char) -> bool,
) -> Result<(), RegistryKeyError> {
    if value.is_empty() {
        return Err(RegistryKeyError::EmptyPart(part));
    }
    if value.len() > max {
        return Err(RegistryKeyError::TooLong { part, max });
    }
    match value.chars().find(|c| !allowed(*c)) {
        Some(found) => Err(RegistryKeyError::InvalidChar { part, found }),
        None => Ok(()),
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryKey {
    type Error = RegistryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryKey> for String {
    fn from(key: RegistryKey) -> Self {
        key.to_string()
    }
}
