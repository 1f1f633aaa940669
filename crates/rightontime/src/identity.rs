//! Identity derivation from login credentials.
//!
//! A credential is an email-like string. Everything here is a deterministic,
//! total string transform: malformed input degrades to padded ids and
//! placeholder names instead of failing.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;

/// Length of the id body that follows the prefix.
const ID_BODY_LEN: usize = 6;

/// Padding character for short id bodies.
const ID_PAD: char = '0';

/// Canonical lookup form of a credential: trimmed and lowercased.
///
/// Used only as a directory key, never shown to anyone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({:?})", self.0)
    }
}

/// The stable `{id, name}` pair a person resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// Short identifier, e.g. `EMP-JOHNDO`.
    pub id: String,
    /// Display name, e.g. `John Doe`.
    pub name: String,
}

impl IdentityProfile {
    /// Create a profile from an id and a display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Normalize a credential into its directory key.
#[must_use]
pub fn normalize_key(credential: &str) -> IdentityKey {
    IdentityKey(credential.trim().to_lowercase())
}

/// The part of a credential before the first `@`, or all of it.
fn local_part(credential: &str) -> &str {
    credential
        .split_once('@')
        .map_or(credential, |(local, _)| local)
}

fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("built-in identity pattern is valid")
}

/// Derives ids and display names from credentials.
///
/// Holds the compiled patterns and the configured prefix and placeholders,
/// so one instance can be reused for every resolution.
#[derive(Debug, Clone)]
pub struct IdentityDeriver {
    config: IdentityConfig,
    /// `.` and `_` act as word separators in a local part.
    separators: Regex,
    /// Digit runs are dropped from names.
    digits: Regex,
    /// Anything that is neither an ASCII letter nor Latin-1 `À..=ÿ`.
    word_breaks: Regex,
}

impl Default for IdentityDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityDeriver {
    /// Create a deriver with the default prefix and placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(IdentityConfig::default())
    }

    /// Create a deriver with a custom configuration.
    #[must_use]
    pub fn with_config(config: IdentityConfig) -> Self {
        Self {
            config,
            separators: compile(r"[._]"),
            digits: compile(r"[0-9]+"),
            word_breaks: compile(r"[^A-Za-z\x{C0}-\x{FF}]+"),
        }
    }

    /// The configuration this deriver was built with.
    #[must_use]
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Build the short id for a credential.
    ///
    /// Keeps the ASCII alphanumerics of the local part, uppercased, cut to
    /// six and padded with `0`, behind the configured prefix.
    #[must_use]
    pub fn derive_id(&self, credential: &str) -> String {
        let mut body: String = local_part(credential)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .take(ID_BODY_LEN)
            .collect();
        while body.len() < ID_BODY_LEN {
            body.push(ID_PAD);
        }
        format!("{}{body}", self.config.id_prefix)
    }

    /// Build a display name from a credential's local part.
    #[must_use]
    pub fn derive_name(&self, credential: &str) -> String {
        let spaced = self.separators.replace_all(local_part(credential), " ");
        let cleaned = self.digits.replace_all(&spaced, " ");
        let name = self.to_title_case(cleaned.trim());
        if name.is_empty() {
            self.config.name_placeholder.clone()
        } else {
            name
        }
    }

    /// Capitalize the first letter of every word.
    ///
    /// Words are runs of ASCII or Latin-1 letters. Only the first character
    /// of each word changes, so `MARIA_GARCIA` stays `MARIA GARCIA`. Empty
    /// input yields the title placeholder; input with no letters at all
    /// yields an empty string.
    #[must_use]
    pub fn to_title_case(&self, value: &str) -> String {
        if value.is_empty() {
            return self.config.title_placeholder.clone();
        }

        self.word_breaks
            .split(value)
            .filter(|word| !word.is_empty())
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Derive a complete profile for a credential seen for the first time.
    #[must_use]
    pub fn derive_profile(&self, credential: &str) -> IdentityProfile {
        IdentityProfile::new(self.derive_id(credential), self.derive_name(credential))
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
