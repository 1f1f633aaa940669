//! Directory of resolved identities.
//!
//! Maps a normalized credential to the profile it first resolved to. Entries
//! are only ever replaced by an explicit registration.

use std::collections::HashMap;

use tracing::debug;

use crate::identity::{normalize_key, IdentityDeriver, IdentityKey, IdentityProfile};

/// Credential key to identity profile mapping.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: HashMap<IdentityKey, IdentityProfile>,
}

impl Directory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the profile stored for a credential.
    #[must_use]
    pub fn get(&self, credential: &str) -> Option<&IdentityProfile> {
        self.entries.get(&normalize_key(credential))
    }

    /// Resolve a credential, deriving and storing a profile the first time.
    ///
    /// Later calls return the stored profile unchanged, whatever the
    /// deriver would produce now.
    pub fn resolve(&mut self, credential: &str, deriver: &IdentityDeriver) -> IdentityProfile {
        let key = normalize_key(credential);
        self.entries
            .entry(key)
            .or_insert_with_key(|key| {
                let profile = deriver.derive_profile(credential);
                debug!(?key, id = %profile.id, "Derived new identity profile");
                profile
            })
            .clone()
    }

    /// Store `profile` for a credential, replacing any existing entry.
    ///
    /// Returns the profile that was replaced, if any.
    pub fn register(
        &mut self,
        credential: &str,
        profile: IdentityProfile,
    ) -> Option<IdentityProfile> {
        self.entries.insert(normalize_key(credential), profile)
    }

    /// Number of known identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identity has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;

    #[test]
    fn test_resolve_derives_once() {
        let mut directory = Directory::new();
        let deriver = IdentityDeriver::new();

        let first = directory.resolve("john.doe@example.com", &deriver);
        assert_eq!(first, IdentityProfile::new("EMP-JOHNDO", "John Doe"));
        assert_eq!(directory.len(), 1);

        let again = directory.resolve("  JOHN.DOE@example.com ", &deriver);
        assert_eq!(again, first);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_stored_profile_wins_over_new_derivation() {
        let mut directory = Directory::new();
        let first = directory.resolve("ana@example.com", &IdentityDeriver::new());

        let other_prefix = IdentityDeriver::with_config(IdentityConfig {
            id_prefix: "STF-".to_string(),
            ..IdentityConfig::default()
        });
        assert_eq!(directory.resolve("ana@example.com", &other_prefix), first);
    }

    #[test]
    fn test_register_overwrites() {
        let mut directory = Directory::new();
        let deriver = IdentityDeriver::new();
        directory.resolve("ana@example.com", &deriver);

        let replaced = directory.register("ANA@example.com", IdentityProfile::new("EMP-042", "Ana Ruiz"));
        assert_eq!(replaced.map(|p| p.id), Some("EMP-ANA000".to_string()));
        assert_eq!(
            directory.resolve("ana@example.com", &deriver),
            IdentityProfile::new("EMP-042", "Ana Ruiz")
        );
    }

    #[test]
    fn test_get_unknown() {
        let directory = Directory::new();
        assert!(directory.is_empty());
        assert!(directory.get("nobody@example.com").is_none());
    }
}
