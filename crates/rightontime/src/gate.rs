//! Credential gates.
//!
//! The engine never checks passwords. A gate stands in for whatever remote
//! service does, and decides which role a login request is accepted as
//! before the engine's own state transition runs.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::identity::{normalize_key, IdentityKey};
use crate::session::{LoginRequest, Role};

/// Decides whether a login request is accepted.
#[async_trait::async_trait]
pub trait CredentialGate: Send + Sync {
    /// Name of this gate (for logging).
    fn name(&self) -> &'static str;

    /// Accept or refuse a login request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialsRejected`] when the request is refused.
    async fn accept(&self, request: &LoginRequest) -> Result<Role>;
}

/// Accepts every request with the role it asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustingGate;

#[async_trait::async_trait]
impl CredentialGate for TrustingGate {
    fn name(&self) -> &'static str {
        "trusting"
    }

    async fn accept(&self, request: &LoginRequest) -> Result<Role> {
        Ok(request.role)
    }
}

/// Accepts only credentials from a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticGate {
    accounts: HashMap<IdentityKey, (String, Role)>,
}

impl StaticGate {
    /// Create a gate with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, replacing any with the same credential.
    #[must_use]
    pub fn with_account(mut self, credential: &str, password: impl Into<String>, role: Role) -> Self {
        self.accounts
            .insert(normalize_key(credential), (password.into(), role));
        self
    }

    /// Number of known accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the gate has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait::async_trait]
impl CredentialGate for StaticGate {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn accept(&self, request: &LoginRequest) -> Result<Role> {
        let key = normalize_key(&request.credential);
        let Some((password, role)) = self.accounts.get(&key) else {
            debug!(?key, "Unknown account");
            return Err(Error::credentials_rejected(key.as_str(), "unknown account"));
        };
        if *password != request.password {
            return Err(Error::credentials_rejected(key.as_str(), "wrong password"));
        }
        if *role != request.role {
            return Err(Error::credentials_rejected(
                key.as_str(),
                format!("account is not allowed to sign in as {}", request.role),
            ));
        }
        Ok(*role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> StaticGate {
        StaticGate::new()
            .with_account("Ana@Example.com", "secret", Role::Employee)
            .with_account("boss@example.com", "admin", Role::Admin)
    }

    #[tokio::test]
    async fn test_trusting_gate_accepts_requested_role() {
        let request = LoginRequest::new("anyone", "", Role::Admin);
        assert_eq!(TrustingGate.accept(&request).await.unwrap(), Role::Admin);
        assert_eq!(TrustingGate.name(), "trusting");
    }

    #[tokio::test]
    async fn test_static_gate_accepts_known_account() {
        let request = LoginRequest::new(" ana@example.com ", "secret", Role::Employee);
        assert_eq!(gate().accept(&request).await.unwrap(), Role::Employee);
    }

    #[tokio::test]
    async fn test_static_gate_rejects_unknown_account() {
        let request = LoginRequest::new("ghost@example.com", "secret", Role::Employee);
        let err = gate().accept(&request).await.unwrap_err();
        assert!(err.is_credentials_rejected());
        assert!(err.to_string().contains("unknown account"));
    }

    #[tokio::test]
    async fn test_static_gate_rejects_wrong_password() {
        let request = LoginRequest::new("ana@example.com", "guess", Role::Employee);
        let err = gate().accept(&request).await.unwrap_err();
        assert!(err.to_string().contains("wrong password"));
    }

    #[tokio::test]
    async fn test_static_gate_rejects_role_escalation() {
        let request = LoginRequest::new("ana@example.com", "secret", Role::Admin);
        let err = gate().accept(&request).await.unwrap_err();
        assert!(err.to_string().contains("as admin"));
    }

    #[test]
    fn test_static_gate_len() {
        assert!(StaticGate::new().is_empty());
        assert_eq!(gate().len(), 2);
    }
}
