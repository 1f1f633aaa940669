//! Replay scripts.
//!
//! A script is a JSON document listing UI actions in order, optionally with
//! the accounts a credential gate should know about:
//!
//! ```json
//! {
//!   "accounts": [{ "credential": "ana@example.com", "password": "pw", "role": "employee" }],
//!   "actions": [
//!     { "action": "login", "credential": "ana@example.com", "password": "pw", "role": "employee" },
//!     { "action": "check_in", "timestamp": "2025-11-04T09:00:00" },
//!     { "action": "logout" }
//!   ]
//! }
//! ```
//!
//! Without accounts every login is trusted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::AttendanceEngine;
use crate::error::{Error, Result};
use crate::gate::{CredentialGate, StaticGate, TrustingGate};
use crate::record::Timestamp;
use crate::session::{LoginRequest, Registration, Role};

/// One UI action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Sign in.
    Login(LoginRequest),
    /// Register an account.
    Register(Registration),
    /// Sign out.
    Logout,
    /// Record an arrival.
    CheckIn {
        /// When the employee arrived.
        timestamp: Timestamp,
    },
    /// Record a departure.
    CheckOut {
        /// When the employee left.
        timestamp: Timestamp,
    },
    /// Dismiss the flash message.
    ClearFlash,
}

/// An account known to the script's credential gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Email-like credential.
    pub credential: String,
    /// Expected password.
    pub password: String,
    /// Role the account may sign in as.
    pub role: Role,
}

/// A replayable sequence of actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Accounts for a static gate; empty means trust every login.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Actions in the order they happen.
    pub actions: Vec<Action>,
}

impl Script {
    /// Read a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::input_file(path, e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| Error::input_file(path, e.to_string()))
    }

    /// The gate this script's logins go through.
    #[must_use]
    pub fn gate(&self) -> Box<dyn CredentialGate> {
        if self.accounts.is_empty() {
            return Box::new(TrustingGate);
        }
        let gate = self
            .accounts
            .iter()
            .fold(StaticGate::new(), |gate, account| {
                gate.with_account(&account.credential, account.password.clone(), account.role)
            });
        Box::new(gate)
    }

    /// Apply every action to `engine` in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReplayStep`] for the first login the gate refuses;
    /// earlier actions stay applied.
    pub async fn replay(&self, engine: &mut AttendanceEngine) -> Result<()> {
        let gate = self.gate();
        for (step, action) in self.actions.iter().enumerate() {
            debug!(step, ?action, "Replaying action");
            apply(engine, gate.as_ref(), action)
                .await
                .map_err(|e| Error::ReplayStep {
                    step,
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// Apply a single action to `engine`.
///
/// # Errors
///
/// Returns the gate's error when a login is refused.
pub async fn apply(
    engine: &mut AttendanceEngine,
    gate: &dyn CredentialGate,
    action: &Action,
) -> Result<()> {
    match action {
        Action::Login(request) => {
            engine.login_with(gate, request).await?;
        }
        Action::Register(registration) => engine.register_account(registration),
        Action::Logout => engine.logout(),
        Action::CheckIn { timestamp } => engine.register_check_in(timestamp.clone()),
        Action::CheckOut { timestamp } => engine.register_check_out(timestamp.clone()),
        Action::ClearFlash => engine.clear_flash_message(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityDeriver;

    const SCRIPT: &str = r#"{
        "actions": [
            { "action": "register", "name": "ana ruiz", "credential": "ana@example.com",
              "password": "pw", "role": "employee", "employee_id": "emp-042" },
            { "action": "login", "credential": "ana@example.com", "password": "pw", "role": "employee" },
            { "action": "check_in", "timestamp": "2025-11-04T09:00:00" },
            { "action": "check_out", "timestamp": "2025-11-04T17:00:00" },
            { "action": "logout" },
            { "action": "check_in", "timestamp": "2025-11-05T09:00:00" }
        ]
    }"#;

    fn empty_engine() -> AttendanceEngine {
        AttendanceEngine::with_records(IdentityDeriver::new(), Vec::new())
    }

    #[test]
    fn test_parse_script() {
        let script: Script = serde_json::from_str(SCRIPT).unwrap();
        assert!(script.accounts.is_empty());
        assert_eq!(script.actions.len(), 6);
        assert_eq!(script.actions[4], Action::Logout);
        assert!(matches!(script.actions[1], Action::Login(_)));
    }

    #[test]
    fn test_parse_unknown_action_fails() {
        let json = r#"{ "actions": [{ "action": "teleport" }] }"#;
        assert!(serde_json::from_str::<Script>(json).is_err());
    }

    #[tokio::test]
    async fn test_replay_trusting() {
        let script: Script = serde_json::from_str(SCRIPT).unwrap();
        let mut engine = empty_engine();
        script.replay(&mut engine).await.unwrap();

        // The check-in after logout is ignored.
        assert_eq!(engine.records().len(), 1);
        let record = &engine.records()[0];
        assert_eq!(record.record_id, "EMP-042-2025-11-04");
        assert_eq!(record.name, "Ana Ruiz");
        assert_eq!(engine.stats().average_worked, "8.0 h");
        // Login cleared the registration notice.
        assert!(engine.flash_message().is_none());
    }

    #[tokio::test]
    async fn test_replay_with_accounts_rejects_bad_login() {
        let json = r#"{
            "accounts": [{ "credential": "ana@example.com", "password": "secret", "role": "employee" }],
            "actions": [
                { "action": "clear_flash" },
                { "action": "login", "credential": "ana@example.com", "password": "nope", "role": "employee" }
            ]
        }"#;
        let script: Script = serde_json::from_str(json).unwrap();
        let mut engine = empty_engine();

        let err = script.replay(&mut engine).await.unwrap_err();
        assert!(matches!(err, Error::ReplayStep { step: 1, .. }));
        assert!(engine.session().employee().is_none());
    }

    #[test]
    fn test_load_missing_script() {
        let err = Script::load("/nonexistent/script.json").unwrap_err();
        assert!(matches!(err, Error::InputFile { .. }));
    }
}
