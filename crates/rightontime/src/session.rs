//! Session state and the requests that change it.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::identity::IdentityProfile;

/// Who a user signs in as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Records their own attendance.
    Employee,
    /// Views aggregate metrics; never owns records.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employee => write!(f, "employee"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The single active session of an engine.
///
/// Serializes as `{ "role": ..., "employee": ... }` with both fields always
/// present; `role` is `null` when logged out and `employee` is `null` unless
/// an employee is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nobody is signed in.
    #[default]
    LoggedOut,
    /// An administrator is signed in.
    Admin,
    /// An employee is signed in with a resolved profile.
    Employee(IdentityProfile),
}

impl Session {
    /// The signed-in role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::LoggedOut => None,
            Self::Admin => Some(Role::Admin),
            Self::Employee(_) => Some(Role::Employee),
        }
    }

    /// The signed-in employee's profile, if the session belongs to one.
    #[must_use]
    pub fn employee(&self) -> Option<&IdentityProfile> {
        match self {
            Self::Employee(profile) => Some(profile),
            Self::LoggedOut | Self::Admin => None,
        }
    }

    /// Whether anybody is signed in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::LoggedOut)
    }
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Session", 2)?;
        state.serialize_field("role", &self.role())?;
        state.serialize_field("employee", &self.employee())?;
        state.end()
    }
}

/// A login attempt as handed over by the UI.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email-like credential.
    pub credential: String,
    /// Password, checked only by a credential gate.
    pub password: String,
    /// Role the user asks to sign in as.
    pub role: Role,
}

impl LoginRequest {
    /// Create a login request.
    #[must_use]
    pub fn new(credential: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            credential: credential.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("credential", &self.credential)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// An account registration as handed over by the UI.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Display name typed by the operator; may be blank.
    #[serde(default)]
    pub name: String,
    /// Email-like credential.
    pub credential: String,
    /// Password, stored only by external collaborators.
    #[serde(default)]
    pub password: String,
    /// Role the account is created for.
    pub role: Role,
    /// Explicit employee id; derived from the credential when blank.
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("credential", &self.credential)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("employee_id", &self.employee_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Employee.to_string(), "employee");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }

    #[test]
    fn test_session_default_is_logged_out() {
        let session = Session::default();
        assert_eq!(session, Session::LoggedOut);
        assert!(!session.is_active());
        assert_eq!(session.role(), None);
        assert!(session.employee().is_none());
    }

    #[test]
    fn test_admin_session_has_no_profile() {
        let session = Session::Admin;
        assert!(session.is_active());
        assert_eq!(session.role(), Some(Role::Admin));
        assert!(session.employee().is_none());
    }

    #[test]
    fn test_employee_session() {
        let profile = IdentityProfile::new("EMP-JOHNDO", "John Doe");
        let session = Session::Employee(profile.clone());
        assert_eq!(session.role(), Some(Role::Employee));
        assert_eq!(session.employee(), Some(&profile));
    }

    #[test]
    fn test_session_serialize() {
        let session = Session::Employee(IdentityProfile::new("EMP-JOHNDO", "John Doe"));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["role"], "employee");
        assert_eq!(json["employee"]["id"], "EMP-JOHNDO");
    }

    #[test]
    fn test_session_serialize_keeps_null_employee() {
        let admin = serde_json::to_value(Session::Admin).unwrap();
        assert_eq!(admin, serde_json::json!({ "role": "admin", "employee": null }));

        let nobody = serde_json::to_value(Session::LoggedOut).unwrap();
        assert_eq!(nobody, serde_json::json!({ "role": null, "employee": null }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = LoginRequest::new("ana@example.com", "hunter2", Role::Employee);
        let debug_str = format!("{request:?}");
        assert!(debug_str.contains("ana@example.com"));
        assert!(!debug_str.contains("hunter2"));

        let registration = Registration {
            name: "Ana".to_string(),
            credential: "ana@example.com".to_string(),
            password: "hunter2".to_string(),
            role: Role::Employee,
            employee_id: None,
        };
        assert!(!format!("{registration:?}").contains("hunter2"));
    }

    #[test]
    fn test_registration_deserialize_defaults() {
        let json = r#"{"credential": "ana@example.com", "role": "employee"}"#;
        let registration: Registration = serde_json::from_str(json).unwrap();
        assert!(registration.name.is_empty());
        assert!(registration.employee_id.is_none());
    }
}
