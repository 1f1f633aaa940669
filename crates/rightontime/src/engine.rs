//! The attendance engine.
//!
//! [`AttendanceEngine`] owns all mutable state: the directory of known
//! identities, the record store, the active session and the pending flash
//! message. Every operation runs to completion on `&mut self`; the only
//! suspension point is the optional credential gate awaited by
//! [`AttendanceEngine::login_with`] before the login itself.
//!
//! Check-in and check-out require an employee session. Without one they do
//! nothing at all, which callers can observe only through the record store.

use tracing::{debug, info};

use crate::config::Config;
use crate::directory::Directory;
use crate::error::Result;
use crate::gate::CredentialGate;
use crate::identity::{normalize_key, IdentityDeriver, IdentityProfile};
use crate::metrics::{compute_stats, DashboardStats};
use crate::record::{AttendanceRecord, Timestamp};
use crate::seed;
use crate::session::{LoginRequest, Registration, Role, Session};
use crate::store::RecordStore;

/// Session manager composing identity resolution and the record store.
#[derive(Debug, Clone)]
pub struct AttendanceEngine {
    deriver: IdentityDeriver,
    directory: Directory,
    store: RecordStore,
    session: Session,
    flash_message: Option<String>,
}

impl Default for AttendanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceEngine {
    /// Create an engine with default settings and the built-in seed record.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(IdentityDeriver::new(), seed::seeded_records())
    }

    /// Create an engine with a given deriver and initial records.
    #[must_use]
    pub fn with_records(
        deriver: IdentityDeriver,
        records: impl IntoIterator<Item = AttendanceRecord>,
    ) -> Self {
        Self {
            deriver,
            directory: Directory::new(),
            store: RecordStore::with_records(records),
            session: Session::LoggedOut,
            flash_message: None,
        }
    }

    /// Create an engine as described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured records file cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut records = if config.records.seed {
            seed::seeded_records()
        } else {
            Vec::new()
        };
        if let Some(path) = &config.records.path {
            records.extend(seed::load_records(path)?);
        }
        let deriver = IdentityDeriver::with_config(config.identity.clone());
        Ok(Self::with_records(deriver, records))
    }

    /// Start a session for an accepted login.
    ///
    /// The password is not checked here. Admins get a profile-less session;
    /// employees resolve through the directory, deriving a profile the first
    /// time a credential is seen. Clears the flash message.
    pub fn login(&mut self, request: &LoginRequest) -> Role {
        self.flash_message = None;

        self.session = match request.role {
            Role::Admin => Session::Admin,
            Role::Employee => {
                let profile = self.directory.resolve(&request.credential, &self.deriver);
                Session::Employee(profile)
            }
        };

        info!(role = %request.role, employee = ?self.session.employee().map(|p| &p.id), "Session started");
        request.role
    }

    /// Ask `gate` to accept a login, then start the session.
    ///
    /// A refused login leaves the session and flash message untouched.
    ///
    /// # Errors
    ///
    /// Returns the gate's error when it refuses the request.
    pub async fn login_with<G>(&mut self, gate: &G, request: &LoginRequest) -> Result<Role>
    where
        G: CredentialGate + ?Sized,
    {
        let role = gate.accept(request).await?;
        debug!(gate = gate.name(), %role, "Credential gate accepted login");
        let accepted = LoginRequest {
            role,
            ..request.clone()
        };
        Ok(self.login(&accepted))
    }

    /// Register an account.
    ///
    /// Employee registrations overwrite the directory entry for the
    /// credential with the supplied (or derived) name and id. Every
    /// registration leaves a success flash message. The session is not
    /// touched.
    pub fn register_account(&mut self, registration: &Registration) {
        let credential = registration.credential.as_str();

        let trimmed_name = registration.name.trim();
        let preferred_name = if trimmed_name.is_empty() {
            self.deriver.derive_name(credential)
        } else {
            trimmed_name.to_string()
        };
        let display_name = self.deriver.to_title_case(&preferred_name);

        let preferred_id = registration
            .employee_id
            .as_deref()
            .map(|id| id.trim().to_uppercase())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.deriver.derive_id(credential));

        if registration.role == Role::Employee {
            let profile = IdentityProfile::new(preferred_id, display_name.clone());
            let replaced = self.directory.register(credential, profile);
            info!(
                key = ?normalize_key(credential),
                replaced = replaced.is_some(),
                "Registered employee account"
            );
        } else {
            info!(role = %registration.role, "Registered account");
        }

        self.flash_message = Some(format!(
            "Registration successful for {display_name}. Sign in to get started."
        ));
    }

    /// End the session. Does nothing when already logged out.
    pub fn logout(&mut self) {
        if self.session.is_active() {
            info!("Session ended");
        }
        self.session = Session::LoggedOut;
    }

    /// Dismiss the flash message.
    pub fn clear_flash_message(&mut self) {
        self.flash_message = None;
    }

    /// Record an arrival for the signed-in employee.
    ///
    /// Does nothing unless an employee is signed in.
    pub fn register_check_in(&mut self, timestamp: impl Into<Timestamp>) {
        let Session::Employee(profile) = &self.session else {
            debug!(session = ?self.session.role(), "Ignoring check-in without employee session");
            return;
        };
        let outcome = self.store.check_in(profile, timestamp.into());
        info!(employee = %profile.id, ?outcome, "Check-in registered");
    }

    /// Record a departure for the signed-in employee.
    ///
    /// Does nothing unless an employee is signed in.
    pub fn register_check_out(&mut self, timestamp: impl Into<Timestamp>) {
        let Session::Employee(profile) = &self.session else {
            debug!(session = ?self.session.role(), "Ignoring check-out without employee session");
            return;
        };
        let outcome = self.store.check_out(profile, timestamp.into());
        info!(employee = %profile.id, ?outcome, "Check-out registered");
    }

    /// Merge externally loaded records into the store.
    ///
    /// A record whose employee and day already exist replaces the stored one.
    pub fn import_records(&mut self, records: impl IntoIterator<Item = AttendanceRecord>) {
        let before = self.store.len();
        self.store.extend(records);
        debug!(added = self.store.len() - before, "Imported records");
    }

    /// The active session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[AttendanceRecord] {
        self.store.records()
    }

    /// The record store, for per-employee views.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The directory of resolved identities.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// The identity deriver in use.
    #[must_use]
    pub fn deriver(&self) -> &IdentityDeriver {
        &self.deriver
    }

    /// The pending flash message, if any.
    #[must_use]
    pub fn flash_message(&self) -> Option<&str> {
        self.flash_message.as_deref()
    }

    /// Dashboard figures over every record.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        compute_stats(self.store.records())
    }
}
