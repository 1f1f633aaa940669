//! `rightontime` - attendance reconciliation and punctuality metrics
//!
//! This library resolves login credentials to stable employee identities,
//! merges check-in and check-out events into one record per employee per
//! day, and computes dashboard averages over any record set.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod gate;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod script;
pub mod seed;
pub mod session;
pub mod store;

pub use config::Config;
pub use directory::Directory;
pub use engine::AttendanceEngine;
pub use error::{Error, Result};
pub use gate::{CredentialGate, StaticGate, TrustingGate};
pub use identity::{normalize_key, IdentityDeriver, IdentityKey, IdentityProfile};
pub use logging::init_logging;
pub use metrics::{compute_stats, format_duration, DashboardStats};
pub use record::{AttendanceRecord, RecordKey, Timestamp};
pub use session::{LoginRequest, Registration, Role, Session};
pub use store::{RecordStore, Upsert};
