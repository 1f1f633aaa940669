//! Error types for rightontime.
//!
//! The attendance core itself is total; these errors cover the surfaces
//! around it: configuration, record files, replay scripts and the
//! credential gate.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rightontime operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Credential Errors ===
    /// The credential gate refused a login request.
    #[error("credentials rejected for '{credential}': {reason}")]
    CredentialsRejected {
        /// The normalized credential that was refused.
        credential: String,
        /// Why the gate refused it.
        reason: String,
    },

    // === Input Errors ===
    /// A records or script file could not be read or parsed.
    #[error("failed to read {path}: {message}")]
    InputFile {
        /// Path of the offending file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// A replay script step could not be applied.
    #[error("replay step {step} failed: {message}")]
    ReplayStep {
        /// Zero-based index of the step.
        step: usize,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rightontime operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a credentials rejected error.
    #[must_use]
    pub fn credentials_rejected(credential: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CredentialsRejected {
            credential: credential.into(),
            reason: reason.into(),
        }
    }

    /// Create an input file error.
    #[must_use]
    pub fn input_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InputFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the credential gate said no.
    #[must_use]
    pub fn is_credentials_rejected(&self) -> bool {
        matches!(self, Self::CredentialsRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_rejected_display() {
        let err = Error::credentials_rejected("ana@example.com", "wrong password");
        let msg = err.to_string();
        assert!(msg.contains("ana@example.com"));
        assert!(msg.contains("wrong password"));
        assert!(err.is_credentials_rejected());
    }

    #[test]
    fn test_input_file_display() {
        let err = Error::input_file("/tmp/records.json", "expected an array");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/records.json"));
        assert!(msg.contains("expected an array"));
        assert!(!err.is_credentials_rejected());
    }

    #[test]
    fn test_replay_step_display() {
        let err = Error::ReplayStep {
            step: 3,
            message: "credentials rejected".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "replay step 3 failed: credentials rejected"
        );
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "id_prefix must be 4 characters".to_string(),
        };
        assert!(err.to_string().contains("id_prefix"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
