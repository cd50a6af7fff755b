//! Error types for Password Elephant core operations.
//!
//! Native archive operations fail with [`ArchiveError`]; the one-way Password
//! Safe importer fails with [`ImportError`]. Errors are descriptive at the core
//! level; the host application maps them to user-facing messages and decides
//! whether to re-prompt for a password.

use thiserror::Error;

/// Result type alias for native archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for legacy import operations.
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors raised while reading or writing a native archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The password hash stored in the archive does not match
    #[error("Incorrect password")]
    IncorrectPassword,

    /// The archive was written by an unsupported format version
    #[error("Unsupported archive version {found} (expected {expected})")]
    UnsupportedVersion { found: i32, expected: i32 },

    /// Structural corruption: bad magic, wrong field lengths, bad padding
    #[error("Format error: {0}")]
    Format(String),

    /// The payload decrypted but failed authentication
    #[error("HMAC verification failed")]
    HmacFailure,

    /// Rejected credentials or settings
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying I/O or random generation failure
    #[error("System error: {0}")]
    System(String),
}

impl ArchiveError {
    /// Whether retrying with a different password can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ArchiveError::IncorrectPassword)
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::System(err.to_string())
    }
}

impl From<prost::DecodeError> for ArchiveError {
    fn from(err: prost::DecodeError) -> Self {
        ArchiveError::Format(format!("Malformed archive structure: {}", err))
    }
}

/// Errors raised while importing a Password Safe 2.0 database.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The stored verifier does not match the password
    #[error("Incorrect password")]
    IncorrectPassword,

    /// The file signature or version field is not Password Safe 2.0
    #[error("Unsupported legacy format: {found}")]
    UnsupportedVersion { found: String },

    /// The preference field holds a variant this importer has not validated
    #[error("Unsupported preference field: {field}")]
    UnsupportedPreference { field: String },

    /// A field type this importer does not understand (strict mode only)
    #[error("Unsupported field type: {raw_type}")]
    UnsupportedField { raw_type: u8 },

    /// Truncated or inconsistent field stream
    #[error("Format error: {0}")]
    Format(String),

    /// Underlying I/O failure
    #[error("System error: {0}")]
    System(String),
}

impl ImportError {
    /// Whether retrying with a different password can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ImportError::IncorrectPassword)
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::System(err.to_string())
    }
}
