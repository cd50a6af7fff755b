//! Optional password requirements for saving archives.
//!
//! Off unless the host configures a minimum length. Only applied when a
//! password is about to protect a new write; opening is never restricted.

use crate::error::{ArchiveError, Result};

/// Validate a password against the configured minimum length.
///
/// Length is counted in characters, not bytes. A minimum of zero accepts
/// every password, the empty one included.
///
/// # Examples
///
/// ```
/// use elephant_core::crypto::validate_password;
///
/// assert!(validate_password("my-secure-password", 8).is_ok());
/// assert!(validate_password("short", 8).is_err());
/// assert!(validate_password("", 0).is_ok());
/// ```
pub fn validate_password(password: &str, min_length: usize) -> Result<()> {
    let length = password.chars().count();
    if length < min_length {
        return Err(ArchiveError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            min_length, length
        )));
    }

    Ok(())
}
