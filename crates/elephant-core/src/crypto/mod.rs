//! Cryptographic building blocks.
//!
//! - **stretch**: iterated SHA-256 password stretching for native archives
//! - **password**: minimum requirements for new archive passwords
//! - **sha1_state**: SHA-1 with caller-chosen initial registers, needed by the
//!   Password Safe 2.0 password verifier
//! - **random**: OS randomness for salts, IVs and keys
//!
//! All key material lives in types that zeroize on drop and redact their
//! `Debug` output.

pub mod password;
pub mod random;
pub mod sha1_state;
pub mod stretch;

pub use password::validate_password;
pub use random::random_array;
pub use sha1_state::Sha1State;
pub use stretch::{stretch, StretchedKey};
