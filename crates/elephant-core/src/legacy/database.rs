//! The Password Safe 2.0 file container.
//!
//! ```text
//! 0..8     random value
//! 8..28    password verifier
//! 28..48   salt
//! 48..56   CBC IV (group-swapped)
//! 56..     field stream: signature, "2.0", preferences, then records
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use super::cipher::{compute_verifier, LegacyCipher, BLOCK_LEN};
use super::field::LegacyField;
use super::preferences::LegacyPreferences;
use super::record::{read_records, LegacyRecord};
use crate::error::{ImportError, ImportResult};

/// Length of the unencrypted file header.
pub const HEADER_LEN: usize = 56;

/// Expected text of the first header field, after its first byte.
pub const SIGNATURE: &[u8] = b"!!!Version 2 File Format!!!";

/// Expected content of the second header field.
pub const FORMAT_VERSION: &[u8] = b"2.0";

/// A decrypted Password Safe 2.0 database.
#[derive(Debug)]
pub struct LegacyDatabase {
    preferences: LegacyPreferences,
    records: Vec<LegacyRecord>,
}

impl LegacyDatabase {
    pub fn open(path: &Path, password: &str) -> ImportResult<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, password)
    }

    /// Decrypt a database held in memory.
    ///
    /// The password is checked against the header verifier before any field
    /// is decrypted.
    pub fn from_bytes(bytes: &[u8], password: &str) -> ImportResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(ImportError::Format(format!(
                "File is {} bytes, shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let mut rnd = [0u8; BLOCK_LEN];
        rnd.copy_from_slice(&bytes[0..8]);
        let verifier = &bytes[8..28];
        let salt = &bytes[28..48];
        let mut stored_iv = [0u8; BLOCK_LEN];
        stored_iv.copy_from_slice(&bytes[48..56]);

        if compute_verifier(&rnd, password)?.as_slice() != verifier {
            return Err(ImportError::IncorrectPassword);
        }

        let mut cipher = LegacyCipher::new(password, salt, &stored_iv)?;
        let data = &bytes[HEADER_LEN..];

        let signature = next_header_field(&mut cipher, data, 0)?;
        let signed = signature
            .content()
            .get(1..)
            .is_some_and(|rest| rest.starts_with(SIGNATURE));
        if !signed {
            return Err(ImportError::UnsupportedVersion {
                found: signature.text(false),
            });
        }
        let mut offset = signature.cipher_len();

        let version = next_header_field(&mut cipher, data, offset)?;
        if version.content() != FORMAT_VERSION {
            return Err(ImportError::UnsupportedVersion {
                found: version.text(false),
            });
        }
        offset += version.cipher_len();

        let preference_field = next_header_field(&mut cipher, data, offset)?;
        let preferences = LegacyPreferences::parse(&preference_field.text(false))?;
        offset += preference_field.cipher_len();

        let records = read_records(&mut cipher, data, offset)?;
        debug!(
            records = records.len(),
            utf8 = preferences.is_utf8,
            "Decrypted Password Safe 2.0 database"
        );

        Ok(Self {
            preferences,
            records,
        })
    }

    pub fn preferences(&self) -> &LegacyPreferences {
        &self.preferences
    }

    pub fn records(&self) -> &[LegacyRecord] {
        &self.records
    }
}

fn next_header_field(
    cipher: &mut LegacyCipher,
    data: &[u8],
    offset: usize,
) -> ImportResult<LegacyField> {
    LegacyField::read(cipher, data, offset)?.ok_or_else(|| ImportError::UnsupportedVersion {
        found: "missing header field".to_string(),
    })
}
