//! Encryption protocol of the native archive.
//!
//! ## Write
//!
//! 1. Stretch the password with a fresh 32-byte salt.
//! 2. Store `SHA-256(stretched key)` as the password check.
//! 3. Draw independent inner (confidentiality) and outer (integrity) keys and
//!    wrap each under the stretched key as two separate AES-256-ECB blocks.
//! 4. Serialize the database and encrypt it with AES-256-CBC under the inner
//!    key, using a fresh IV and PKCS7 padding.
//! 5. HMAC-SHA256 the concatenated plaintext content of every attribute, in
//!    record order, under the outer key.
//!
//! ## Read
//!
//! The same steps in reverse, failing at the first problem: bad magic, wrong
//! version, wrong password (checked before any decryption), bad padding or
//! payload, and finally an HMAC mismatch once the payload fully parsed.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use prost::Message;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use super::wire::{ArchiveMessage, DatabaseMessage, EntryMessage};
use crate::crypto::random::random_key;
use crate::crypto::{random_array, stretch, StretchedKey};
use crate::error::{ArchiveError, Result};
use crate::model::{Database, Record};
use crate::settings::ArchiveSettings;

/// Magic string at the start of every archive.
pub const FILE_MAGIC: &str = "PEDB";

/// The only archive version this codec reads and writes.
pub const FILE_VERSION: i32 = 1;

const SALT_LENGTH: usize = 32;
const HASH_LENGTH: usize = 32;
const KEY_LENGTH: usize = 32;
const IV_LENGTH: usize = 16;
const AES_BLOCK: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Encrypt `database` under `password` into archive bytes.
pub fn encode_archive(
    database: &Database,
    password: &str,
    settings: &ArchiveSettings,
) -> Result<Vec<u8>> {
    settings.validate()?;
    let count = settings.stretch_iterations;

    let salt: [u8; SALT_LENGTH] = random_array()?;
    debug!(iterations = count, "Stretching password");
    let stretched = stretch(password, &salt, count);
    let key_engine = Aes256::new(GenericArray::from_slice(stretched.as_bytes()));

    let inner_key = random_key::<KEY_LENGTH>()?;
    let outer_key = random_key::<KEY_LENGTH>()?;
    let iv: [u8; IV_LENGTH] = random_array()?;

    let mut mac = hmac_engine(&outer_key)?;
    let payload = Zeroizing::new(serialize_database(database, &mut mac));
    let cipher_text = Aes256CbcEnc::new(
        GenericArray::from_slice(inner_key.as_slice()),
        GenericArray::from_slice(&iv),
    )
    .encrypt_padded_vec_mut::<Pkcs7>(&payload);

    let message = ArchiveMessage {
        magic: FILE_MAGIC.to_string(),
        version: FILE_VERSION,
        count: i32::try_from(count)
            .map_err(|_| ArchiveError::InvalidInput("Iteration count too large".to_string()))?,
        salt: salt.to_vec(),
        pass_hash: stretched.verification_hash().to_vec(),
        inner_key_cipher: wrap_key(&key_engine, &inner_key),
        outer_key_cipher: wrap_key(&key_engine, &outer_key),
        iv: iv.to_vec(),
        cipher_text,
        hmac: mac.finalize().into_bytes().to_vec(),
    };

    debug!(
        records = database.len(),
        payload_bytes = message.cipher_text.len(),
        "Archive encoded"
    );
    Ok(message.encode_to_vec())
}

/// Decrypt and authenticate archive bytes.
pub fn decode_archive(bytes: &[u8], password: &str) -> Result<Database> {
    let message = ArchiveMessage::decode(bytes)?;

    if message.magic != FILE_MAGIC {
        return Err(ArchiveError::Format(
            "File does not start with correct magic string".to_string(),
        ));
    }
    if message.version != FILE_VERSION {
        return Err(ArchiveError::UnsupportedVersion {
            found: message.version,
            expected: FILE_VERSION,
        });
    }
    check_layout(&message)?;

    let count = u32::try_from(message.count)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| {
            ArchiveError::Format(format!("Invalid iteration count {}", message.count))
        })?;
    debug!(iterations = count, "Stretching password");
    let stretched: StretchedKey = stretch(password, &message.salt, count);
    if !stretched.matches(&message.pass_hash) {
        return Err(ArchiveError::IncorrectPassword);
    }

    let key_engine = Aes256::new(GenericArray::from_slice(stretched.as_bytes()));
    let inner_key = unwrap_key(&key_engine, &message.inner_key_cipher);
    let outer_key = unwrap_key(&key_engine, &message.outer_key_cipher);

    let payload = Zeroizing::new(
        Aes256CbcDec::new(
            GenericArray::from_slice(inner_key.as_slice()),
            GenericArray::from_slice(&message.iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(&message.cipher_text)
        .map_err(|_| ArchiveError::Format("Payload padding is invalid".to_string()))?,
    );

    let mut mac = hmac_engine(&outer_key)?;
    let database = deserialize_database(&payload, &mut mac)?;
    mac.verify_slice(&message.hmac)
        .map_err(|_| ArchiveError::HmacFailure)?;

    debug!(records = database.len(), "Archive decoded");
    Ok(database)
}

fn check_layout(message: &ArchiveMessage) -> Result<()> {
    let checks = [
        ("salt", message.salt.len(), SALT_LENGTH),
        ("passHash", message.pass_hash.len(), HASH_LENGTH),
        ("innerKeyCipher", message.inner_key_cipher.len(), KEY_LENGTH),
        ("outerKeyCipher", message.outer_key_cipher.len(), KEY_LENGTH),
        ("iv", message.iv.len(), IV_LENGTH),
    ];
    for (name, found, expected) in checks {
        if found != expected {
            return Err(ArchiveError::Format(format!(
                "Field {} has {} bytes (expected {})",
                name, found, expected
            )));
        }
    }
    if message.cipher_text.is_empty() || message.cipher_text.len() % AES_BLOCK != 0 {
        return Err(ArchiveError::Format(format!(
            "Payload length {} is not a positive multiple of {}",
            message.cipher_text.len(),
            AES_BLOCK
        )));
    }
    Ok(())
}

/// Encrypt the two 16-byte halves of `key` as independent ECB blocks.
fn wrap_key(engine: &Aes256, key: &[u8; KEY_LENGTH]) -> Vec<u8> {
    let mut wrapped = key.to_vec();
    for block in wrapped.chunks_exact_mut(AES_BLOCK) {
        engine.encrypt_block(GenericArray::from_mut_slice(block));
    }
    wrapped
}

/// Inverse of [`wrap_key`]. `wrapped` is known to be `KEY_LENGTH` bytes.
fn unwrap_key(engine: &Aes256, wrapped: &[u8]) -> Zeroizing<[u8; KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    key.copy_from_slice(wrapped);
    for block in key.chunks_exact_mut(AES_BLOCK) {
        engine.decrypt_block(GenericArray::from_mut_slice(block));
    }
    key
}

fn hmac_engine(key: &[u8; KEY_LENGTH]) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| ArchiveError::System(format!("HMAC initialisation failed: {}", e)))
}

/// Serialize records, feeding every attribute's content to `mac` on the way.
fn serialize_database(database: &Database, mac: &mut HmacSha256) -> Vec<u8> {
    let message = DatabaseMessage {
        entries: database
            .iter()
            .map(|record| {
                for attribute in record.attributes() {
                    mac.update(attribute.content());
                }
                EntryMessage::from(record)
            })
            .collect(),
    };
    message.encode_to_vec()
}

fn deserialize_database(payload: &[u8], mac: &mut HmacSha256) -> Result<Database> {
    let message = DatabaseMessage::decode(payload)
        .map_err(|e| ArchiveError::Format(format!("Malformed payload: {}", e)))?;

    let records = message
        .entries
        .into_iter()
        .map(|entry| {
            let record = Record::from(entry);
            for attribute in record.attributes() {
                mac.update(attribute.content());
            }
            record
        })
        .collect();
    Ok(Database::from_records(records))
}
