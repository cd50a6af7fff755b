//! Writer for Password Safe 2.0 test files.

use super::cipher::{compute_verifier, LegacyEncryptor, BLOCK_LEN};
use super::field::padded_len;

pub(crate) const TYPE_GROUP: u8 = 2;
pub(crate) const TYPE_TITLE: u8 = 3;
pub(crate) const TYPE_USERNAME: u8 = 4;
pub(crate) const TYPE_NOTES: u8 = 5;
pub(crate) const TYPE_PASSWORD: u8 = 6;
pub(crate) const TYPE_CREATION_TIME: u8 = 7;
pub(crate) const TYPE_PASSWORD_MODIFICATION_TIME: u8 = 8;
pub(crate) const TYPE_LAST_ACCESS_TIME: u8 = 9;
pub(crate) const TYPE_LAST_MODIFICATION_TIME: u8 = 12;
pub(crate) const TYPE_URL: u8 = 13;
pub(crate) const TYPE_UUID: u8 = 1;
pub(crate) const TYPE_END_OF_RECORD: u8 = 255;

const RND: [u8; 8] = [0x13, 0x57, 0x9b, 0xdf, 0x02, 0x46, 0x8a, 0xce];
const SALT: [u8; 20] = [
    0x5a, 0x11, 0x7e, 0x42, 0x90, 0x0d, 0xc3, 0x28, 0x6b, 0xf4, 0x81, 0x3a, 0xe7, 0x55, 0x0c,
    0x99, 0x2f, 0xb6, 0x48, 0x71,
];
const STORED_IV: [u8; 8] = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67];

/// A Password Safe 2.0 file described field by field.
#[derive(Debug, Clone)]
pub(crate) struct LegacyFixture {
    pub password: String,
    pub signature: Vec<u8>,
    pub version: Vec<u8>,
    pub preferences: String,
    /// `(type code, content)` per field, per record.
    pub records: Vec<Vec<(u8, Vec<u8>)>>,
}

impl LegacyFixture {
    pub fn new(password: &str, preferences: &str) -> Self {
        Self {
            password: password.to_string(),
            signature: b" !!!Version 2 File Format!!! Please upgrade to PasswordSafe 2.0 or later"
                .to_vec(),
            version: b"2.0".to_vec(),
            preferences: preferences.to_string(),
            records: Vec::new(),
        }
    }

    /// The single-record database exported by Password Gorilla with the
    /// master password `masterpass`.
    pub fn gorilla() -> Self {
        let mut fixture = Self::new("masterpass", "B 24 1");
        fixture.records.push(vec![
            (TYPE_UUID, vec![0xab; 16]),
            (TYPE_TITLE, b"PasswordGorilla".to_vec()),
            (TYPE_URL, b"https://somewhere.secure/".to_vec()),
            (TYPE_USERNAME, b"ImportUser".to_vec()),
            (TYPE_PASSWORD, b"Secret!".to_vec()),
            (TYPE_NOTES, b"A few notes.".to_vec()),
            (TYPE_CREATION_TIME, 1_507_600_000u32.to_le_bytes().to_vec()),
            (TYPE_LAST_ACCESS_TIME, 1_507_650_000u32.to_le_bytes().to_vec()),
            (TYPE_END_OF_RECORD, Vec::new()),
        ]);
        fixture
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&RND);
        out.extend_from_slice(&compute_verifier(&RND, &self.password).unwrap());
        out.extend_from_slice(&SALT);
        out.extend_from_slice(&STORED_IV);

        let mut cipher = LegacyEncryptor::new(&self.password, &SALT, &STORED_IV).unwrap();
        let mut push = |raw_type: u8, content: &[u8]| {
            let mut field = vec![0u8; BLOCK_LEN + padded_len(content.len())];
            field[..4].copy_from_slice(&(content.len() as u32).to_le_bytes());
            field[4] = raw_type;
            field[BLOCK_LEN..BLOCK_LEN + content.len()].copy_from_slice(content);
            cipher.encrypt(&mut field);
            out.extend_from_slice(&field);
        };

        push(0, &self.signature);
        push(0, &self.version);
        push(0, self.preferences.as_bytes());
        for record in &self.records {
            for (raw_type, content) in record {
                push(*raw_type, content);
            }
        }
        out
    }
}
