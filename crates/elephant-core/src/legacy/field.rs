//! Password Safe 2.0 fields.
//!
//! Each field is one header block (content length in bytes 0-1, little
//! endian; type code in byte 4) followed by the content padded to whole
//! blocks. An empty field still occupies one content block.

use chrono::{DateTime, Utc};

use super::cipher::{LegacyCipher, BLOCK_LEN};
use crate::error::{ImportError, ImportResult};

/// Field type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Magic,
    Uuid,
    Group,
    Title,
    Username,
    Notes,
    Password,
    CreationTime,
    PasswordModificationTime,
    LastAccessTime,
    PasswordLifetime,
    PasswordPolicy,
    LastModificationTime,
    Url,
    EndOfDatabase,
    EndOfRecord,
    Unknown,
}

impl FieldType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => FieldType::Magic,
            1 => FieldType::Uuid,
            2 => FieldType::Group,
            3 => FieldType::Title,
            4 => FieldType::Username,
            5 => FieldType::Notes,
            6 => FieldType::Password,
            7 => FieldType::CreationTime,
            8 => FieldType::PasswordModificationTime,
            9 => FieldType::LastAccessTime,
            10 => FieldType::PasswordLifetime,
            11 => FieldType::PasswordPolicy,
            12 => FieldType::LastModificationTime,
            13 => FieldType::Url,
            254 => FieldType::EndOfDatabase,
            255 => FieldType::EndOfRecord,
            _ => FieldType::Unknown,
        }
    }
}

/// One decrypted field.
#[derive(Clone, PartialEq, Eq)]
pub struct LegacyField {
    field_type: FieldType,
    raw_type: u8,
    content: Vec<u8>,
    cipher_len: usize,
}

impl LegacyField {
    /// Decrypt the field starting at `offset` of `data`.
    ///
    /// Returns `None` when fewer than one block remains. The cipher must be
    /// positioned at `offset`: fields are read strictly in order.
    pub(crate) fn read(
        cipher: &mut LegacyCipher,
        data: &[u8],
        offset: usize,
    ) -> ImportResult<Option<Self>> {
        let header_end = offset + BLOCK_LEN;
        if header_end > data.len() {
            return Ok(None);
        }

        let mut header = [0u8; BLOCK_LEN];
        header.copy_from_slice(&data[offset..header_end]);
        cipher.decrypt(&mut header);
        let length = usize::from(u16::from_le_bytes([header[0], header[1]]));
        let raw_type = header[4];

        let padded = padded_len(length);
        let content_end = header_end + padded;
        if content_end > data.len() {
            return Err(ImportError::Format(format!(
                "Field at offset {} claims {} bytes but only {} remain",
                offset,
                length,
                data.len() - header_end
            )));
        }

        let mut content = data[header_end..content_end].to_vec();
        cipher.decrypt(&mut content);
        content.truncate(length);

        Ok(Some(Self {
            field_type: FieldType::from_code(raw_type),
            raw_type,
            content,
            cipher_len: BLOCK_LEN + padded,
        }))
    }

    #[cfg(test)]
    pub(crate) fn new(raw_type: u8, content: Vec<u8>) -> Self {
        let cipher_len = BLOCK_LEN + padded_len(content.len());
        Self {
            field_type: FieldType::from_code(raw_type),
            raw_type,
            content,
            cipher_len,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn raw_type(&self) -> u8 {
        self.raw_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Bytes this field occupied in the encrypted stream, header included.
    pub fn cipher_len(&self) -> usize {
        self.cipher_len
    }

    /// Content as text: UTF-8 when the file says so, Latin-1 otherwise.
    pub fn text(&self, is_utf8: bool) -> String {
        if is_utf8 {
            String::from_utf8_lossy(&self.content).into_owned()
        } else {
            latin1_to_string(&self.content)
        }
    }

    /// Content as a 4-byte little-endian count of seconds since the epoch.
    pub fn epoch_date(&self) -> Option<DateTime<Utc>> {
        let bytes: [u8; 4] = self.content.get(..4)?.try_into().ok()?;
        DateTime::from_timestamp(i64::from(u32::from_le_bytes(bytes)), 0)
    }
}

impl std::fmt::Debug for LegacyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("LegacyField");
        out.field("field_type", &self.field_type)
            .field("raw_type", &self.raw_type);
        if self.field_type == FieldType::Password {
            out.field("content", &"[REDACTED]");
        } else {
            out.field("content_len", &self.content.len());
        }
        out.field("cipher_len", &self.cipher_len).finish()
    }
}

/// Content length rounded up to whole blocks, never less than one block.
pub(crate) fn padded_len(length: usize) -> usize {
    length.div_ceil(BLOCK_LEN).max(1) * BLOCK_LEN
}

pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}
