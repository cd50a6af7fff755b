//! Grouping fields into records.

use super::cipher::LegacyCipher;
use super::field::{FieldType, LegacyField};
use crate::error::ImportResult;

/// The fields of one Password Safe record, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    fields: Vec<LegacyField>,
}

impl LegacyRecord {
    pub fn new(fields: Vec<LegacyField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[LegacyField] {
        &self.fields
    }

    /// The last field of `field_type`, matching how later fields override
    /// earlier ones on import.
    pub fn find(&self, field_type: FieldType) -> Option<&LegacyField> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.field_type() == field_type)
    }

    pub fn cipher_len(&self) -> usize {
        self.fields.iter().map(LegacyField::cipher_len).sum()
    }
}

/// Read records from `offset` until the data or an end-of-database marker
/// runs out.
///
/// A record ends at its end-of-record field (kept as the record's last
/// field) or when the stream ends.
pub(crate) fn read_records(
    cipher: &mut LegacyCipher,
    data: &[u8],
    mut offset: usize,
) -> ImportResult<Vec<LegacyRecord>> {
    let mut records = Vec::new();
    let mut current = Vec::new();

    while let Some(field) = LegacyField::read(cipher, data, offset)? {
        offset += field.cipher_len();
        match field.field_type() {
            FieldType::EndOfDatabase => break,
            FieldType::EndOfRecord => {
                current.push(field);
                records.push(LegacyRecord::new(std::mem::take(&mut current)));
            }
            _ => current.push(field),
        }
    }
    if !current.is_empty() {
        records.push(LegacyRecord::new(current));
    }
    Ok(records)
}
