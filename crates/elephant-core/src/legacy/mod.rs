//! One-way import of Password Safe 2.0 databases.
//!
//! Files written by Password Safe 2.x and Password Gorilla are decrypted into
//! [`LegacyDatabase`] and converted into a native [`Archive`]. The imported
//! archive has no credentials; the caller picks a path and password for it.
//!
//! # Field mapping
//!
//! | Password Safe field      | Imported as                                 |
//! |--------------------------|---------------------------------------------|
//! | Group, Title, Username   | same category                               |
//! | Password, Notes, URL     | same category                               |
//! | CreationTime             | CreationTime, with `keep_timestamps`        |
//! | PasswordModificationTime | PasswordChangedTime, with `keep_timestamps` |
//! | LastModificationTime     | ModificationTime, with `keep_timestamps`    |
//! | LastAccessTime           | dropped                                     |
//! | UUID, lifetime, policy   | dropped                                     |
//! | unknown types            | Unknown, or an error with `strict_fields`   |
//!
//! A record holds one attribute per category, so unknown fields collapse: the
//! last one in the record wins and its type code is not kept.

pub mod cipher;
pub mod database;
pub mod field;
pub mod preferences;
pub mod record;

#[cfg(test)]
pub(crate) mod fixture;

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub use database::LegacyDatabase;
pub use field::{FieldType, LegacyField};
pub use preferences::LegacyPreferences;
pub use record::LegacyRecord;

use crate::archive::Archive;
use crate::error::{ImportError, ImportResult};
use crate::model::{Attribute, Category, Database, Record};
use crate::settings::ImportSettings;

/// Import the Password Safe 2.0 database at `path` with default settings.
pub fn import_legacy(path: impl AsRef<Path>, password: &str) -> ImportResult<Archive> {
    import_legacy_with(path, password, &ImportSettings::default())
}

/// Import the Password Safe 2.0 database at `path`.
pub fn import_legacy_with(
    path: impl AsRef<Path>,
    password: &str,
    settings: &ImportSettings,
) -> ImportResult<Archive> {
    let path = path.as_ref();
    let legacy = LegacyDatabase::open(path, password)?;
    let database = convert_database(&legacy, settings)?;
    info!(
        path = %path.display(),
        records = database.len(),
        "Imported Password Safe database"
    );
    Ok(Archive::new(database))
}

/// Convert decrypted legacy records into the native model.
pub fn convert_database(
    legacy: &LegacyDatabase,
    settings: &ImportSettings,
) -> ImportResult<Database> {
    let is_utf8 = legacy.preferences().is_utf8;
    let records = legacy
        .records()
        .iter()
        .map(|record| convert_record(record, is_utf8, settings))
        .collect::<ImportResult<Vec<_>>>()?;
    Ok(Database::from_records(records))
}

/// Build a native record from one legacy record.
///
/// The record starts out stamped with the import time; fields are applied in
/// file order, so a repeated field overrides the earlier one. A kept
/// last-modification time is applied after everything else.
pub fn convert_record(
    legacy: &LegacyRecord,
    is_utf8: bool,
    settings: &ImportSettings,
) -> ImportResult<Record> {
    let mut record = Record::new();
    let mut modified: Option<DateTime<Utc>> = None;

    for field in legacy.fields() {
        let category = match field.field_type() {
            FieldType::Group => Category::Group,
            FieldType::Title => Category::Title,
            FieldType::Username => Category::Username,
            FieldType::Password => Category::Password,
            FieldType::Notes => Category::Notes,
            FieldType::Url => Category::Url,
            FieldType::CreationTime | FieldType::PasswordModificationTime
                if settings.keep_timestamps =>
            {
                let category = if field.field_type() == FieldType::CreationTime {
                    Category::CreationTime
                } else {
                    Category::PasswordChangedTime
                };
                match field.epoch_date() {
                    Some(date) => record.replace(Attribute::date(category, date)),
                    None => warn!(raw_type = field.raw_type(), "Dropping malformed timestamp"),
                }
                continue;
            }
            FieldType::LastModificationTime if settings.keep_timestamps => {
                modified = field.epoch_date();
                continue;
            }
            FieldType::Unknown if settings.strict_fields => {
                return Err(ImportError::UnsupportedField {
                    raw_type: field.raw_type(),
                });
            }
            FieldType::Unknown => {
                warn!(
                    raw_type = field.raw_type(),
                    "Keeping unrecognised field as opaque data"
                );
                record.replace(Attribute::new(Category::Unknown, field.content()));
                continue;
            }
            _ => continue,
        };

        let content = if is_utf8 {
            field.content().to_vec()
        } else {
            field.text(false).into_bytes()
        };
        record.replace(Attribute::new(category, content));
    }

    if let Some(date) = modified {
        record.replace(Attribute::date(Category::ModificationTime, date));
    }
    Ok(record)
}
