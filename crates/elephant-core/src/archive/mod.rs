//! Native encrypted archives.
//!
//! An [`Archive`] is a [`Database`] plus the credentials (path and password)
//! it was opened or last saved with. The byte-level protocol lives in
//! [`codec`]; this module adds file handling.
//!
//! # Examples
//!
//! ```no_run
//! use elephant_core::archive::{open_archive, save_archive, Archive};
//! use elephant_core::model::{Database, Record};
//!
//! let mut database = Database::new();
//! let mut record = Record::new();
//! record.set_title("Mail");
//! database.add(record);
//!
//! let mut archive = Archive::new(database);
//! save_archive(&mut archive, "vault.pedb", "correct horse battery").unwrap();
//!
//! let reopened = open_archive("vault.pedb", "correct horse battery").unwrap();
//! assert_eq!(reopened.database().len(), 1);
//! ```

pub mod codec;
pub mod wire;

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

pub use codec::{decode_archive, encode_archive, FILE_MAGIC, FILE_VERSION};

use crate::crypto::validate_password;
use crate::error::{ArchiveError, Result};
use crate::fs::write_atomic;
use crate::model::Database;
use crate::settings::ArchiveSettings;

/// A database together with the credentials used to persist it.
#[derive(Debug)]
pub struct Archive {
    path: Option<PathBuf>,
    password: Option<SecretString>,
    database: Database,
}

impl Archive {
    /// An archive with no credentials; it cannot [`save`](Self::save) until
    /// [`set_credentials`](Self::set_credentials) is called.
    pub fn new(database: Database) -> Self {
        Self {
            path: None,
            password: None,
            database,
        }
    }

    /// Read and decrypt the archive at `path`.
    pub fn open(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let database = decode_archive(&bytes, password)?;
        info!(path = %path.display(), records = database.len(), "Opened archive");

        Ok(Self {
            path: Some(path.to_path_buf()),
            password: Some(SecretString::from(password.to_string())),
            database,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    pub fn into_database(self) -> Database {
        self.database
    }

    /// Where the archive was last opened from or saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether both a path and a password are known.
    pub fn can_save(&self) -> bool {
        self.path.is_some() && self.password.is_some()
    }

    pub fn set_credentials(&mut self, path: impl Into<PathBuf>, password: &str) {
        self.path = Some(path.into());
        self.password = Some(SecretString::from(password.to_string()));
    }

    /// Save to the stored path with the stored password and default settings.
    pub fn save(&self) -> Result<()> {
        self.save_with(&ArchiveSettings::default())
    }

    /// Save to the stored path with the stored password.
    pub fn save_with(&self, settings: &ArchiveSettings) -> Result<()> {
        let (path, password) = match (&self.path, &self.password) {
            (Some(path), Some(password)) => (path, password),
            _ => {
                return Err(ArchiveError::InvalidInput(
                    "Archive has no path or password to save with".to_string(),
                ))
            }
        };
        write_archive(&self.database, path, password.expose_secret(), settings)
    }
}

/// Open the archive at `path`.
pub fn open_archive(path: impl AsRef<Path>, password: &str) -> Result<Archive> {
    Archive::open(path, password)
}

/// Save `archive` to `path` under `password` with default settings.
///
/// On success the archive remembers `path` and `password`, so later calls to
/// [`Archive::save`] write to the same place.
pub fn save_archive(archive: &mut Archive, path: impl AsRef<Path>, password: &str) -> Result<()> {
    save_archive_with(archive, path, password, &ArchiveSettings::default())
}

/// [`save_archive`] with explicit settings.
pub fn save_archive_with(
    archive: &mut Archive,
    path: impl AsRef<Path>,
    password: &str,
    settings: &ArchiveSettings,
) -> Result<()> {
    let path = path.as_ref();
    write_archive(&archive.database, path, password, settings)?;
    archive.set_credentials(path, password);
    Ok(())
}

fn write_archive(
    database: &Database,
    path: &Path,
    password: &str,
    settings: &ArchiveSettings,
) -> Result<()> {
    validate_password(password, settings.min_password_length)?;
    let bytes = encode_archive(database, password, settings)?;
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), records = database.len(), "Saved archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    const PASSWORD: &str = "archive-password";

    fn fast() -> ArchiveSettings {
        ArchiveSettings {
            stretch_iterations: 8,
            ..ArchiveSettings::default()
        }
    }

    fn one_record() -> Database {
        let mut database = Database::new();
        let mut record = Record::new();
        record.set_title("Router");
        record.set_password("admin-admin");
        database.add(record);
        database
    }

    #[test]
    fn test_new_archive_cannot_save() {
        let archive = Archive::new(one_record());
        assert!(!archive.can_save());
        assert!(archive.path().is_none());
        assert!(matches!(
            archive.save_with(&fast()),
            Err(ArchiveError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_save_archive_stores_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.pedb");
        let mut archive = Archive::new(one_record());

        save_archive_with(&mut archive, &path, PASSWORD, &fast()).unwrap();
        assert!(archive.can_save());
        assert_eq!(archive.path(), Some(path.as_path()));

        archive.database_mut().add(Record::new());
        archive.save_with(&fast()).unwrap();

        let reopened = open_archive(&path, PASSWORD).unwrap();
        assert_eq!(reopened.database().len(), 2);
        assert!(reopened.can_save());
    }

    #[test]
    fn test_failed_save_keeps_old_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = Archive::new(one_record());

        let strict = ArchiveSettings {
            min_password_length: 8,
            ..fast()
        };

        let result = save_archive_with(&mut archive, dir.path().join("a.pedb"), "short", &strict);
        assert!(matches!(result, Err(ArchiveError::InvalidInput(_))));
        assert!(!archive.can_save());
        assert!(!dir.path().join("a.pedb").exists());
    }

    #[test]
    fn test_short_and_empty_passwords_save_by_default() {
        let dir = tempfile::tempdir().unwrap();
        for (name, password) in [("short.pedb", "hunter2"), ("empty.pedb", "")] {
            let path = dir.path().join(name);
            let mut archive = Archive::new(one_record());
            save_archive_with(&mut archive, &path, password, &fast()).unwrap();

            let reopened = open_archive(&path, password).unwrap();
            assert_eq!(reopened.database(), archive.database());
        }
    }

    #[test]
    fn test_open_missing_file_is_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_archive(dir.path().join("missing.pedb"), PASSWORD);
        assert!(matches!(result, Err(ArchiveError::System(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let mut archive = Archive::new(Database::new());
        archive.set_credentials("vault.pedb", "super-secret-value");
        let output = format!("{:?}", archive);
        assert!(!output.contains("super-secret-value"));
    }
}
