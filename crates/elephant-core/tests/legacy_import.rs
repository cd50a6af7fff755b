use std::fs;

use elephant_core::settings::ImportSettings;
use elephant_core::{import_legacy, import_legacy_with, Category, ImportError};

/// A Password Safe 2.0 file with master password `masterpass`, written by a
/// separate Blowfish implementation. UTF-8 preference set; one record with a
/// title, username, password and two-line notes.
const PASSWORD_SAFE_2_FILE: &str = concat!(
    "0f1e2d3c4b5a69781baf3c30a9874775c5f7310540b0398b32104b2200112233",
    "445566778899aabbccddeeff012345678877665544332211d933e08aa3fc3f61",
    "945270591ceb648de2b60436132c711b23dad0a1ac98c9e94c3a62af0a60878d",
    "114c2c1bb61315a1289f4ac04836f258feb0fcb802d01ccd8bb3f0a3a5dc8871",
    "040a1cc0e03e88b8af501a63ae894efd3ea8902e3b2c8727b2f796ae6ce2f103",
    "82c75c474ee703ec0c5d4d1a6c6dd8c9c52e569a64c7f47925d571e8361f47d3",
    "f226883624acfc4a7f8695b4e0a61ebf4233e5cd7f90c8eb4af780c4931981d8",
    "2bfaebfe4277942816a379f6e64bd7c06bb4c77dea3e00254d11215089727a92",
    "8167e3962c1ae530493589c66b0b2c916cfa6902eb0a52b0",
);

#[test]
fn test_import_externally_written_file() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("gorilla.dat");
    let bytes = hex::decode(PASSWORD_SAFE_2_FILE).expect("fixture should be valid hex");
    assert_eq!(bytes.len(), 280);
    fs::write(&path, &bytes).expect("write should succeed");

    let archive = import_legacy(&path, "masterpass").expect("import should succeed");
    let database = archive.database();
    assert_eq!(database.len(), 1);

    let record = &database.records()[0];
    assert_eq!(record.title().as_deref(), Some("PasswordGorilla"));
    assert_eq!(record.username().as_deref(), Some("ImportUser"));
    assert_eq!(record.password().as_deref(), Some("Secret!"));
    assert_eq!(record.notes().as_deref(), Some("Two lines\nof notes"));
    assert!(record.find(Category::Unknown).is_none());
}

#[test]
fn test_import_externally_written_file_wrong_password() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("gorilla.dat");
    let bytes = hex::decode(PASSWORD_SAFE_2_FILE).expect("fixture should be valid hex");
    fs::write(&path, &bytes).expect("write should succeed");

    let result = import_legacy(&path, "masterpas");
    assert!(matches!(result, Err(ImportError::IncorrectPassword)));
}

#[test]
fn test_import_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let result = import_legacy(dir.path().join("missing.dat"), "masterpass");
    assert!(matches!(result, Err(ImportError::System(_))));
}

#[test]
fn test_import_truncated_header_fails() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("short.dat");
    fs::write(&path, b"not a password safe file").expect("write should succeed");

    let result = import_legacy(&path, "masterpass");
    assert!(matches!(result, Err(ImportError::Format(_))));
}

#[test]
fn test_import_foreign_file_is_incorrect_password() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("garbage.dat");
    let garbage: Vec<u8> = (0u8..=255).cycle().take(512).collect();
    fs::write(&path, &garbage).expect("write should succeed");

    let strict = ImportSettings {
        strict_fields: true,
        keep_timestamps: true,
    };
    match import_legacy_with(&path, "masterpass", &strict) {
        Err(err) => {
            assert!(matches!(err, ImportError::IncorrectPassword));
            assert!(err.is_retryable());
        }
        Ok(_) => panic!("garbage should not import"),
    }
}
