//! # Elephant Core
//!
//! Core library for Password Elephant - an encrypted password manager.
//!
//! This crate owns the data model, the native encrypted archive format and the
//! one-way Password Safe 2.0 importer. It has no user interface; the host
//! application drives it through the functions re-exported here.
//!
//! ## Architecture
//!
//! - **model**: Records, attributes and the observable record database
//! - **archive**: Native encrypted archive (`PEDB`) reading and writing
//! - **legacy**: Password Safe 2.0 import
//! - **crypto**: Password stretching, SHA-1 variant, randomness
//! - **settings**: TOML-loadable tuning for the codecs
//! - **fs**: Atomic file replacement
//!
//! The library emits `tracing` events and never installs a subscriber.

pub mod archive;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod legacy;
pub mod model;
pub mod settings;

pub use archive::{open_archive, save_archive, save_archive_with, Archive};
pub use error::{ArchiveError, ImportError, ImportResult, Result};
pub use legacy::{import_legacy, import_legacy_with};
pub use model::{Attribute, Category, Database, DatabaseEvent, Record, RecordId};
pub use settings::ElephantSettings;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
