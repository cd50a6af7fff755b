//! In-memory record model.
//!
//! A [`Database`] holds [`Record`]s; a record holds [`Attribute`]s. Both
//! codecs (native archive and Password Safe import) produce this model, and
//! the native archive serializes it.

pub mod attribute;
pub mod database;
pub mod observers;
pub mod record;

pub use attribute::{decode_date, encode_date, Attribute, Category, DATE_LENGTH};
pub use database::{Database, DatabaseEvent};
pub use observers::SubscriptionHandle;
pub use record::{LifetimeUnit, Record, RecordId};
