//! Protobuf messages of the native archive.
//!
//! The outer `Archive` message is stored in the clear; the `Database` message
//! is what gets encrypted into `cipher_text`.

use prost::{Enumeration, Message};

use crate::model::{Attribute, Category, LifetimeUnit, Record};

#[derive(Clone, PartialEq, Message)]
pub struct ArchiveMessage {
    #[prost(string, tag = "1")]
    pub magic: String,
    #[prost(int32, tag = "2")]
    pub version: i32,
    #[prost(int32, tag = "3")]
    pub count: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub salt: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub pass_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub inner_key_cipher: Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    pub outer_key_cipher: Vec<u8>,
    #[prost(bytes = "vec", tag = "8")]
    pub iv: Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    pub cipher_text: Vec<u8>,
    #[prost(bytes = "vec", tag = "10")]
    pub hmac: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct DatabaseMessage {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<EntryMessage>,
}

#[derive(Clone, PartialEq, Message)]
pub struct EntryMessage {
    #[prost(message, repeated, tag = "1")]
    pub features: Vec<FeatureMessage>,
    #[prost(enumeration = "LifetimeUnitCode", tag = "2")]
    pub password_lifetime_units: i32,
    #[prost(int32, tag = "3")]
    pub password_lifetime_count: i32,
    #[prost(bool, tag = "4")]
    pub inactive: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct FeatureMessage {
    #[prost(enumeration = "CategoryCode", tag = "1")]
    pub category: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub content: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum CategoryCode {
    Raw = 0,
    Group = 1,
    Title = 2,
    Username = 3,
    Password = 4,
    Notes = 5,
    Url = 6,
    Created = 7,
    Modified = 8,
    PasswordModified = 9,
    Uuid = 10,
    PasswordLifetimeCount = 11,
    PasswordLifetimeUnits = 12,
    Unknown = 15,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum LifetimeUnitCode {
    Days = 0,
    Weeks = 1,
    Months = 2,
}

impl From<Category> for CategoryCode {
    fn from(category: Category) -> Self {
        match category {
            Category::Raw => CategoryCode::Raw,
            Category::Group => CategoryCode::Group,
            Category::Title => CategoryCode::Title,
            Category::Username => CategoryCode::Username,
            Category::Password => CategoryCode::Password,
            Category::Notes => CategoryCode::Notes,
            Category::Url => CategoryCode::Url,
            Category::CreationTime => CategoryCode::Created,
            Category::ModificationTime => CategoryCode::Modified,
            Category::PasswordChangedTime => CategoryCode::PasswordModified,
            Category::UniqueId => CategoryCode::Uuid,
            Category::PasswordLifetimeCount => CategoryCode::PasswordLifetimeCount,
            Category::PasswordLifetimeUnits => CategoryCode::PasswordLifetimeUnits,
            Category::Unknown => CategoryCode::Unknown,
        }
    }
}

/// Codes written by newer versions decode as [`Category::Unknown`].
fn category_from_code(code: i32) -> Category {
    match CategoryCode::try_from(code) {
        Ok(CategoryCode::Raw) => Category::Raw,
        Ok(CategoryCode::Group) => Category::Group,
        Ok(CategoryCode::Title) => Category::Title,
        Ok(CategoryCode::Username) => Category::Username,
        Ok(CategoryCode::Password) => Category::Password,
        Ok(CategoryCode::Notes) => Category::Notes,
        Ok(CategoryCode::Url) => Category::Url,
        Ok(CategoryCode::Created) => Category::CreationTime,
        Ok(CategoryCode::Modified) => Category::ModificationTime,
        Ok(CategoryCode::PasswordModified) => Category::PasswordChangedTime,
        Ok(CategoryCode::Uuid) => Category::UniqueId,
        Ok(CategoryCode::PasswordLifetimeCount) => Category::PasswordLifetimeCount,
        Ok(CategoryCode::PasswordLifetimeUnits) => Category::PasswordLifetimeUnits,
        Ok(CategoryCode::Unknown) | Err(_) => Category::Unknown,
    }
}

fn lifetime_unit_from_code(code: i32) -> LifetimeUnit {
    match LifetimeUnitCode::try_from(code) {
        Ok(LifetimeUnitCode::Weeks) => LifetimeUnit::Weeks,
        Ok(LifetimeUnitCode::Months) => LifetimeUnit::Months,
        Ok(LifetimeUnitCode::Days) | Err(_) => LifetimeUnit::Days,
    }
}

fn lifetime_unit_code(unit: LifetimeUnit) -> LifetimeUnitCode {
    match unit {
        LifetimeUnit::Days => LifetimeUnitCode::Days,
        LifetimeUnit::Weeks => LifetimeUnitCode::Weeks,
        LifetimeUnit::Months => LifetimeUnitCode::Months,
    }
}

impl From<&Record> for EntryMessage {
    fn from(record: &Record) -> Self {
        Self {
            features: record
                .attributes()
                .iter()
                .map(|attribute| FeatureMessage {
                    category: CategoryCode::from(attribute.category()) as i32,
                    content: attribute.content().to_vec(),
                })
                .collect(),
            password_lifetime_units: lifetime_unit_code(record.password_lifetime_units()) as i32,
            password_lifetime_count: record.password_lifetime_count(),
            inactive: record.is_inactive(),
        }
    }
}

impl From<EntryMessage> for Record {
    fn from(entry: EntryMessage) -> Self {
        let attributes = entry
            .features
            .into_iter()
            .map(|feature| Attribute::new(category_from_code(feature.category), feature.content))
            .collect();
        let mut record = Record::from_attributes(attributes);
        record.set_password_lifetime(
            entry.password_lifetime_count,
            lifetime_unit_from_code(entry.password_lifetime_units),
        );
        record.set_inactive(entry.inactive);
        record
    }
}
