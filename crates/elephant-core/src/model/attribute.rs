//! Attributes: the smallest unit of entry data.
//!
//! An attribute pairs a [`Category`] with opaque content bytes. How the bytes
//! are read depends on the category: text categories hold UTF-8, lifetime
//! counts hold little-endian integers, and time categories hold the 7-byte
//! calendar encoding produced by [`encode_date`].

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

/// Length of the native calendar date encoding.
pub const DATE_LENGTH: usize = 7;

/// What an attribute's content means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Raw,
    Group,
    Title,
    Username,
    Password,
    Notes,
    Url,
    CreationTime,
    ModificationTime,
    PasswordChangedTime,
    UniqueId,
    PasswordLifetimeCount,
    PasswordLifetimeUnits,
    Unknown,
}

impl Category {
    /// Categories whose content is a 7-byte calendar date.
    pub fn is_time(self) -> bool {
        matches!(
            self,
            Category::CreationTime | Category::ModificationTime | Category::PasswordChangedTime
        )
    }

    /// Categories whose content is printable text.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Category::Group
                | Category::Title
                | Category::Username
                | Category::Password
                | Category::Notes
                | Category::Url
                | Category::PasswordLifetimeUnits
        )
    }

    fn is_secret(self) -> bool {
        matches!(self, Category::Password)
    }
}

/// One typed unit of record data.
#[derive(Clone, PartialEq, Eq)]
pub struct Attribute {
    category: Category,
    content: Vec<u8>,
}

impl Attribute {
    pub fn new(category: Category, content: impl Into<Vec<u8>>) -> Self {
        Self {
            category,
            content: content.into(),
        }
    }

    pub fn text(category: Category, value: &str) -> Self {
        Self::new(category, value.as_bytes())
    }

    pub fn date(category: Category, value: DateTime<Utc>) -> Self {
        Self::new(category, encode_date(value).to_vec())
    }

    /// Little-endian integer content.
    pub fn integer(category: Category, value: i64) -> Self {
        Self::new(category, value.to_le_bytes().to_vec())
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Content as UTF-8, or `None` if it is not valid UTF-8.
    pub fn as_text(&self) -> Option<String> {
        String::from_utf8(self.content.clone()).ok()
    }

    /// Content decoded as a 7-byte calendar date.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        decode_date(&self.content)
    }

    /// Content decoded as a little-endian integer of up to 8 bytes.
    pub fn as_integer(&self) -> Option<i64> {
        if self.content.is_empty() || self.content.len() > 8 {
            return None;
        }
        let mut bytes = [0u8; 8];
        bytes[..self.content.len()].copy_from_slice(&self.content);
        Some(i64::from_le_bytes(bytes))
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Attribute");
        out.field("category", &self.category);
        if self.category.is_secret() {
            out.field("content", &"[REDACTED]");
        } else if let Some(date) = self.category.is_time().then(|| self.as_date()).flatten() {
            out.field("content", &date);
        } else if let Some(text) = self.category.is_text().then(|| self.as_text()).flatten() {
            out.field("content", &text);
        } else {
            out.field("content_len", &self.content.len());
        }
        out.finish()
    }
}

/// Encode a UTC timestamp as `[year_lo, year_hi, month, day, hour, minute, second]`.
///
/// Sub-second precision is dropped. Years outside `0..=65535` are clamped.
pub fn encode_date(date: DateTime<Utc>) -> [u8; DATE_LENGTH] {
    let year = date.year().clamp(0, i32::from(u16::MAX)) as u16;
    let [year_lo, year_hi] = year.to_le_bytes();
    [
        year_lo,
        year_hi,
        date.month() as u8,
        date.day() as u8,
        date.hour() as u8,
        date.minute() as u8,
        date.second() as u8,
    ]
}

/// Decode the 7-byte calendar encoding. Returns `None` for short content or
/// impossible calendar values.
pub fn decode_date(content: &[u8]) -> Option<DateTime<Utc>> {
    if content.len() < DATE_LENGTH {
        return None;
    }
    let year = i32::from(u16::from_le_bytes([content[0], content[1]]));
    let naive = NaiveDate::from_ymd_opt(year, u32::from(content[2]), u32::from(content[3]))?
        .and_hms_opt(
            u32::from(content[4]),
            u32::from(content[5]),
            u32::from(content[6]),
        )?;
    Some(Utc.from_utc_datetime(&naive))
}
