//! Records: one password-manager item.

use chrono::{DateTime, Duration, Months, Utc};
use uuid::Uuid;

use super::attribute::{Attribute, Category};

/// Identity of a record within a [`Database`](super::Database).
///
/// Identities are assigned at construction and are not persisted: two
/// records with identical content are still distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl RecordId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unit of a record's password lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifetimeUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

/// An ordered set of attributes with at most one attribute per category.
///
/// Every category-scoped replacement also refreshes the `ModificationTime`
/// attribute, which is always kept last.
#[derive(Debug, Clone)]
pub struct Record {
    id: RecordId,
    attributes: Vec<Attribute>,
    password_lifetime_count: i32,
    password_lifetime_units: LifetimeUnit,
    inactive: bool,
}

impl Record {
    /// A new record stamped with its creation (and modification) time.
    pub fn new() -> Self {
        let mut record = Self::from_attributes(Vec::new());
        record.replace(Attribute::date(Category::CreationTime, Utc::now()));
        record
    }

    /// Rebuild a record from stored attributes without stamping any times.
    pub fn from_attributes(attributes: Vec<Attribute>) -> Self {
        Self {
            id: RecordId::generate(),
            attributes,
            password_lifetime_count: 0,
            password_lifetime_units: LifetimeUnit::Days,
            inactive: false,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The attribute of `category`, if present.
    pub fn find(&self, category: Category) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.category() == category)
    }

    /// Replace the attribute of the same category and refresh the
    /// modification time.
    pub fn replace(&mut self, attribute: Attribute) {
        let category = attribute.category();
        self.attributes.retain(|existing| {
            existing.category() != category && existing.category() != Category::ModificationTime
        });
        self.attributes.push(attribute);
        if category != Category::ModificationTime {
            self.attributes
                .push(Attribute::date(Category::ModificationTime, Utc::now()));
        }
    }

    /// Copy every category present in `other` into this record.
    ///
    /// `other`'s own modification time is ignored; this record gets a fresh
    /// one. Lifetime settings and the inactive flag are copied too.
    pub fn merge_from(&mut self, other: &Record) {
        for attribute in other.attributes() {
            if attribute.category() != Category::ModificationTime {
                self.replace(attribute.clone());
            }
        }
        self.password_lifetime_count = other.password_lifetime_count;
        self.password_lifetime_units = other.password_lifetime_units;
        self.inactive = other.inactive;
    }

    fn text(&self, category: Category) -> Option<String> {
        self.find(category).and_then(Attribute::as_text)
    }

    fn date(&self, category: Category) -> Option<DateTime<Utc>> {
        self.find(category).and_then(Attribute::as_date)
    }

    pub fn group(&self) -> Option<String> {
        self.text(Category::Group)
    }

    pub fn title(&self) -> Option<String> {
        self.text(Category::Title)
    }

    pub fn username(&self) -> Option<String> {
        self.text(Category::Username)
    }

    pub fn password(&self) -> Option<String> {
        self.text(Category::Password)
    }

    pub fn notes(&self) -> Option<String> {
        self.text(Category::Notes)
    }

    pub fn url(&self) -> Option<String> {
        self.text(Category::Url)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.date(Category::CreationTime)
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.date(Category::ModificationTime)
    }

    pub fn password_changed(&self) -> Option<DateTime<Utc>> {
        self.date(Category::PasswordChangedTime)
    }

    /// When the password expires: the password change time (or creation time
    /// if it never changed) plus the lifetime. `None` without a lifetime.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let count = u32::try_from(self.password_lifetime_count)
            .ok()
            .filter(|count| *count > 0)?;
        let start = self.password_changed().or_else(|| self.created())?;
        match self.password_lifetime_units {
            LifetimeUnit::Days => start.checked_add_signed(Duration::days(i64::from(count))),
            LifetimeUnit::Weeks => start.checked_add_signed(Duration::weeks(i64::from(count))),
            LifetimeUnit::Months => start.checked_add_months(Months::new(count)),
        }
    }

    pub fn set_group(&mut self, group: &str) {
        self.replace(Attribute::text(Category::Group, group));
    }

    pub fn set_title(&mut self, title: &str) {
        self.replace(Attribute::text(Category::Title, title));
    }

    pub fn set_username(&mut self, username: &str) {
        self.replace(Attribute::text(Category::Username, username));
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.replace(Attribute::text(Category::Notes, notes));
    }

    pub fn set_url(&mut self, url: &str) {
        self.replace(Attribute::text(Category::Url, url));
    }

    /// Set the password and stamp the password change time.
    pub fn set_password(&mut self, password: &str) {
        self.replace(Attribute::text(Category::Password, password));
        self.replace(Attribute::date(Category::PasswordChangedTime, Utc::now()));
    }

    pub fn password_lifetime_count(&self) -> i32 {
        self.password_lifetime_count
    }

    pub fn password_lifetime_units(&self) -> LifetimeUnit {
        self.password_lifetime_units
    }

    pub fn set_password_lifetime(&mut self, count: i32, units: LifetimeUnit) {
        self.password_lifetime_count = count;
        self.password_lifetime_units = units;
    }

    /// Soft-deleted records stay in the archive; hiding them is up to the UI.
    pub fn is_inactive(&self) -> bool {
        self.inactive
    }

    pub fn set_inactive(&mut self, inactive: bool) {
        self.inactive = inactive;
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Records compare by content, never by identity.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
            && self.password_lifetime_count == other.password_lifetime_count
            && self.password_lifetime_units == other.password_lifetime_units
            && self.inactive == other.inactive
    }
}

impl Eq for Record {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SubsecRound, TimeZone};

    fn count(record: &Record, category: Category) -> usize {
        record
            .attributes()
            .iter()
            .filter(|attribute| attribute.category() == category)
            .count()
    }

    #[test]
    fn test_new_record_is_stamped() {
        let before = Utc::now().trunc_subsecs(0);
        let record = Record::new();

        assert_eq!(record.attributes().len(), 2);
        assert_eq!(record.attributes()[0].category(), Category::CreationTime);
        assert_eq!(record.attributes()[1].category(), Category::ModificationTime);
        assert!(record.created().unwrap() >= before);
        assert!(record.modified().unwrap() >= before);
    }

    #[test]
    fn test_from_attributes_does_not_stamp() {
        let record = Record::from_attributes(vec![Attribute::text(Category::Title, "Mail")]);
        assert_eq!(record.attributes().len(), 1);
        assert_eq!(record.modified(), None);
    }

    #[test]
    fn test_setting_twice_keeps_one_attribute() {
        let mut record = Record::new();
        record.set_title("first");
        let before_second = Utc::now().trunc_subsecs(0);
        record.set_title("second");

        assert_eq!(count(&record, Category::Title), 1);
        assert_eq!(count(&record, Category::ModificationTime), 1);
        assert_eq!(record.title().as_deref(), Some("second"));
        assert!(record.modified().unwrap() >= before_second);
        assert_eq!(
            record.attributes().last().unwrap().category(),
            Category::ModificationTime
        );
    }

    #[test]
    fn test_replacing_modification_time_does_not_duplicate() {
        let mut record = Record::new();
        let stamp = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        record.replace(Attribute::date(Category::ModificationTime, stamp));

        assert_eq!(count(&record, Category::ModificationTime), 1);
        assert_eq!(record.modified(), Some(stamp));
    }

    #[test]
    fn test_set_password_stamps_change_time() {
        let before = Utc::now().trunc_subsecs(0);
        let mut record = Record::new();
        record.set_password("s3cret");

        assert_eq!(record.password().as_deref(), Some("s3cret"));
        assert!(record.password_changed().unwrap() >= before);
    }

    #[test]
    fn test_accessors() {
        let mut record = Record::new();
        record.set_group("Finance");
        record.set_username("alice");
        record.set_notes("PIN is elsewhere");
        record.set_url("https://bank.example/");

        assert_eq!(record.group().as_deref(), Some("Finance"));
        assert_eq!(record.username().as_deref(), Some("alice"));
        assert_eq!(record.notes().as_deref(), Some("PIN is elsewhere"));
        assert_eq!(record.url().as_deref(), Some("https://bank.example/"));
        assert_eq!(record.title(), None);
    }

    #[test]
    fn test_merge_replaces_present_categories() {
        let mut target = Record::new();
        target.set_title("Old title");
        target.set_username("keep-me");

        let mut source = Record::from_attributes(Vec::new());
        source.replace(Attribute::text(Category::Title, "New title"));
        source.set_password_lifetime(3, LifetimeUnit::Months);
        source.set_inactive(true);

        target.merge_from(&source);

        assert_eq!(target.title().as_deref(), Some("New title"));
        assert_eq!(target.username().as_deref(), Some("keep-me"));
        assert_eq!(count(&target, Category::ModificationTime), 1);
        assert_eq!(target.password_lifetime_count(), 3);
        assert_eq!(target.password_lifetime_units(), LifetimeUnit::Months);
        assert!(target.is_inactive());
    }

    #[test]
    fn test_expiration() {
        let changed = Utc.with_ymd_and_hms(2021, 1, 31, 12, 0, 0).unwrap();
        let mut record = Record::from_attributes(vec![Attribute::date(
            Category::PasswordChangedTime,
            changed,
        )]);
        assert_eq!(record.expiration(), None);

        record.set_password_lifetime(10, LifetimeUnit::Days);
        assert_eq!(
            record.expiration(),
            Some(Utc.with_ymd_and_hms(2021, 2, 10, 12, 0, 0).unwrap())
        );

        record.set_password_lifetime(2, LifetimeUnit::Weeks);
        assert_eq!(
            record.expiration(),
            Some(Utc.with_ymd_and_hms(2021, 2, 14, 12, 0, 0).unwrap())
        );

        record.set_password_lifetime(1, LifetimeUnit::Months);
        assert_eq!(
            record.expiration(),
            Some(Utc.with_ymd_and_hms(2021, 2, 28, 12, 0, 0).unwrap())
        );

        record.set_password_lifetime(-1, LifetimeUnit::Days);
        assert_eq!(record.expiration(), None);
    }

    #[test]
    fn test_equality_ignores_identity() {
        let a = Record::from_attributes(vec![Attribute::text(Category::Title, "Same")]);
        let b = Record::from_attributes(vec![Attribute::text(Category::Title, "Same")]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }
}
