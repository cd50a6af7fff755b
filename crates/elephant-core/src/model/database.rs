//! The in-memory collection of records.

use tracing::debug;

use super::observers::{ObserverRegistry, SubscriptionHandle};
use super::record::{Record, RecordId};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEvent {
    Added(RecordId),
    Updated(RecordId),
    Deleted(RecordId),
}

/// An ordered collection of records, unique by identity.
///
/// Every mutation synchronously notifies subscribers on the calling thread.
pub struct Database {
    records: Vec<Record>,
    observers: ObserverRegistry<DatabaseEvent>,
}

impl Database {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Build a database from loaded records. No notifications are sent.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Append a record. A record whose identity is already present is not
    /// added twice.
    pub fn add(&mut self, record: Record) -> RecordId {
        let id = record.id();
        if self.get(id).is_some() {
            return id;
        }
        self.records.push(record);
        debug!(record = %id, total = self.records.len(), "Record added");
        self.observers.notify(&DatabaseEvent::Added(id));
        id
    }

    /// Delete records by identity, returning the removed records in
    /// collection order. Unknown identities are ignored.
    pub fn delete(&mut self, ids: &[RecordId]) -> Vec<Record> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.records.len());
        for record in self.records.drain(..) {
            if ids.contains(&record.id()) {
                removed.push(record);
            } else {
                kept.push(record);
            }
        }
        self.records = kept;

        for record in &removed {
            debug!(record = %record.id(), "Record deleted");
            self.observers.notify(&DatabaseEvent::Deleted(record.id()));
        }
        removed
    }

    /// Mutate one record in place. Returns `false` if the identity is unknown.
    pub fn update<F>(&mut self, id: RecordId, edit: F) -> bool
    where
        F: FnOnce(&mut Record),
    {
        let Some(record) = self.records.iter_mut().find(|record| record.id() == id) else {
            return false;
        };
        edit(record);
        self.observers.notify(&DatabaseEvent::Updated(id));
        true
    }

    /// Commit an edited copy: merge every attribute of `edited` into the
    /// record `id`.
    pub fn merge_into(&mut self, id: RecordId, edited: &Record) -> bool {
        self.update(id, |record| record.merge_from(edited))
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionHandle
    where
        F: FnMut(&DatabaseEvent) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.observers.unsubscribe(handle)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones carry the records but no subscribers.
impl Clone for Database {
    fn clone(&self) -> Self {
        Self::from_records(self.records.clone())
    }
}

/// Databases compare by record content, in order.
impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("records", &self.records)
            .field("subscribers", &self.observers.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
