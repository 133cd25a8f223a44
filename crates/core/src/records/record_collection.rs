use log::warn;
use serde::Serialize;
use std::collections::HashMap;

use super::records_model::{InsertPosition, LedgerRecord, UpsertOutcome};

/// An ordered collection with at most one record per identity.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RecordCollection<R> {
    records: Vec<R>,
}

impl<R> Default for RecordCollection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: LedgerRecord> RecordCollection<R> {
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Replaces the whole collection, keeping the given order.
    ///
    /// A repeated identity keeps the slot of its first occurrence and the
    /// value of its last one.
    pub fn replace_all(&mut self, records: Vec<R>) {
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());
        let mut deduped: Vec<R> = Vec::with_capacity(records.len());
        for record in records {
            match slots.get(record.id()) {
                Some(&index) => {
                    warn!(
                        "Duplicate {} '{}' in loaded list; keeping the later value",
                        R::KIND,
                        record.id()
                    );
                    deduped[index] = record;
                }
                None => {
                    slots.insert(record.id().to_string(), deduped.len());
                    deduped.push(record);
                }
            }
        }
        self.records = deduped;
    }

    /// Replaces the record in place when its identity is present, otherwise
    /// inserts it at the kind's insert position.
    pub fn upsert(&mut self, record: R) -> UpsertOutcome {
        if let Some(index) = self.position(record.id()) {
            self.records[index] = record;
            return UpsertOutcome::Replaced;
        }
        match R::INSERT_POSITION {
            InsertPosition::Head => self.records.insert(0, record),
            InsertPosition::Tail => self.records.push(record),
        }
        UpsertOutcome::Inserted
    }

    /// Replaces the record in place. Returns false, leaving the collection
    /// untouched, when the identity is absent.
    pub fn replace_existing(&mut self, record: R) -> bool {
        match self.position(record.id()) {
            Some(index) => {
                self.records[index] = record;
                true
            }
            None => false,
        }
    }

    /// Returns the removed record; `None` if the identity was absent.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        self.position(id).map(|index| self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a, R: LedgerRecord> IntoIterator for &'a RecordCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
