//! In-memory record stores
//!
//! Each operation takes the lock for the duration of a single read or
//! write. Concurrent create and delete calls interleave in whatever order
//! they reach the lock and the last write wins; there is no transactional
//! isolation across operations. The stores live as long as the server that
//! owns them.

use crate::types::{AuditEntry, User};
use parking_lot::RwLock;

/// Entity with a unique string id
pub trait Record: Clone + Send + Sync + 'static {
    /// Record identifier
    fn id(&self) -> &str;
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AuditEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Ordered, most-recent-first record sequence
#[derive(Debug)]
pub struct RecordStore<T: Record> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create store holding `records` in the given order
    #[inline]
    #[must_use]
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Copy of the current sequence
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.records.read().clone()
    }

    /// Insert at the front
    pub fn prepend(&self, record: T) {
        self.records.write().insert(0, record);
    }

    /// Remove every record with `id`; returns whether anything was removed
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id() != id);
        records.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_spec::Role;

    #[test]
    fn prepend_puts_newest_first() {
        let store = RecordStore::with_records(User::seed());
        store.prepend(User::new("u-9", "Zed", "zed@example.com", Role::User));

        let ids: Vec<_> = store.snapshot().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, ["u-9", "u-1", "u-2"]);
    }

    #[test]
    fn remove_filters_by_id() {
        let store = RecordStore::with_records(User::seed());
        assert!(store.remove("u-1"));
        assert!(!store.remove("u-1"));
        let ids: Vec<_> = store.snapshot().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, ["u-2"]);
    }

    #[test]
    fn new_store_is_empty() {
        let store: RecordStore<User> = RecordStore::new();
        assert!(store.snapshot().is_empty());
    }
}
