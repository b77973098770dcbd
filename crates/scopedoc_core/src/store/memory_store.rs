//! In-memory key/value store with an optional byte quota.
//!
//! Used by hosts without a writable disk and by tests that need to simulate
//! quota exhaustion or disabled storage.

use super::{PersistenceStore, StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Single-threaded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: Cell<bool>,
    write_count: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose total `key + value` bytes may not exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Enables or disables the store. Disabled stores fail every call.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_enabled(&self) -> StoreResult<()> {
        if self.disabled.get() {
            return Err(StoreError::Unavailable("storage is disabled".to_string()));
        }
        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl PersistenceStore for MemoryStore {
    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_enabled()?;

        if let Some(limit_bytes) = self.quota_bytes {
            let attempted_bytes = self.used_bytes_without(key) + key.len() + value.len();
            if attempted_bytes > limit_bytes {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    attempted_bytes,
                    limit_bytes,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.write_count.set(self.write_count.get() + 1);
        Ok(())
    }

    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.ensure_enabled()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
