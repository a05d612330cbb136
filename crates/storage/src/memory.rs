use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{check_quota, slot_footprint, SlotStore, StorageError};

/// Process-local slots with an optional quota. Used by tests and dry runs.
#[derive(Default)]
pub struct MemorySlots {
    slots: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Seeds a slot directly, bypassing the quota.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map still holds consistent strings.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SlotStore for MemorySlots {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.lock();
        let used_by_others = slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| slot_footprint(k, v))
            .sum();
        check_quota(key, value, used_by_others, self.quota_bytes)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
