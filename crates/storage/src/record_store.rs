use std::{mem, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::error::Category;

use crate::{Diagnostics, SlotStore, StorageError};

/// Ordered record sequence mirrored into one persistence slot.
///
/// The sequence is read once in [`RecordStore::open`]. Every mutator writes
/// the whole sequence back before returning; if that write fails the
/// mutation is undone, so memory and slot never disagree.
pub struct RecordStore<R> {
    slots: Arc<dyn SlotStore>,
    key: String,
    records: Vec<R>,
}

impl<R> RecordStore<R>
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    /// Loads the slot. Absent, `null`, unparsable or mis-shaped contents
    /// all load as an empty sequence; the last two are reported to
    /// `diagnostics`. Only backend read failures are returned.
    ///
    /// Entries that only load through field defaults (a missing id, say)
    /// are written back straight away so the filled-in values are stable
    /// across reloads.
    pub async fn open(
        slots: Arc<dyn SlotStore>,
        key: impl Into<String>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, StorageError> {
        let key = key.into();
        let mut stale = false;
        let records = match slots.read_slot(&key).await? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Option<Vec<R>>>(&raw) {
                Ok(records) => {
                    let records = records.unwrap_or_default();
                    stale = !records.is_empty() && !is_canonical(&raw, &records);
                    records
                }
                Err(err) => {
                    let reason = match err.classify() {
                        Category::Data => format!("unexpected shape: {err}"),
                        _ => format!("unparsable json: {err}"),
                    };
                    diagnostics.discarded_slot(&key, &reason);
                    Vec::new()
                }
            },
        };
        tracing::debug!(slot = %key, records = records.len(), "loaded record sequence");

        let store = Self {
            slots,
            key,
            records,
        };
        if stale {
            match store.persist().await {
                Ok(()) => tracing::info!(slot = %store.key, "rewrote records filled in on load"),
                Err(err) => {
                    tracing::warn!(slot = %store.key, error = %err, "could not rewrite records filled in on load")
                }
            }
        }
        Ok(store)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub async fn append(&mut self, record: R) -> Result<(), StorageError> {
        self.records.push(record);
        if let Err(err) = self.persist().await {
            self.records.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Removes the entry at `position`. Out-of-range positions leave the
    /// slot untouched and return `None`.
    pub async fn delete_at(&mut self, position: usize) -> Result<Option<R>, StorageError> {
        if position >= self.records.len() {
            return Ok(None);
        }
        let removed = self.records.remove(position);
        if let Err(err) = self.persist().await {
            self.records.insert(position, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    /// Removes only the first entry matching `predicate`, even when later
    /// entries match too.
    pub async fn delete_first<F>(
        &mut self,
        predicate: F,
    ) -> Result<Option<(usize, R)>, StorageError>
    where
        F: Fn(&R) -> bool,
    {
        let Some(position) = self.records.iter().position(predicate) else {
            return Ok(None);
        };
        Ok(self
            .delete_at(position)
            .await?
            .map(|record| (position, record)))
    }

    /// Replaces the whole sequence.
    pub async fn overwrite(&mut self, records: Vec<R>) -> Result<(), StorageError> {
        let previous = mem::replace(&mut self.records, records);
        if let Err(err) = self.persist().await {
            self.records = previous;
            return Err(err);
        }
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.overwrite(Vec::new()).await
    }

    /// Serializes the full sequence into the slot. Last writer wins.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.records).map_err(|source| StorageError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.slots.write_slot(&self.key, &raw).await?;
        tracing::debug!(slot = %self.key, records = self.records.len(), bytes = raw.len(), "persisted record sequence");
        Ok(())
    }
}

/// True when `raw` already holds exactly what `records` serialize to.
fn is_canonical<R: Serialize>(raw: &str, records: &[R]) -> bool {
    match (
        serde_json::from_str::<serde_json::Value>(raw),
        serde_json::to_value(records),
    ) {
        (Ok(stored), Ok(loaded)) => stored == loaded,
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/record_store_tests.rs"]
mod tests;
