use std::sync::Arc;

use shared::{domain::Identified, view::FormView};
use storage::{Diagnostics, RecordStore, SlotStore, StorageError};
use tracing::{debug, info, warn};

use crate::{
    error::FormError,
    events::{FormEvent, RecordIdentity},
    presenter,
    schema::{self, FormSchema},
};

/// Runs the submit and delete cycles for one form against its record store.
pub struct FormController<S: FormSchema> {
    store: RecordStore<S::Record>,
}

impl<S: FormSchema> FormController<S> {
    pub async fn open(
        slots: Arc<dyn SlotStore>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, StorageError> {
        let store = RecordStore::open(slots, S::SLOT_KEY, diagnostics).await?;
        Ok(Self { store })
    }

    pub fn records(&self) -> &[S::Record] {
        self.store.records()
    }

    pub fn view(&self) -> FormView {
        self.view_with(None, false)
    }

    pub async fn handle(&mut self, event: FormEvent<S>) -> Result<FormView, FormError> {
        debug!(form = S::SLOT_KEY, event = event.name(), "handling form event");
        match event {
            FormEvent::Submit(input) => self.submit(input).await,
            FormEvent::Delete(identity) => self.delete(identity).await,
            FormEvent::Clear => self.clear().await,
            FormEvent::Refresh => Ok(self.view()),
        }
    }

    /// Validates and appends. Any violation stops the cycle before the store
    /// is touched.
    pub async fn submit(&mut self, input: S::Input) -> Result<FormView, FormError> {
        let record = match schema::parse::<S>(input) {
            Ok(record) => record,
            Err(errors) => {
                info!(
                    form = S::SLOT_KEY,
                    violations = errors.violations().len(),
                    "rejected submission"
                );
                return Err(errors.into());
            }
        };
        let id = record.id();
        self.store.append(record).await.map_err(|err| {
            warn!(form = S::SLOT_KEY, error = %err, "failed to persist submission");
            FormError::from(err)
        })?;
        info!(form = S::SLOT_KEY, %id, records = self.store.len(), "stored submission");
        Ok(self.view_with(Some(S::SUCCESS_NOTICE.to_string()), true))
    }

    pub async fn delete(
        &mut self,
        identity: RecordIdentity<S::Key>,
    ) -> Result<FormView, FormError> {
        let removed = match &identity {
            RecordIdentity::Position(position) => self
                .store
                .delete_at(*position)
                .await?
                .map(|record| (*position, record)),
            RecordIdentity::Id(id) => self.store.delete_first(|r| r.id() == *id).await?,
            RecordIdentity::Key(key) => self.store.delete_first(|r| S::key(r) == *key).await?,
        };

        let Some((position, record)) = removed else {
            return Err(FormError::NotFound {
                identity: identity.to_string(),
            });
        };
        info!(
            form = S::SLOT_KEY,
            position,
            id = %record.id(),
            records = self.store.len(),
            "deleted record"
        );
        Ok(self.view())
    }

    pub async fn clear(&mut self) -> Result<FormView, FormError> {
        self.store.clear().await?;
        info!(form = S::SLOT_KEY, "cleared records");
        Ok(self.view())
    }

    fn view_with(&self, notice: Option<String>, clear_inputs: bool) -> FormView {
        let records = self.store.records();
        FormView {
            title: S::TITLE.to_string(),
            table: presenter::render::<S>(records),
            aggregate: presenter::aggregate::<S>(records),
            notice,
            clear_inputs,
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
