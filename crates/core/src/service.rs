//! Family history list management for the configured patient.
//!
//! [`FamilyHistoryService`] owns the current list of records for one patient and keeps it in
//! step with the store: every successful save or delete is followed by a reload, so the list
//! always reflects what the store holds.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::session::SaveRequest;
use crate::store::FhirStore;
use crate::table::{sort_rows, FamilyHistoryRow, SortColumn};
use fhir::{FamilyMemberHistory, Reference, ResourceKey};
use std::sync::Arc;

/// Service for listing and storing a patient's family member history records.
#[derive(Clone, Debug)]
pub struct FamilyHistoryService<S: FhirStore> {
    cfg: Arc<CoreConfig>,
    store: S,
    records: Vec<FamilyMemberHistory>,
}

impl<S: FhirStore> FamilyHistoryService<S> {
    /// Creates a service with an empty list; call [`load`](Self::load) to fill it.
    pub fn new(cfg: Arc<CoreConfig>, store: S) -> Self {
        Self {
            cfg,
            store,
            records: Vec::new(),
        }
    }

    /// Reload the list from the store.
    ///
    /// # Errors
    ///
    /// Returns whatever the store's search returns; the previous list is kept on failure.
    pub fn load(&mut self) -> CoreResult<()> {
        let patient_id = self.cfg.patient_id().as_str();
        self.records = self.store.search_family_history(patient_id)?;
        tracing::info!(
            "loaded {} family history records for Patient/{patient_id}",
            self.records.len()
        );
        Ok(())
    }

    /// Records in store order.
    pub fn records(&self) -> &[FamilyMemberHistory] {
        &self.records
    }

    /// Table rows in store order.
    pub fn rows(&self) -> Vec<FamilyHistoryRow> {
        self.records.iter().map(FamilyHistoryRow::from_record).collect()
    }

    pub fn sorted_rows(&self, column: SortColumn, descending: bool) -> Vec<FamilyHistoryRow> {
        let mut rows = self.rows();
        sort_rows(&mut rows, column, descending);
        rows
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a finished edit, then reload.
    ///
    /// A new record is created with its `patient` pointed at the configured patient; an
    /// existing record is updated in place.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionMismatch`] if an existing record belongs to a different
    /// patient, or any error from the store.
    pub fn save(&mut self, request: SaveRequest) -> CoreResult<FamilyMemberHistory> {
        let patient_id = self.cfg.patient_id().as_str();
        let mut record = request.into_record();

        let saved = if record.is_new() {
            record.patient = Reference::create("Patient", patient_id, None);
            let created = self.store.create(record)?;
            tracing::info!(
                "created FamilyMemberHistory/{}",
                created.id.as_deref().unwrap_or_default()
            );
            created
        } else {
            if !record
                .patient
                .is_reference_to(&ResourceKey::new("Patient", patient_id))
            {
                return Err(CoreError::SessionMismatch(format!(
                    "record references {}, expected Patient/{patient_id}",
                    record.patient.text()
                )));
            }
            let updated = self.store.update(record)?;
            tracing::info!(
                "updated FamilyMemberHistory/{}",
                updated.id.as_deref().unwrap_or_default()
            );
            updated
        };

        self.load()?;
        Ok(saved)
    }

    /// Delete the record with `id`, then reload.
    ///
    /// # Errors
    ///
    /// Returns any error from the store, e.g. [`CoreError::NotFound`].
    pub fn delete(&mut self, id: &str) -> CoreResult<()> {
        self.store.delete(id)?;
        tracing::info!("deleted FamilyMemberHistory/{id}");
        self.load()
    }
}
