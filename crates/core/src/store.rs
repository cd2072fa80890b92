//! The FHIR store seam and its in-memory implementation.
//!
//! The family history workflow talks to a FHIR server only through [`FhirStore`]: a search by
//! patient plus create/update/delete of single records. Authentication, transport and paging
//! belong to implementations. [`InMemoryStore`] keeps records in insertion order and can be
//! seeded from a search-result file, which is enough for the CLI and for tests.

use crate::error::{CoreError, CoreResult};
use fhir::bundle;
use fhir::{FamilyMemberHistory, Resource, ResourceKey};
use std::path::Path;
use uuid::Uuid;

const FAMILY_MEMBER_HISTORY: &str = "FamilyMemberHistory";

/// Create/read/update/delete access to `FamilyMemberHistory` resources.
pub trait FhirStore {
    /// All records whose `patient` references `Patient/{patient_id}`.
    fn search_family_history(&self, patient_id: &str) -> CoreResult<Vec<FamilyMemberHistory>>;

    /// Store a new record and return it with its assigned id.
    fn create(&mut self, record: FamilyMemberHistory) -> CoreResult<FamilyMemberHistory>;

    /// Replace the stored record with the same id.
    fn update(&mut self, record: FamilyMemberHistory) -> CoreResult<FamilyMemberHistory>;

    /// Remove the record with `id`.
    fn delete(&mut self, id: &str) -> CoreResult<()>;
}

/// A [`FhirStore`] held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    records: Vec<FamilyMemberHistory>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `records`; records without an id are given one.
    pub fn from_records(records: impl IntoIterator<Item = FamilyMemberHistory>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                if record.is_new() {
                    record.id = Some(new_id());
                }
                record
            })
            .collect();
        Self { records }
    }

    /// Load a store from a JSON search result (a `Bundle` or an array of resources).
    ///
    /// Resources other than `FamilyMemberHistory` are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileRead`] if the file cannot be read and [`CoreError::Fhir`] if
    /// it is not a search result or a family member history entry is malformed.
    pub fn from_seed_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        let resources = bundle::resources_from_json(&text)?;

        let mut records = Vec::with_capacity(resources.len());
        for (index, resource) in resources.into_iter().enumerate() {
            match bundle::resource_type_of(&resource) {
                Some(FAMILY_MEMBER_HISTORY) => {
                    records.push(FamilyMemberHistory::from_json_value(resource)?);
                }
                other => {
                    tracing::warn!(
                        "skipping seed entry {index} in {}: resourceType {}",
                        path.display(),
                        other.unwrap_or("<none>")
                    );
                }
            }
        }

        tracing::debug!("seeded {} records from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every stored record, for all patients, in insertion order.
    pub fn records(&self) -> &[FamilyMemberHistory] {
        &self.records
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id.as_deref() == Some(id))
    }
}

impl FhirStore for InMemoryStore {
    fn search_family_history(&self, patient_id: &str) -> CoreResult<Vec<FamilyMemberHistory>> {
        let patient = ResourceKey::new("Patient", patient_id);
        Ok(self
            .records
            .iter()
            .filter(|r| r.patient.is_reference_to(&patient))
            .cloned()
            .collect())
    }

    fn create(&mut self, mut record: FamilyMemberHistory) -> CoreResult<FamilyMemberHistory> {
        record.id = Some(new_id());
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, record: FamilyMemberHistory) -> CoreResult<FamilyMemberHistory> {
        let id = record.id().ok_or_else(|| {
            CoreError::InvalidInput("cannot update a record without an id".into())
        })?;
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::NotFound(format!("{FAMILY_MEMBER_HISTORY}/{id}")))?;
        self.records[index] = record.clone();
        Ok(record)
    }

    fn delete(&mut self, id: &str) -> CoreResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::NotFound(format!("{FAMILY_MEMBER_HISTORY}/{id}")))?;
        self.records.remove(index);
        Ok(())
    }
}

/// Server-style logical id: 32 lowercase hex characters.
fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(patient_id: &str, key: &str) -> FamilyMemberHistory {
        FamilyMemberHistory::new(patient_id, key.into()).expect("known key")
    }

    #[test]
    fn create_assigns_hex_ids() {
        let mut store = InMemoryStore::new();
        let created = store.create(record("123", "Father")).expect("create");
        let id = created.id.clone().expect("assigned id");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(store.len(), 1);

        let second = store.create(record("123", "Mother")).expect("create");
        assert_ne!(second.id, created.id);
    }

    #[test]
    fn search_filters_by_patient_in_insertion_order() {
        let mut store = InMemoryStore::new();
        store.create(record("123", "Father")).expect("create");
        store.create(record("456", "Mother")).expect("create");
        store.create(record("123", "Sister")).expect("create");

        let found = store.search_family_history("123").expect("search");
        let relationships: Vec<_> = found.iter().map(|r| r.relationship.to_string()).collect();
        assert_eq!(relationships, vec!["father", "sister"]);
        assert!(store.search_family_history("789").expect("search").is_empty());
    }

    #[test]
    fn update_replaces_existing_record() {
        let mut store = InMemoryStore::new();
        let mut created = store.create(record("123", "Father")).expect("create");
        created.name = Some("John".into());
        store.update(created.clone()).expect("update");

        let found = store.search_family_history("123").expect("search");
        assert_eq!(found, vec![created]);
    }

    #[test]
    fn update_requires_known_id() {
        let mut store = InMemoryStore::new();
        let err = store.update(record("123", "Father")).expect_err("no id");
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let mut unknown = record("123", "Father");
        unknown.id = Some("missing".into());
        let err = store.update(unknown).expect_err("unknown id");
        match err {
            CoreError::NotFound(msg) => assert_eq!(msg, "FamilyMemberHistory/missing"),
            other => panic!("expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn delete_removes_record() {
        let mut store = InMemoryStore::new();
        let created = store.create(record("123", "Father")).expect("create");
        let id = created.id.expect("id");

        store.delete(&id).expect("delete");
        assert!(store.is_empty());
        assert!(matches!(store.delete(&id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn from_records_keeps_existing_ids() {
        let mut existing = record("123", "Father");
        existing.id = Some("fixed".into());
        let store = InMemoryStore::from_records(vec![existing, record("123", "Mother")]);

        assert_eq!(store.records()[0].id.as_deref(), Some("fixed"));
        assert!(!store.records()[1].is_new());
    }

    #[test]
    fn seeds_from_bundle_file_skipping_other_resources() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
  "resourceType": "Bundle",
  "type": "searchset",
  "entry": [
    {{ "resource": {{ "resourceType": "Patient", "id": "123" }} }},
    {{ "resource": {{
      "resourceType": "FamilyMemberHistory",
      "id": "fmh-1",
      "status": "completed",
      "patient": {{ "reference": "Patient/123" }},
      "relationship": {{ "coding": [ {{ "code": "FTH", "display": "father" }} ] }}
    }} }}
  ]
}}"#
        )
        .expect("write seed");

        let store = InMemoryStore::from_seed_file(file.path()).expect("seed");
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id.as_deref(), Some("fmh-1"));
    }

    #[test]
    fn seed_errors_are_reported() {
        let missing = tempfile::tempdir().expect("temp dir").path().join("none.json");
        assert!(matches!(
            InMemoryStore::from_seed_file(&missing),
            Err(CoreError::FileRead(_))
        ));

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"resourceType":"FamilyMemberHistory","status":"nope"}}]"#)
            .expect("write seed");
        assert!(matches!(
            InMemoryStore::from_seed_file(file.path()),
            Err(CoreError::Fhir(_))
        ));
    }
}
