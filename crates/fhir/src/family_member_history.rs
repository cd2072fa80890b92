//! FHIR `FamilyMemberHistory` resource: what is known about one relative of a patient.
//!
//! This is the record edited by the family history workflow. It is built for a patient from a
//! relationship (a key into the relationship vocabulary, or an arbitrary coding), edited on a
//! deep copy, and submitted back to the store as a whole.
//!
//! Wire notes:
//! - `age[x]` and `deceased[x]` are choice elements; each variant is a separate optional field
//!   here (`ageAge`, `ageRange`, ...). Nothing stops two variants being set at once.
//! - Elements not modelled below are preserved in [`FamilyMemberHistory::extra`].

use crate::age::Age;
use crate::codeable_concept::CodeableConcept;
use crate::coding::Coding;
use crate::range::Range;
use crate::reference::{Reference, Resource};
use crate::vocabulary;
use crate::{from_value_with_path, FhirError, FhirResult};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "FamilyMemberHistory";

// ============================================================================
// Public domain-level types
// ============================================================================

/// Workflow status of a family member history record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryStatus {
    Partial,
    #[default]
    Completed,
    EnteredInError,
    HealthUnknown,
}

/// A free-text note with optional attribution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default)]
    pub text: String,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A condition the relative had.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberHistoryCondition {
    #[serde(default)]
    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributed_to_death: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_age: Option<Age>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_range: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_string: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<Annotation>,
}

/// How a new record's relationship is specified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationshipSource {
    /// A key into [`vocabulary::family_relationships`], e.g. `"Father"`.
    Key(String),
    /// An explicit coding, used as is.
    Coding(Coding),
}

impl From<&str> for RelationshipSource {
    fn from(key: &str) -> Self {
        RelationshipSource::Key(key.to_string())
    }
}

impl From<Coding> for RelationshipSource {
    fn from(coding: Coding) -> Self {
        RelationshipSource::Coding(coding)
    }
}

/// A family member history resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberHistory {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub status: HistoryStatus,

    pub patient: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub relationship: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_age: Option<Age>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_age: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_age: Option<Age>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_range: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_string: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<Annotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition: Vec<FamilyMemberHistoryCondition>,

    /// Elements not modelled above (`meta`, `extension`, `identifier`, ...), preserved as is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ============================================================================
// Construction and editing helpers
// ============================================================================

impl FamilyMemberHistory {
    /// A new, unsaved record for `patient_id`.
    ///
    /// The record starts `completed`, with `patient` referencing `Patient/{patient_id}`, the
    /// relationship wrapped as a single-coding concept and no conditions.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::UnknownCode`] if a relationship key is not in the vocabulary.
    pub fn new(patient_id: &str, relationship: RelationshipSource) -> FhirResult<Self> {
        let relationship = match relationship {
            RelationshipSource::Key(key) => vocabulary::family_relationships().concept(&key)?,
            RelationshipSource::Coding(coding) => CodeableConcept::from_single_coding(coding, None),
        };

        Ok(Self {
            resource_type: RESOURCE_TYPE.to_string(),
            id: None,
            status: HistoryStatus::Completed,
            patient: Reference::create("Patient", patient_id, None),
            date: None,
            name: None,
            relationship,
            sex: None,
            age_age: None,
            age_range: None,
            age_string: None,
            estimated_age: None,
            deceased_boolean: None,
            deceased_age: None,
            deceased_range: None,
            deceased_date: None,
            deceased_string: None,
            note: Vec::new(),
            condition: Vec::new(),
            extra: serde_json::Map::new(),
        })
    }

    /// A fully independent copy for editing; changes to it never reach `self`.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Not yet stored (no server-assigned id).
    pub fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    /// Whether the relative is recorded as deceased.
    pub fn is_deceased(&self) -> bool {
        self.deceased_boolean.unwrap_or(false)
    }
}

// ============================================================================
// Wire parsing and rendering
// ============================================================================

impl FamilyMemberHistory {
    /// Parse a family member history resource from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the text is not valid JSON,
    /// - a required element (`status`, `patient`, `relationship`) is missing,
    /// - any modelled field has an unexpected type or value (reported with its path),
    /// - `resourceType` is not `"FamilyMemberHistory"`.
    pub fn parse_json(json_text: &str) -> FhirResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json_text)?;
        Self::from_json_value(value)
    }

    /// As [`FamilyMemberHistory::parse_json`], from an already-decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> FhirResult<Self> {
        let record: FamilyMemberHistory = from_value_with_path(value, RESOURCE_TYPE)?;

        if record.resource_type != RESOURCE_TYPE {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType '{RESOURCE_TYPE}', got '{}'",
                record.resource_type
            )));
        }

        Ok(record)
    }

    /// Render as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if serialisation fails.
    pub fn render_json(&self) -> FhirResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FhirError::Translation(format!("Failed to serialise family member history: {e}"))
        })
    }
}

impl Resource for FamilyMemberHistory {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::administrative_genders;
    use crate::{Quantity, ResourceKey};

    const SAMPLE: &str = r#"{
  "resourceType": "FamilyMemberHistory",
  "id": "fmh-1",
  "meta": { "versionId": "3" },
  "status": "completed",
  "patient": { "reference": "Patient/123" },
  "name": "John",
  "relationship": {
    "coding": [
      { "system": "http://terminology.hl7.org/CodeSystem/v3-RoleCode", "code": "FTH", "display": "father" }
    ]
  },
  "sex": {
    "coding": [
      { "system": "http://hl7.org/fhir/administrative-gender", "code": "male", "display": "Male" }
    ]
  },
  "ageAge": { "value": 60, "unit": "yr", "system": "http://unitsofmeasure.org", "code": "a" },
  "condition": [
    {
      "code": { "text": "Type 2 diabetes" },
      "onsetAge": { "value": 45, "unit": "yr" },
      "contributedToDeath": false
    }
  ]
}"#;

    #[test]
    fn new_from_relationship_key() {
        let record = FamilyMemberHistory::new("123", "Father".into()).expect("known key");
        assert_eq!(record.resource_type, "FamilyMemberHistory");
        assert_eq!(record.status, HistoryStatus::Completed);
        assert_eq!(record.patient.reference.as_deref(), Some("Patient/123"));
        assert_eq!(record.relationship.coding.len(), 1);
        assert_eq!(record.relationship.coding[0].code.as_deref(), Some("FTH"));
        assert_eq!(record.relationship.to_string(), "father");
        assert!(record.condition.is_empty());
        assert!(record.is_new());
    }

    #[test]
    fn new_from_raw_coding() {
        let coding = Coding::new("urn:local", "GODPARENT", "godparent");
        let record =
            FamilyMemberHistory::new("123", coding.clone().into()).expect("raw coding");
        assert_eq!(record.relationship.coding, vec![coding]);
    }

    #[test]
    fn new_rejects_unknown_key() {
        let err = FamilyMemberHistory::new("123", "Godparent".into())
            .expect_err("unknown key should fail");
        match err {
            FhirError::UnknownCode(msg) => assert!(msg.contains("Godparent")),
            other => panic!("expected UnknownCode error, got {other:?}"),
        }
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = FamilyMemberHistory::parse_json(SAMPLE).expect("parse json");
        let mut copy = original.deep_copy();

        copy.name = Some("Jack".into());
        copy.condition[0].code.text = Some("Asthma".into());
        copy.relationship.coding[0].display = Some("dad".into());

        assert_eq!(original.name.as_deref(), Some("John"));
        assert_eq!(original.condition[0].code.text.as_deref(), Some("Type 2 diabetes"));
        assert_eq!(original.relationship.to_string(), "father");
    }

    #[test]
    fn parses_and_round_trips_sample() {
        let record = FamilyMemberHistory::parse_json(SAMPLE).expect("parse json");
        assert!(!record.is_new());
        assert_eq!(record.age_age.as_ref().and_then(|a| a.value), Some(60.0));
        assert_eq!(record.condition[0].contributed_to_death, Some(false));
        assert_eq!(
            record.condition[0].onset_age.as_ref().map(Quantity::to_string).as_deref(),
            Some("45 yr")
        );
        assert!(record.extra.contains_key("meta"));

        let output = record.render_json().expect("render");
        assert!(output.contains("\"ageAge\""));
        assert!(output.contains("\"contributedToDeath\": false"));
        assert!(output.contains("\"versionId\": \"3\""));
        let reparsed = FamilyMemberHistory::parse_json(&output).expect("reparse");
        assert_eq!(record, reparsed);
    }

    #[test]
    fn renders_choice_elements_and_omits_empty() {
        let mut record = FamilyMemberHistory::new("123", "Mother".into()).expect("known key");
        record.sex = Some(administrative_genders().concept("Female").expect("Female"));
        record.deceased_boolean = Some(true);
        record.deceased_age = Quantity::parse("70 yr");
        record.note = vec![Annotation::new("Died of heart failure")];

        let value = serde_json::to_value(&record).expect("to value");
        assert_eq!(value["resourceType"], "FamilyMemberHistory");
        assert_eq!(value["deceasedBoolean"], true);
        assert_eq!(value["deceasedAge"]["value"], 70.0);
        assert_eq!(value["note"][0]["text"], "Died of heart failure");
        assert_eq!(value["sex"]["coding"][0]["code"], "female");
        assert!(value.get("id").is_none());
        assert!(value.get("condition").is_none());
        assert!(value.get("ageRange").is_none());
        assert!(record.is_deceased());
    }

    #[test]
    fn reports_path_of_schema_mismatch() {
        let input = r#"{
  "resourceType": "FamilyMemberHistory",
  "status": "completed",
  "patient": { "reference": "Patient/123" },
  "relationship": { "coding": [ { "code": 42 } ] }
}"#;
        let err = FamilyMemberHistory::parse_json(input).expect_err("code must be a string");
        match err {
            FhirError::Translation(msg) => {
                assert!(msg.contains("FamilyMemberHistory schema mismatch"));
                assert!(msg.contains("relationship.coding[0].code"), "message was: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let input = r#"{"resourceType":"FamilyMemberHistory","status":"done","patient":{},"relationship":{}}"#;
        let err = FamilyMemberHistory::parse_json(input).expect_err("bad status");
        assert!(matches!(err, FhirError::Translation(_)));
    }

    #[test]
    fn rejects_other_resource_types() {
        let input = r#"{"resourceType":"Observation","status":"completed","patient":{},"relationship":{}}"#;
        let err = FamilyMemberHistory::parse_json(input).expect_err("wrong type");
        match err {
            FhirError::InvalidInput(msg) => assert!(msg.contains("Observation")),
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn status_uses_kebab_case() {
        let json = serde_json::to_string(&HistoryStatus::EnteredInError).expect("serialise");
        assert_eq!(json, "\"entered-in-error\"");
        let parsed: HistoryStatus =
            serde_json::from_str("\"health-unknown\"").expect("deserialise");
        assert_eq!(parsed, HistoryStatus::HealthUnknown);
    }

    #[test]
    fn patient_reference_identifies_patient() {
        let record = FamilyMemberHistory::new("123", "Sister".into()).expect("known key");
        assert!(record.patient.is_reference_to(&ResourceKey::new("Patient", "123")));
        assert_eq!(record.patient.target_id(), "123");
    }
}
