//! FHIR R4 value types and family history resources.
//!
//! This crate provides the **value layer** behind the family history workflow:
//! - small R4 data types (`Coding`, `CodeableConcept`, `Quantity`, `Range`, `HumanName`,
//!   `Address`, `Reference`) with their display formatting and free-text parsing
//! - the `Patient` and `FamilyMemberHistory` resources and their JSON wire shape
//! - the curated relationship and gender vocabulary tables
//!
//! Everything here is pure and synchronous. Parsing user text never fails loudly: a
//! string that cannot be understood yields `None`, and every formatter degrades to an
//! empty string for missing data. [`FhirError`] is reserved for decoding JSON/YAML
//! documents and for vocabulary lookups.

pub mod address;
pub mod age;
pub mod bundle;
pub mod codeable_concept;
pub mod coding;
pub mod dates;
pub mod family_member_history;
pub mod human_name;
pub mod patient;
pub mod quantity;
pub mod range;
pub mod reference;
pub mod vocabulary;

mod lenient;
mod numeric;

// Re-export value types
pub use address::{Address, AddressFormat, AddressUse};
pub use age::Age;
pub use codeable_concept::CodeableConcept;
pub use coding::Coding;
pub use human_name::{HumanName, HumanNameFormat, NameUse};
pub use quantity::{Comparator, Quantity, QuantityFormat};
pub use range::Range;
pub use reference::{Reference, Resource, ResourceKey};

// Re-export resources
pub use family_member_history::{
    Annotation, FamilyMemberHistory, FamilyMemberHistoryCondition, HistoryStatus,
    RelationshipSource,
};
pub use patient::{Gender, Patient};
pub use vocabulary::{CodeTable, CodeTableEntry};

/// Errors returned by the `fhir` crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("unknown code: {0}")]
    UnknownCode(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Deserialize `T` from a JSON value, reporting the failing field path on mismatch.
///
/// `what` names the structure being decoded and is used as the message prefix, for example
/// `"FamilyMemberHistory schema mismatch at relationship.coding[0]: ..."`.
pub(crate) fn from_value_with_path<T>(value: serde_json::Value, what: &str) -> FhirResult<T>
where
    T: serde::de::DeserializeOwned,
{
    deserialize_with_path(value, what)
}

/// Deserialize `T` from any serde deserializer (JSON value, YAML document, ...), mapping a
/// mismatch to [`FhirError::Translation`] with the failing field path.
pub(crate) fn deserialize_with_path<'de, D, T>(deserializer: D, what: &str) -> FhirResult<T>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    match serde_path_to_error::deserialize::<_, T>(deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(FhirError::Translation(format!(
                "{what} schema mismatch at {path}: {source}"
            )))
        }
    }
}
