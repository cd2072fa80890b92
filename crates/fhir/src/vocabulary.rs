//! Curated code tables used to build coded fields.
//!
//! Tables are plain YAML data (see `vocabulary/*.yaml`) mapping a stable key to a
//! `(code, display)` pair within one code system. The two tables shipped with the crate are
//! embedded at compile time and parsed on first use; extending the vocabulary means editing the
//! data file, not this module.
//!
//! Keys are unique within a table. Codes are not: the relationship table deliberately carries
//! two spellings of some in-law codes, so a reverse lookup returns the first key in table order.

use crate::{deserialize_with_path, CodeableConcept, Coding, FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

const FAMILY_RELATIONSHIP_YAML: &str = include_str!("../vocabulary/family_relationship.yaml");
const ADMINISTRATIVE_GENDER_YAML: &str = include_str!("../vocabulary/administrative_gender.yaml");

static FAMILY_RELATIONSHIPS: LazyLock<CodeTable> = LazyLock::new(|| {
    CodeTable::from_yaml(FAMILY_RELATIONSHIP_YAML)
        .expect("embedded family relationship table is valid")
});

static ADMINISTRATIVE_GENDERS: LazyLock<CodeTable> = LazyLock::new(|| {
    CodeTable::from_yaml(ADMINISTRATIVE_GENDER_YAML)
        .expect("embedded administrative gender table is valid")
});

/// HL7 v3 RoleCode family relationships, keyed e.g. `"Mother"`, `"MaternalAunt"`.
pub fn family_relationships() -> &'static CodeTable {
    &FAMILY_RELATIONSHIPS
}

/// Administrative gender codes, keyed `"Male"`, `"Female"`, `"Other"`, `"Unknown"`.
pub fn administrative_genders() -> &'static CodeTable {
    &ADMINISTRATIVE_GENDERS
}

/// One row of a [`CodeTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeTableEntry {
    pub key: String,
    pub code: String,
    pub display: String,
}

/// A keyed list of codes from a single code system, in table order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeTable {
    system: String,
    entries: Vec<CodeTableEntry>,
}

impl CodeTable {
    /// Parse a table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] (with the failing field path) if the YAML does not
    /// match the table schema, and [`FhirError::InvalidInput`] if the system is blank or a key
    /// appears twice.
    pub fn from_yaml(yaml_text: &str) -> FhirResult<Self> {
        let table: CodeTable = deserialize_with_path(
            serde_yaml::Deserializer::from_str(yaml_text),
            "CodeTable",
        )?;

        if table.system.trim().is_empty() {
            return Err(FhirError::InvalidInput(
                "code table system must not be blank".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &table.entries {
            if !seen.insert(entry.key.as_str()) {
                return Err(FhirError::InvalidInput(format!(
                    "duplicate code table key '{}'",
                    entry.key
                )));
            }
        }

        Ok(table)
    }

    /// The code system URI shared by every entry.
    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[CodeTableEntry] {
        &self.entries
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// The coding for `key`, if present.
    pub fn get(&self, key: &str) -> Option<Coding> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| Coding::new(self.system.as_str(), e.code.as_str(), e.display.as_str()))
    }

    /// The coding for `key` wrapped as a single-coding concept.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::UnknownCode`] if the key is not in the table.
    pub fn concept(&self, key: &str) -> FhirResult<CodeableConcept> {
        self.get(key)
            .map(CodeableConcept::from)
            .ok_or_else(|| FhirError::UnknownCode(format!("{key} (system {})", self.system)))
    }

    /// The first key whose code is `code`.
    pub fn key_for_code(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.key.as_str())
    }

    /// The key matching the first coding of `concept`.
    ///
    /// Only `coding[0].code` is consulted; the system is not checked.
    pub fn key_for_concept(&self, concept: &CodeableConcept) -> Option<&str> {
        concept
            .coding
            .first()
            .and_then(|c| c.code.as_deref())
            .and_then(|code| self.key_for_code(code))
    }
}
