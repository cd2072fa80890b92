//! FHIR `Patient` resource: the subject whose family history is being recorded.
//!
//! Only the demographics needed for the patient header are modelled as typed fields
//! (`name`, `gender`, `birthDate`, `address`). Every other element the server sends is kept
//! verbatim in [`Patient::extra`] so a parse/render cycle does not drop data.
//!
//! Responsibilities:
//! - Parse and render the JSON wire shape, validating `resourceType`
//! - Pick the names/addresses shown in the header (`official` / `home` first)
//! - Derive the patient's birth date and age

use crate::address::{Address, AddressUse};
use crate::dates;
use crate::human_name::{HumanName, NameUse};
use crate::reference::Resource;
use crate::{from_value_with_path, FhirError, FhirResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const RESOURCE_TYPE: &str = "Patient";

// ============================================================================
// Public domain-level types
// ============================================================================

/// Administrative gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Gender {
    /// FHIR wire format string.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// FHIR `date`; may be partial (`"1992"`, `"1992-03"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,

    /// Elements not modelled above (`meta`, `identifier`, `telecom`, ...), preserved as is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            resource_type: RESOURCE_TYPE.to_string(),
            id: None,
            name: Vec::new(),
            gender: None,
            birth_date: None,
            address: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

// ============================================================================
// Wire parsing and rendering
// ============================================================================

impl Patient {
    /// Parse a patient resource from JSON text.
    ///
    /// Schema mismatches are reported with the path to the failing field
    /// (e.g. `name[0].use`).
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the text is not valid JSON,
    /// - any modelled field has an unexpected type or value,
    /// - `resourceType` is not `"Patient"`.
    pub fn parse_json(json_text: &str) -> FhirResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json_text)?;
        Self::from_json_value(value)
    }

    /// As [`Patient::parse_json`], from an already-decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> FhirResult<Self> {
        let patient: Patient = from_value_with_path(value, RESOURCE_TYPE)?;

        if patient.resource_type != RESOURCE_TYPE {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType '{RESOURCE_TYPE}', got '{}'",
                patient.resource_type
            )));
        }

        Ok(patient)
    }

    /// Render the patient as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if serialisation fails.
    pub fn render_json(&self) -> FhirResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FhirError::Translation(format!("Failed to serialise patient: {e}")))
    }
}

// ============================================================================
// Header helpers
// ============================================================================

impl Patient {
    /// The first `official` name, else the first name of any use.
    pub fn official_name(&self) -> Option<&HumanName> {
        HumanName::names_by_use(&self.name, NameUse::Official)
            .into_iter()
            .next()
            .or_else(|| self.name.first())
    }

    /// The first `home` address, else the first address of any use.
    pub fn home_address(&self) -> Option<&Address> {
        Address::addresses_by_use(&self.address, AddressUse::Home)
            .into_iter()
            .next()
            .or_else(|| self.address.first())
    }

    /// Birth date as a calendar date; `None` when absent or not of full precision.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(dates::parse_date)
    }

    /// Age in completed years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date()
            .map(|dob| dates::age_from_dob(dob, today))
    }
}

impl Resource for Patient {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
