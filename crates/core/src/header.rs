//! One-line patient summary shown above the family history table.

use crate::constants::UNKNOWN_NAME;
use chrono::NaiveDate;
use fhir::{AddressFormat, HumanNameFormat, Patient};
use serde::Serialize;

/// Patient header text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatientHeader {
    pub id: String,
    pub name: String,
    /// `"<gender>, <age>y, <YYYY-MM-DD>"`, shortened when parts are unknown.
    pub sex_age_dob: String,
    pub address: String,
}

impl PatientHeader {
    /// Summarise `patient` as of `today`.
    ///
    /// A birth date that is present but not a full date is shown raw, without an age.
    pub fn from_patient(patient: &Patient, today: NaiveDate) -> Self {
        let name = patient
            .official_name()
            .map(|n| n.format(HumanNameFormat::default()))
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let mut parts: Vec<String> = Vec::new();
        if let Some(gender) = patient.gender {
            parts.push(gender.to_string());
        }
        match (patient.birth_date(), patient.birth_date.as_deref()) {
            (Some(dob), _) => {
                if let Some(age) = patient.age_on(today) {
                    parts.push(format!("{age}y"));
                }
                parts.push(dob.format("%Y-%m-%d").to_string());
            }
            (None, Some(raw)) if !raw.trim().is_empty() => parts.push(raw.to_string()),
            (None, _) => {}
        }

        let address = patient
            .home_address()
            .map(|a| a.format(", ", AddressFormat::default()))
            .unwrap_or_default();

        Self {
            id: patient.id.clone().unwrap_or_default(),
            name,
            sex_age_dob: parts.join(", "),
            address,
        }
    }
}
