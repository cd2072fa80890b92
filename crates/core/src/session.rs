//! Editing a single family member history record.
//!
//! An [`EditSession`] is either [`Closed`] or [`Editing`]. Opening a session takes a deep copy
//! of the record (or builds a new one), so edits never touch the list the service holds until
//! [`EditSession::save`] hands the working copy back as a [`SaveRequest`]. Cancelling simply
//! drops the copy.

use crate::constants::DEFAULT_RELATIONSHIP_KEY;
use crate::error::CoreResult;
use crate::input::{AgeRangeInput, QuantityInput};
use fhir::vocabulary::{administrative_genders, family_relationships};
use fhir::{Annotation, FamilyMemberHistory};

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: no record is being edited.
#[derive(Clone, Copy, Debug, Default)]
pub struct Closed;

/// Marker type: a working copy is open for editing.
#[derive(Clone, Debug)]
pub struct Editing {
    working: FamilyMemberHistory,
    age_input: AgeRangeInput,
    deceased_age_input: QuantityInput,
}

// ============================================================================
// EDIT SESSION
// ============================================================================

/// Edit session for one family member history record.
///
/// Generic parameter `S` is either `Closed` or `Editing`.
#[derive(Clone, Debug)]
pub struct EditSession<S> {
    state: S,
}

/// A finished edit, ready to be created or updated in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveRequest {
    record: FamilyMemberHistory,
}

impl SaveRequest {
    pub fn new(record: FamilyMemberHistory) -> Self {
        Self { record }
    }

    /// The record has never been stored.
    pub fn is_new(&self) -> bool {
        self.record.is_new()
    }

    pub fn record(&self) -> &FamilyMemberHistory {
        &self.record
    }

    pub fn into_record(self) -> FamilyMemberHistory {
        self.record
    }
}

impl EditSession<Closed> {
    pub fn new() -> Self {
        Self { state: Closed }
    }

    /// Open a new record for `patient_id` with the generic "family member" relationship.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Fhir`] if the default relationship is missing from the
    /// vocabulary.
    pub fn open_new(self, patient_id: &str) -> CoreResult<EditSession<Editing>> {
        let record = FamilyMemberHistory::new(patient_id, DEFAULT_RELATIONSHIP_KEY.into())?;
        Ok(EditSession::editing(record))
    }

    /// Open a deep copy of an existing record.
    pub fn open_existing(self, record: &FamilyMemberHistory) -> EditSession<Editing> {
        EditSession::editing(record.deep_copy())
    }
}

impl Default for EditSession<Closed> {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession<Editing> {
    fn editing(working: FamilyMemberHistory) -> Self {
        let age_input = AgeRangeInput::new(working.age_range.clone());
        let deceased_age_input = QuantityInput::new(working.deceased_age.clone());
        Self {
            state: Editing {
                working,
                age_input,
                deceased_age_input,
            },
        }
    }

    /// The working copy as edited so far.
    pub fn working(&self) -> &FamilyMemberHistory {
        &self.state.working
    }

    /// Vocabulary key of the current relationship, if its first coding is a known code.
    pub fn relationship_key(&self) -> Option<&'static str> {
        family_relationships().key_for_concept(&self.state.working.relationship)
    }

    /// Vocabulary key of the current sex, if set and known.
    pub fn sex_key(&self) -> Option<&'static str> {
        self.state
            .working
            .sex
            .as_ref()
            .and_then(|sex| administrative_genders().key_for_concept(sex))
    }

    pub fn age_text(&self) -> &str {
        self.state.age_input.text()
    }

    pub fn deceased_age_text(&self) -> &str {
        self.state.deceased_age_input.text()
    }

    /// Set the relative's name; an empty name clears it.
    pub fn set_name(&mut self, name: &str) {
        self.state.working.name = (!name.is_empty()).then(|| name.to_string());
    }

    /// Replace the relationship with the vocabulary entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Fhir`] if `key` is not a relationship key. The working copy
    /// is left unchanged.
    pub fn set_relationship_key(&mut self, key: &str) -> CoreResult<()> {
        self.state.working.relationship = family_relationships().concept(key)?;
        Ok(())
    }

    /// Replace the sex with the vocabulary entry for `key`; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Fhir`] if `key` is not a gender key.
    pub fn set_sex_key(&mut self, key: Option<&str>) -> CoreResult<()> {
        self.state.working.sex = match key {
            Some(key) => Some(administrative_genders().concept(key)?),
            None => None,
        };
        Ok(())
    }

    pub fn set_deceased(&mut self, deceased: bool) {
        self.state.working.deceased_boolean = Some(deceased);
    }

    /// Apply the age field text; the age range follows whatever parses.
    pub fn set_age_text(&mut self, text: &str) {
        self.state.age_input.apply(text);
        self.state.working.age_range = self.state.age_input.value().cloned();
    }

    /// Apply the age-at-death field text; the deceased age follows whatever parses.
    pub fn set_deceased_age_text(&mut self, text: &str) {
        self.state.deceased_age_input.apply(text);
        self.state.working.deceased_age = self.state.deceased_age_input.value().cloned();
    }

    /// Replace the notes with a single note; an empty note clears them.
    pub fn set_note(&mut self, text: &str) {
        self.state.working.note = if text.is_empty() {
            Vec::new()
        } else {
            vec![Annotation::new(text)]
        };
    }

    /// Close the session, handing back the working copy to be stored.
    pub fn save(self) -> (EditSession<Closed>, SaveRequest) {
        (EditSession::new(), SaveRequest::new(self.state.working))
    }

    /// Close the session, discarding all edits.
    pub fn cancel(self) -> EditSession<Closed> {
        EditSession::new()
    }
}
