//! Family history table rows.

use crate::constants::CONDITION_SEPARATOR;
use fhir::{CodeableConcept, FamilyMemberHistory};
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the family history table, with every cell already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FamilyHistoryRow {
    pub id: Option<String>,
    pub relationship: String,
    pub name: String,
    pub sex: String,
    pub age: String,
    pub conditions: String,

    #[serde(skip)]
    relationship_concept: CodeableConcept,
}

/// Sortable table columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Relationship,
    Name,
    Sex,
    Age,
    Conditions,
}

impl FamilyHistoryRow {
    pub fn from_record(record: &FamilyMemberHistory) -> Self {
        let sex = match &record.sex {
            Some(sex) => match sex.text.as_deref() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => sex.display_text(false),
            },
            None => String::new(),
        };

        let age = if let Some(age) = &record.age_age {
            age.value_text()
        } else if let Some(range) = &record.age_range {
            range.to_string()
        } else {
            String::new()
        };

        let conditions = record
            .condition
            .iter()
            .map(|c| c.code.text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(CONDITION_SEPARATOR);

        Self {
            id: record.id.clone(),
            relationship: record.relationship.display_text(false),
            name: record.name.clone().unwrap_or_default(),
            sex,
            age,
            conditions,
            relationship_concept: record.relationship.clone(),
        }
    }

    /// Order two rows by `column`, ascending.
    pub fn compare(&self, other: &Self, column: SortColumn) -> Ordering {
        match column {
            SortColumn::Relationship => CodeableConcept::sort_by_display_text(
                Some(&self.relationship_concept),
                Some(&other.relationship_concept),
            ),
            SortColumn::Name => self.name.cmp(&other.name),
            SortColumn::Sex => self.sex.cmp(&other.sex),
            SortColumn::Age => self.age.cmp(&other.age),
            SortColumn::Conditions => self.conditions.cmp(&other.conditions),
        }
    }
}

/// Stable sort of `rows` by `column`.
pub fn sort_rows(rows: &mut [FamilyHistoryRow], column: SortColumn, descending: bool) {
    rows.sort_by(|a, b| {
        let ordering = a.compare(b, column);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
