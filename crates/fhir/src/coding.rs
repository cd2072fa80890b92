//! FHIR `Coding`: one coded term from a vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single coded term: the vocabulary `system`, the `code` within it and advisory `display` text.
///
/// All fields are optional on the wire, so a `Coding` carrying only `display` is valid input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,
}

impl Coding {
    /// Create a coding from a system, code and display triple.
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: Some(display.into()),
            ..Self::default()
        }
    }

    /// Human-readable text: `display` if present, else `code`, else the empty string.
    pub fn text(&self) -> &str {
        non_empty(self.display.as_deref())
            .or_else(|| non_empty(self.code.as_deref()))
            .unwrap_or("")
    }

    /// [`Coding::text`] for a coding that may be absent.
    pub fn text_of(coding: Option<&Coding>) -> &str {
        coding.map(Coding::text).unwrap_or("")
    }

    /// Codings whose `system` matches exactly, in input order.
    pub fn codings_by_system<'a>(codings: &'a [Coding], system: &str) -> Vec<&'a Coding> {
        codings
            .iter()
            .filter(|c| c.system.as_deref() == Some(system))
            .collect()
    }

    /// Codings whose `code` matches exactly, in input order.
    pub fn codings_by_code<'a>(codings: &'a [Coding], code: &str) -> Vec<&'a Coding> {
        codings
            .iter()
            .filter(|c| c.code.as_deref() == Some(code))
            .collect()
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
