//! FHIR `CodeableConcept`: one concept expressed as coded terms plus optional free text.

use crate::coding::{non_empty, Coding};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An ordered list of [`Coding`]s with optional free `text`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Create a concept from a list of codings and optional text.
    pub fn new(coding: Vec<Coding>, text: Option<String>) -> Self {
        Self { coding, text }
    }

    /// Wrap a single coding into a one-element concept.
    pub fn from_single_coding(coding: Coding, text: Option<String>) -> Self {
        Self::new(vec![coding], text)
    }

    /// Resolve the concept to one display string.
    ///
    /// Structured codings win over `text`:
    /// - with `only_first_code`, the first coding's `display` is used if non-empty
    /// - otherwise every non-empty coding `display` is joined with `", "`
    ///
    /// A coding that carries only a code contributes nothing at first. When the displays yield
    /// nothing, `text` is returned; without `text`, the join mode falls back to the codings'
    /// codes, and the empty string is left for a concept with neither.
    pub fn display_text(&self, only_first_code: bool) -> String {
        if only_first_code {
            if let Some(display) = self
                .coding
                .first()
                .and_then(|c| non_empty(c.display.as_deref()))
            {
                return display.to_string();
            }
        } else {
            let all = self
                .coding
                .iter()
                .filter_map(|c| non_empty(c.display.as_deref()))
                .collect::<Vec<_>>()
                .join(", ");
            if !all.is_empty() {
                return all;
            }
        }

        if let Some(text) = non_empty(self.text.as_deref()) {
            return text.to_string();
        }
        if only_first_code {
            return String::new();
        }
        self.coding
            .iter()
            .map(Coding::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comparator on resolved display text for table sorting.
    ///
    /// If either side is absent this returns [`Ordering::Less`] regardless of argument order.
    /// That is not antisymmetric: callers sorting slices with more than one missing entry get
    /// an unspecified order (and the standard library sort may panic on the inconsistency).
    pub fn sort_by_display_text(a: Option<&Self>, b: Option<&Self>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => locale_compare(&a.display_text(false), &b.display_text(false)),
            _ => Ordering::Less,
        }
    }
}

impl fmt::Display for CodeableConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text(false))
    }
}

impl From<Coding> for CodeableConcept {
    fn from(coding: Coding) -> Self {
        Self::from_single_coding(coding, None)
    }
}

/// Case-insensitive comparison with a case-sensitive tie-break, so `"aunt"` sorts next to `"Aunt"`.
pub(crate) fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coding(display: Option<&str>, code: Option<&str>) -> Coding {
        Coding {
            system: Some("s".into()),
            code: code.map(Into::into),
            display: display.map(Into::into),
            ..Coding::default()
        }
    }

    #[test]
    fn empty_concept_is_blank() {
        assert_eq!(CodeableConcept::default().display_text(false), "");
        assert_eq!(CodeableConcept::default().display_text(true), "");
    }

    #[test]
    fn display_from_single_coding() {
        let cc = CodeableConcept::from_single_coding(
            Coding {
                display: Some("Father".into()),
                ..Coding::default()
            },
            None,
        );
        assert_eq!(cc.display_text(false), "Father");
        assert_eq!(cc.to_string(), "Father");
    }

    #[test]
    fn joins_all_codings() {
        let cc = CodeableConcept::new(
            vec![
                coding(Some("Father"), Some("FTH")),
                coding(None, None),
                coding(Some("natural father"), Some("NFTH")),
            ],
            Some("Dad".into()),
        );
        assert_eq!(cc.display_text(false), "Father, natural father");
    }

    #[test]
    fn code_without_display_falls_back_to_text() {
        let cc = CodeableConcept::new(vec![coding(None, Some("c"))], Some("Fallback".into()));
        assert_eq!(cc.display_text(false), "Fallback");

        let no_text = CodeableConcept::new(vec![coding(None, Some("c"))], None);
        assert_eq!(no_text.display_text(false), "c");
        assert_eq!(no_text.display_text(true), "");
    }

    #[test]
    fn codes_are_the_last_resort_in_join_mode() {
        let cc = CodeableConcept::new(
            vec![coding(None, Some("FTH")), coding(None, None), coding(None, Some("NFTH"))],
            None,
        );
        assert_eq!(cc.display_text(false), "FTH, NFTH");
        assert_eq!(cc.to_string(), "FTH, NFTH");

        let with_blank_text =
            CodeableConcept::new(vec![coding(None, Some("MTH"))], Some(String::new()));
        assert_eq!(with_blank_text.display_text(false), "MTH");
    }

    #[test]
    fn falls_back_to_text_when_codings_are_blank() {
        let cc = CodeableConcept::new(
            vec![Coding {
                system: Some("s".into()),
                ..Coding::default()
            }],
            Some("Fallback".into()),
        );
        assert_eq!(cc.display_text(false), "Fallback");

        let text_only = CodeableConcept::new(vec![], Some("Only text".into()));
        assert_eq!(text_only.display_text(false), "Only text");
    }

    #[test]
    fn only_first_code_uses_first_display() {
        let cc = CodeableConcept::new(
            vec![
                coding(Some("mother"), Some("MTH")),
                coding(Some("natural mother"), Some("NMTH")),
            ],
            None,
        );
        assert_eq!(cc.display_text(true), "mother");

        // A first coding without display skips straight to text, ignoring later codings.
        let no_display = CodeableConcept::new(
            vec![coding(None, Some("MTH")), coding(Some("mother"), None)],
            Some("Mum".into()),
        );
        assert_eq!(no_display.display_text(true), "Mum");
    }

    #[test]
    fn sort_by_display_text_orders_present_values() {
        let aunt = CodeableConcept::from(coding(Some("aunt"), None));
        let brother = CodeableConcept::from(coding(Some("Brother"), None));

        assert_eq!(
            CodeableConcept::sort_by_display_text(Some(&aunt), Some(&brother)),
            Ordering::Less
        );
        assert_eq!(
            CodeableConcept::sort_by_display_text(Some(&brother), Some(&aunt)),
            Ordering::Greater
        );
        assert_eq!(
            CodeableConcept::sort_by_display_text(Some(&aunt), Some(&aunt)),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_by_display_text_missing_operand_is_always_less() {
        // Known asymmetry: a missing operand on either side compares as Less.
        let aunt = CodeableConcept::from(coding(Some("aunt"), None));
        assert_eq!(
            CodeableConcept::sort_by_display_text(None, Some(&aunt)),
            Ordering::Less
        );
        assert_eq!(
            CodeableConcept::sort_by_display_text(Some(&aunt), None),
            Ordering::Less
        );
        assert_eq!(
            CodeableConcept::sort_by_display_text(None, None),
            Ordering::Less
        );
    }

    #[test]
    fn round_trips_r4_json() {
        let json = r#"{"coding":[{"system":"http://hl7.org/fhir/administrative-gender","code":"male","display":"Male"}],"text":"Male"}"#;
        let cc: CodeableConcept = serde_json::from_str(json).expect("parse concept");
        assert_eq!(cc.coding.len(), 1);
        assert_eq!(serde_json::to_string(&cc).expect("render concept"), json);
    }
}
