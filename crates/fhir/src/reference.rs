//! FHIR `Reference` and the [`Resource`] identity seam.
//!
//! A reference points at another resource with a relative literal of the form
//! `"ResourceType/id"`. Two references are considered to name the same resource when their
//! literals are equal; no server base URL or version suffix is interpreted.

use crate::coding::non_empty;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything addressable as `"ResourceType/id"`.
pub trait Resource {
    /// The FHIR resource type name, e.g. `"Patient"`.
    fn resource_type(&self) -> &str;

    /// The logical id, absent until the resource has been stored.
    fn id(&self) -> Option<&str>;

    /// The relative reference literal for this resource.
    fn reference_literal(&self) -> String {
        format!("{}/{}", self.resource_type(), self.id().unwrap_or(""))
    }
}

/// A bare `(resource type, id)` pair, for when only identity is known.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub resource_type: String,
    pub id: String,
}

impl ResourceKey {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl Resource for ResourceKey {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

/// Pointer from one resource to another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Reference to `"{resource_type}/{id}"`.
    pub fn create(resource_type: &str, id: &str, display: Option<String>) -> Self {
        Self {
            reference: Some(format!("{resource_type}/{id}")),
            resource_type: None,
            display,
        }
    }

    /// Reference to an existing resource.
    pub fn from_resource(resource: &dyn Resource, display: Option<String>) -> Self {
        Self::create(resource.resource_type(), resource.id().unwrap_or(""), display)
    }

    /// Display text: `display` if present, else the raw reference, else `""`.
    pub fn text(&self) -> &str {
        non_empty(self.display.as_deref())
            .or(non_empty(self.reference.as_deref()))
            .unwrap_or("")
    }

    /// The resource type part of `"Type/id"`, or `""` unless the literal has exactly two parts.
    pub fn resource_type_of(reference: &str) -> &str {
        Self::split_literal(reference).map_or("", |(resource_type, _)| resource_type)
    }

    /// The id part of `"Type/id"`, or `""` unless the literal has exactly two parts.
    pub fn id_of(reference: &str) -> &str {
        Self::split_literal(reference).map_or("", |(_, id)| id)
    }

    /// This reference's resource type, per [`Reference::resource_type_of`].
    pub fn target_type(&self) -> &str {
        Self::resource_type_of(self.reference.as_deref().unwrap_or(""))
    }

    /// This reference's target id, per [`Reference::id_of`].
    pub fn target_id(&self) -> &str {
        Self::id_of(self.reference.as_deref().unwrap_or(""))
    }

    /// Whether this reference names `resource`, comparing reference literals.
    ///
    /// `display` is ignored, so a labelled reference still matches its target.
    pub fn is_reference_to(&self, resource: &dyn Resource) -> bool {
        match self.reference.as_deref() {
            Some(literal) => literal == resource.reference_literal(),
            None => false,
        }
    }

    fn split_literal(reference: &str) -> Option<(&str, &str)> {
        let mut parts = reference.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(resource_type), Some(id), None) => Some((resource_type, id)),
            _ => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_builds_relative_literal() {
        let reference = Reference::create("Patient", "123", None);
        assert_eq!(reference.reference.as_deref(), Some("Patient/123"));
        assert_eq!(reference.to_string(), "Patient/123");

        let named = Reference::create("Patient", "123", Some("Sarah Williams".into()));
        assert_eq!(named.to_string(), "Sarah Williams");
    }

    #[test]
    fn from_resource_uses_type_and_id() {
        let key = ResourceKey::new("FamilyMemberHistory", "abc");
        let reference = Reference::from_resource(&key, None);
        assert_eq!(reference.reference.as_deref(), Some("FamilyMemberHistory/abc"));
    }

    #[test]
    fn empty_reference_displays_as_empty() {
        assert_eq!(Reference::default().to_string(), "");
    }

    #[test]
    fn splits_two_part_literals_only() {
        assert_eq!(Reference::resource_type_of("Patient/123"), "Patient");
        assert_eq!(Reference::id_of("Patient/123"), "123");

        assert_eq!(Reference::resource_type_of("Patient"), "");
        assert_eq!(Reference::id_of("Patient"), "");
        assert_eq!(Reference::id_of("Patient/123/_history/2"), "");
        assert_eq!(Reference::id_of(""), "");

        let reference = Reference::create("Patient", "123", None);
        assert_eq!(reference.target_type(), "Patient");
        assert_eq!(reference.target_id(), "123");
    }

    #[test]
    fn is_reference_to_compares_literals() {
        let reference = Reference {
            reference: Some("Patient/123".into()),
            ..Reference::default()
        };
        assert!(reference.is_reference_to(&ResourceKey::new("Patient", "123")));
        assert!(!reference.is_reference_to(&ResourceKey::new("Patient", "124")));
        assert!(!reference.is_reference_to(&ResourceKey::new("Practitioner", "123")));
        assert!(!Reference::default().is_reference_to(&ResourceKey::new("Patient", "123")));
    }

    #[test]
    fn is_reference_to_ignores_display() {
        let labelled = Reference::create("Patient", "123", Some("Jane Bloggs".into()));
        assert_eq!(labelled.text(), "Jane Bloggs");
        assert!(labelled.is_reference_to(&ResourceKey::new("Patient", "123")));

        let display_only = Reference {
            display: Some("Patient/123".into()),
            ..Reference::default()
        };
        assert!(!display_only.is_reference_to(&ResourceKey::new("Patient", "123")));
    }

    #[test]
    fn serialises_type_field_name() {
        let reference = Reference {
            reference: Some("Patient/123".into()),
            resource_type: Some("Patient".into()),
            display: None,
        };
        let json = serde_json::to_string(&reference).expect("serialise");
        assert_eq!(json, r#"{"reference":"Patient/123","type":"Patient"}"#);
    }
}
