//! Constants used throughout the family history core crate.

/// Patient id used when none is configured.
pub const DEFAULT_PATIENT_ID: &str = "example-patient";

/// Relationship key a new family member record starts with.
pub const DEFAULT_RELATIONSHIP_KEY: &str = "FamilyMember";

/// Header name shown for a patient without any names.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Separator between condition names in a table row.
pub const CONDITION_SEPARATOR: &str = ", ";
