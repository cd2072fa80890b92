//! FHIR `Age`: a [`Quantity`] constrained to a UCUM time unit.

use crate::quantity::Quantity;

/// UCUM code system for coded units.
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// An age is carried on the wire exactly like a quantity.
pub type Age = Quantity;

impl Quantity {
    /// An actual age in years: `{value, unit: "yr", system: UCUM, code: "a"}`.
    pub fn from_years(years: f64) -> Age {
        Quantity::new(
            years,
            Some("yr".to_string()),
            Some(UCUM_SYSTEM.to_string()),
            Some("a".to_string()),
            None,
        )
    }
}
