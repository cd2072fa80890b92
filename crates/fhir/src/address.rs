//! FHIR `Address` and its display formatting.

use crate::coding::non_empty;
use crate::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressUse {
    Home,
    Work,
    Temp,
    Old,
    Billing,
}

/// Postal address parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_type: Option<AddressUse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub line: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Which segments [`Address::format`] renders. All default to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressFormat {
    pub include_address: bool,
    pub include_city_state_zip: bool,
    pub include_country: bool,
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self {
            include_address: true,
            include_city_state_zip: true,
            include_country: true,
        }
    }
}

impl Address {
    /// City, or the empty string.
    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    /// State, or the empty string.
    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("")
    }

    /// Render up to three segments joined by `separator`:
    /// street lines (joined with `", "`), `"city, state postalCode"`, and country.
    ///
    /// A segment is included only when its option is set and it is non-empty.
    pub fn format(&self, separator: &str, options: AddressFormat) -> String {
        let lines = self.formatted_lines();
        let city_state_zip = self.formatted_city_state_zip();
        let country = non_empty(self.country.as_deref()).unwrap_or("");

        let segments = [
            (options.include_address, lines.as_str()),
            (options.include_city_state_zip, city_state_zip.as_str()),
            (options.include_country, country),
        ];

        segments
            .into_iter()
            .filter(|(included, segment)| *included && !segment.is_empty())
            .map(|(_, segment)| segment)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Addresses with exactly the given use, in input order.
    pub fn addresses_by_use(addresses: &[Address], use_type: AddressUse) -> Vec<&Address> {
        addresses
            .iter()
            .filter(|a| a.use_type == Some(use_type))
            .collect()
    }

    // line1, line2
    fn formatted_lines(&self) -> String {
        self.line
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // City, State Zip
    fn formatted_city_state_zip(&self) -> String {
        let city = non_empty(self.city.as_deref());
        let state = non_empty(self.state.as_deref());

        let mut s = String::new();
        if let Some(city) = city {
            s.push_str(city);
        }
        if city.is_some() && state.is_some() {
            s.push_str(", ");
        }
        if let Some(state) = state {
            s.push_str(state);
        }
        if let Some(postal_code) = non_empty(self.postal_code.as_deref()) {
            if !s.is_empty() {
                s.push(' ');
            }
            s.push_str(postal_code);
        }
        s
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(", ", AddressFormat::default()))
    }
}
