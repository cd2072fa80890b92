//! FHIR `Quantity`: a measured or estimated amount, parsed from and formatted to clinic text.
//!
//! Accepted free-text forms:
//!
//! ```text
//! 50        50 day
//! >50       >50 day
//! >=50      >=12.5 mg
//! ```

use crate::coding::non_empty;
use crate::numeric::{format_number, parse_leading_float};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Inequality prefix on a quantity's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
}

impl Comparator {
    /// Candidates in prefix-matching order. Two-character forms must come first so that
    /// `"<=5"` is not read as `"<"` followed by `"=5"`.
    const PREFIX_ORDER: [Comparator; 4] = [
        Comparator::LessOrEqual,
        Comparator::GreaterOrEqual,
        Comparator::LessThan,
        Comparator::GreaterThan,
    ];

    /// The wire/display symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::LessThan => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::GreaterOrEqual => ">=",
            Comparator::GreaterThan => ">",
        }
    }

    /// Split a leading comparator off `s`, if there is one.
    fn strip_prefix(s: &str) -> (Option<Comparator>, &str) {
        for comparator in Self::PREFIX_ORDER {
            if let Some(rest) = s.strip_prefix(comparator.as_str()) {
                return (Some(comparator), rest);
            }
        }
        (None, s)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric value with optional comparator, unit and coded unit (`system` + `code`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Options for [`Quantity::format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantityFormat {
    /// Render the value with exactly this many decimals. `None` or `Some(0)` renders it as is.
    pub fraction_digits: Option<usize>,
    pub include_comparator: bool,
    pub include_units: bool,
}

impl Default for QuantityFormat {
    fn default() -> Self {
        Self {
            fraction_digits: None,
            include_comparator: true,
            include_units: true,
        }
    }
}

impl Quantity {
    pub fn new(
        value: f64,
        unit: Option<String>,
        system: Option<String>,
        code: Option<String>,
        comparator: Option<Comparator>,
    ) -> Self {
        Self {
            value: Some(value),
            comparator,
            unit,
            system,
            code,
        }
    }

    /// Render as `"<comparator><value> <unit>"`, leaving out the parts that are absent.
    ///
    /// A value of exactly zero is treated like a missing value and is not rendered, so
    /// `{value: 0, unit: "mg"}` formats as `" mg"`. NaN is likewise omitted.
    pub fn format(&self, options: QuantityFormat) -> String {
        let mut s = String::new();

        if options.include_comparator {
            if let Some(comparator) = self.comparator {
                s.push_str(comparator.as_str());
            }
        }

        if let Some(value) = self.value.filter(|v| *v != 0.0 && !v.is_nan()) {
            match options.fraction_digits.filter(|d| *d > 0) {
                Some(digits) => s.push_str(&format!("{value:.digits$}")),
                None => s.push_str(&format_number(value)),
            }
        }

        if options.include_units {
            if let Some(unit) = non_empty(self.unit.as_deref()) {
                s.push(' ');
                s.push_str(unit);
            }
        }

        s
    }

    /// [`Quantity::format`] for a quantity that may be absent.
    pub fn format_optional(quantity: Option<&Quantity>, options: QuantityFormat) -> String {
        quantity.map(|q| q.format(options)).unwrap_or_default()
    }

    /// The bare value (`"60"`, `"12.5"`), or `""` when absent or NaN.
    ///
    /// Unlike [`Quantity::format`], zero is rendered as `"0"`.
    pub fn value_text(&self) -> String {
        self.value
            .filter(|v| !v.is_nan())
            .map(format_number)
            .unwrap_or_default()
    }

    /// Parse free text such as `"50"`, `">50 day"` or `">=12.5 mg"`.
    ///
    /// An optional leading comparator is stripped, then the text is split at the first space
    /// into a value token and a unit. The value token is read as a number (its numeric prefix
    /// counts, so `"12mg"` is `12`). When no number can be read the whole input is rejected
    /// with `None`. A blank unit is treated as absent.
    pub fn parse(s: &str) -> Option<Self> {
        let (comparator, rest) = Comparator::strip_prefix(s);

        let (value_token, unit) = match rest.split_once(' ') {
            Some((value, unit)) => (value, Some(unit)),
            None => (rest, None),
        };

        let value = parse_leading_float(value_token).filter(|v| !v.is_nan())?;
        let unit = unit.filter(|u| !u.is_empty()).map(str::to_string);

        Some(Self::new(value, unit, None, None, comparator))
    }

    /// Ascending comparator on `value`.
    ///
    /// Missing quantities and missing values sort first; two missing values compare equal.
    pub fn sort_by_value_ascending(a: Option<&Quantity>, b: Option<&Quantity>) -> Ordering {
        let (a, b) = match (a, b) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => (a, b),
        };

        match (a.value, b.value) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(QuantityFormat::default()))
    }
}
