//! FHIR `Range`: a low/high pair of quantities, parsed from numeric and age shorthand text.
//!
//! Accepted free-text forms:
//!
//! ```text
//! 50          single point (low only)
//! 50-75       two-ended
//! 50 - 75     two-ended
//! 40s, 40's   decade shorthand for 40-49 (ages only)
//! ```

use crate::coding::non_empty;
use crate::numeric::{format_number, parse_leading_int, parse_number};
use crate::quantity::Quantity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A low/high bound pair. Either end may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
}

impl Range {
    pub fn new(low: Option<Quantity>, high: Option<Quantity>) -> Self {
        Self { low, high }
    }

    /// Wrap bare numbers as unit-less quantities.
    ///
    /// A `high` of zero (or NaN) is treated as absent and yields a single-ended range.
    pub fn from_numbers(low: f64, high: Option<f64>) -> Self {
        let bare = |value: f64| Quantity {
            value: Some(value),
            ..Quantity::default()
        };
        Self {
            low: Some(bare(low)),
            high: high.filter(|h| *h != 0.0 && !h.is_nan()).map(bare),
        }
    }

    /// Parse `"50"`, `"50-75"` or `"50 - 75"`.
    ///
    /// A string that is wholly numeric becomes a single-point range with only `low` set.
    /// Otherwise the text is split at the first `-`; both halves must be non-blank numbers.
    /// Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(value) = parse_number(s) {
            return Some(Self::from_numbers(value, None));
        }

        let (low, high) = s.split_once('-')?;
        if low.trim().is_empty() || high.trim().is_empty() {
            return None;
        }
        let low = parse_number(low)?;
        let high = parse_number(high)?;
        Some(Self::from_numbers(low, Some(high)))
    }

    /// Parse an age range, additionally accepting decade shorthand (`"40s"`, `"40's"`).
    ///
    /// The text before the first `s`, minus one apostrophe, must be numeric; its leading
    /// integer is the decade start and the range runs to start + 9 (`"40.5s"` and `"4e1s"`
    /// read as 40 and 4). A numeric prefix without a leading integer (`".5s"`) or one too
    /// large to represent is rejected. Text with an `s` that has no numeric prefix is handed to
    /// [`Range::parse`] unchanged (and will usually be rejected there).
    pub fn parse_age(s: &str) -> Option<Self> {
        if let Some((decade, _)) = s.split_once('s') {
            let decade = decade.replacen('\'', "", 1);
            if parse_number(&decade).is_some() {
                return parse_leading_int(&decade)
                    .filter(|start| (start + 9.0).is_finite())
                    .map(|start| Self::from_numbers(start, Some(start + 9.0)));
            }
        }

        Self::parse(s)
    }

    /// Render as `"<low> <unit> - <high> <unit>"`.
    ///
    /// Absent ends, NaN values and blank units are simply left out. Unlike
    /// [`Quantity::format`], a zero bound is rendered.
    pub fn format(&self, include_units: bool) -> String {
        let mut s = String::new();

        if let Some(low) = &self.low {
            if let Some(value) = low.value.filter(|v| !v.is_nan()) {
                s.push_str(&format_number(value));
            }
            if include_units {
                if let Some(unit) = non_empty(low.unit.as_deref()) {
                    s.push(' ');
                    s.push_str(unit);
                }
            }
        }

        if let Some(high) = &self.high {
            if let Some(value) = high.value.filter(|v| !v.is_nan()) {
                s.push_str(" - ");
                s.push_str(&format_number(value));
            }
            if include_units {
                if let Some(unit) = non_empty(high.unit.as_deref()) {
                    s.push(' ');
                    s.push_str(unit);
                }
            }
        }

        s
    }

    /// Render an age range (values in years) with a trailing `"y"` when `include_units` is set.
    ///
    /// The quantities' own units are never rendered here.
    pub fn to_age_string(&self, include_units: bool) -> String {
        let mut s = self.format(false);
        if include_units {
            s.push('y');
        }
        s
    }

    /// Comparator on the `low` ends.
    ///
    /// Returns [`Ordering::Less`] whenever either range or either `low` is missing, whatever
    /// the argument order. That breaks antisymmetry; see [`Range::sort_by_high_value`].
    pub fn sort_by_low_value(a: Option<&Range>, b: Option<&Range>) -> Ordering {
        match (a.and_then(|r| r.low.as_ref()), b.and_then(|r| r.low.as_ref())) {
            (Some(a), Some(b)) => Quantity::sort_by_value_ascending(Some(a), Some(b)),
            _ => Ordering::Less,
        }
    }

    /// Comparator on the `high` ends.
    ///
    /// Returns [`Ordering::Less`] whenever either range or either `high` is missing. Sorting a
    /// slice with several such entries gives an unspecified order.
    pub fn sort_by_high_value(a: Option<&Range>, b: Option<&Range>) -> Ordering {
        match (a.and_then(|r| r.high.as_ref()), b.and_then(|r| r.high.as_ref())) {
            (Some(a), Some(b)) => Quantity::sort_by_value_ascending(Some(a), Some(b)),
            _ => Ordering::Less,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true))
    }
}
