//! Free-text edit fields backed by structured values.
//!
//! Each keystroke is offered to the parser. When it parses, the structured value is updated and
//! the text is normalised to the formatted value; when it does not, the value is cleared and
//! the text is left exactly as typed so the user can keep editing.

use fhir::{Quantity, Range};

/// Edit field for a [`Quantity`] such as `">=12.5 mg"`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantityInput {
    text: String,
    value: Option<Quantity>,
}

impl QuantityInput {
    /// A field showing `value` formatted.
    pub fn new(value: Option<Quantity>) -> Self {
        let text = value.as_ref().map(ToString::to_string).unwrap_or_default();
        Self { text, value }
    }

    /// Apply the full field text after an edit.
    ///
    /// Text ending in `.` or a space is kept as typed even when it parses, so that decimals
    /// and units can still be entered.
    pub fn apply(&mut self, raw: &str) {
        self.value = Quantity::parse(raw);

        self.text = match &self.value {
            Some(_) if raw.ends_with('.') || raw.ends_with(' ') => raw.to_string(),
            Some(quantity) => quantity.to_string(),
            None => {
                tracing::debug!("quantity input not understood: {raw:?}");
                raw.to_string()
            }
        };
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<&Quantity> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Quantity> {
        self.value
    }
}

/// Edit field for an age [`Range`] such as `"40s"` or `"50-60"`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgeRangeInput {
    text: String,
    value: Option<Range>,
}

impl AgeRangeInput {
    /// A field showing `value` as an age string without units.
    pub fn new(value: Option<Range>) -> Self {
        let text = value
            .as_ref()
            .map(|r| r.to_age_string(false))
            .unwrap_or_default();
        Self { text, value }
    }

    /// Apply the full field text after an edit.
    pub fn apply(&mut self, raw: &str) {
        self.value = Range::parse_age(raw);

        self.text = match &self.value {
            Some(range) => range.to_age_string(false),
            None => {
                tracing::debug!("age range input not understood: {raw:?}");
                raw.to_string()
            }
        };
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<&Range> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Range> {
        self.value
    }
}
