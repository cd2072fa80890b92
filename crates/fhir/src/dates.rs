//! Calendar helpers for FHIR `date` values.

use chrono::NaiveDate;

/// Parse a FHIR `date` of full precision (`YYYY-MM-DD`).
///
/// Partial dates (`"1992"`, `"1992-03"`) carry no day and yield `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Completed years between `dob` and `today`.
///
/// The birthday itself counts as completed; a `dob` after `today` gives `0`.
pub fn age_from_dob(dob: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(dob).unwrap_or(0)
}
