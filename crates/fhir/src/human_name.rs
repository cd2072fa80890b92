//! FHIR `HumanName` and its display formatting.

use crate::coding::non_empty;
use crate::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose of a human name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    /// Usual/preferred name.
    Usual,
    /// Official name.
    Official,
    /// Temporary name.
    Temp,
    /// Nickname or informal name.
    Nickname,
    /// Anonymous name.
    Anonymous,
    /// Old name (no longer in use).
    Old,
    /// Maiden name.
    Maiden,
}

impl NameUse {
    /// FHIR wire format string.
    pub fn as_str(self) -> &'static str {
        match self {
            NameUse::Usual => "usual",
            NameUse::Official => "official",
            NameUse::Temp => "temp",
            NameUse::Nickname => "nickname",
            NameUse::Anonymous => "anonymous",
            NameUse::Old => "old",
            NameUse::Maiden => "maiden",
        }
    }
}

/// Structured person name.
///
/// `given`, `prefix` and `suffix` accept a bare string on input and are always held as lists;
/// `family` accepts an array on input and is held joined.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_type: Option<NameUse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::string_or_joined",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub given: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prefix: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub suffix: Vec<String>,
}

/// Options for [`HumanName::format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HumanNameFormat {
    pub include_prefix: bool,
    pub include_suffix: bool,
    /// Append the name's use in parentheses, e.g. `"John Doe (official)"`.
    pub include_use: bool,
}

impl Default for HumanNameFormat {
    fn default() -> Self {
        Self {
            include_prefix: true,
            include_suffix: true,
            include_use: false,
        }
    }
}

impl HumanName {
    /// Build a name; `text` is derived from the parts when not supplied.
    pub fn new(
        given: Vec<String>,
        family: Option<String>,
        use_type: Option<NameUse>,
        text: Option<String>,
    ) -> Self {
        let mut name = Self {
            use_type,
            family,
            given,
            ..Self::default()
        };
        let text = text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| name.format(HumanNameFormat::default()));
        name.text = Some(text);
        name
    }

    /// Render the name for display.
    ///
    /// A non-empty `text` is authoritative and returned verbatim; the structured parts are then
    /// ignored, as are the options. Otherwise prefix, given, family and suffix are joined with
    /// single spaces, skipping blank parts.
    pub fn format(&self, options: HumanNameFormat) -> String {
        if let Some(text) = non_empty(self.text.as_deref()) {
            return text.to_string();
        }

        let mut pieces: Vec<&str> = Vec::new();
        if options.include_prefix {
            pieces.extend(self.prefix.iter().map(String::as_str));
        }
        pieces.extend(self.given.iter().map(String::as_str));
        pieces.extend(self.family.as_deref());
        if options.include_suffix {
            pieces.extend(self.suffix.iter().map(String::as_str));
        }

        let mut s = pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if options.include_use {
            if let Some(use_type) = self.use_type {
                if !s.is_empty() {
                    s.push(' ');
                }
                s.push('(');
                s.push_str(use_type.as_str());
                s.push(')');
            }
        }

        s
    }

    /// Names with exactly the given use, in input order.
    pub fn names_by_use(names: &[HumanName], use_type: NameUse) -> Vec<&HumanName> {
        names
            .iter()
            .filter(|n| n.use_type == Some(use_type))
            .collect()
    }
}

impl fmt::Display for HumanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(HumanNameFormat::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(given: &[&str], family: Option<&str>) -> HumanName {
        HumanName {
            given: given.iter().map(|s| s.to_string()).collect(),
            family: family.map(Into::into),
            ..HumanName::default()
        }
    }

    #[test]
    fn formats_given_and_family() {
        assert_eq!(name(&["John"], Some("Doe")).to_string(), "John Doe");
        assert_eq!(
            name(&["Sarah", "Jane"], Some("Williams")).to_string(),
            "Sarah Jane Williams"
        );
        assert_eq!(name(&[], Some("Doe")).to_string(), "Doe");
        assert_eq!(HumanName::default().to_string(), "");
    }

    #[test]
    fn text_is_authoritative() {
        let mut n = name(&["John"], Some("Doe"));
        n.text = Some("Johnny D".into());
        assert_eq!(n.to_string(), "Johnny D");

        let opts = HumanNameFormat {
            include_use: true,
            ..HumanNameFormat::default()
        };
        n.use_type = Some(NameUse::Official);
        assert_eq!(n.format(opts), "Johnny D");
    }

    #[test]
    fn prefix_and_suffix_are_optional() {
        let mut n = name(&["Jane"], Some("Smith"));
        n.prefix = vec!["Dr.".into()];
        n.suffix = vec!["PhD".into(), "MD".into()];

        assert_eq!(n.to_string(), "Dr. Jane Smith PhD MD");

        let no_prefix = HumanNameFormat {
            include_prefix: false,
            ..HumanNameFormat::default()
        };
        assert_eq!(n.format(no_prefix), "Jane Smith PhD MD");

        let bare = HumanNameFormat {
            include_prefix: false,
            include_suffix: false,
            include_use: false,
        };
        assert_eq!(n.format(bare), "Jane Smith");
    }

    #[test]
    fn include_use_appends_use() {
        let mut n = name(&["John"], Some("Doe"));
        n.use_type = Some(NameUse::Nickname);
        let opts = HumanNameFormat {
            include_use: true,
            ..HumanNameFormat::default()
        };
        assert_eq!(n.format(opts), "John Doe (nickname)");
    }

    #[test]
    fn new_derives_text_from_parts() {
        let n = HumanName::new(
            vec!["John".into()],
            Some("Doe".into()),
            Some(NameUse::Official),
            None,
        );
        assert_eq!(n.text.as_deref(), Some("John Doe"));

        let explicit = HumanName::new(vec!["John".into()], None, None, Some("JD".into()));
        assert_eq!(explicit.text.as_deref(), Some("JD"));
    }

    #[test]
    fn names_by_use_filters_exactly() {
        let mut official = name(&["Sarah"], Some("Williams"));
        official.use_type = Some(NameUse::Official);
        let mut nickname = name(&["Sally"], None);
        nickname.use_type = Some(NameUse::Nickname);
        let names = vec![nickname, official.clone(), name(&["Anon"], None)];

        let found = HumanName::names_by_use(&names, NameUse::Official);
        assert_eq!(found, vec![&official]);
        assert!(HumanName::names_by_use(&names, NameUse::Maiden).is_empty());
    }

    #[test]
    fn accepts_loosely_typed_parts() {
        let json = r#"{"use":"official","given":"John","prefix":"Mr.","family":["van","Dyke"]}"#;
        let n: HumanName = serde_json::from_str(json).expect("parse name");
        assert_eq!(n.given, vec!["John"]);
        assert_eq!(n.prefix, vec!["Mr."]);
        assert_eq!(n.family.as_deref(), Some("van Dyke"));
        assert_eq!(n.to_string(), "Mr. John van Dyke");

        let rendered = serde_json::to_string(&n).expect("render name");
        assert_eq!(
            rendered,
            r#"{"use":"official","family":"van Dyke","given":["John"],"prefix":["Mr."]}"#
        );
    }
}
