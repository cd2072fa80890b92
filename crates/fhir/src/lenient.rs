//! Lenient deserializers for loosely-typed name and address parts.
//!
//! Data from some servers carries `given`, `prefix`, `suffix` or `line` as a bare string
//! instead of an array, and occasionally `family` as an array. These helpers normalise the
//! shape once at the boundary so the formatters only ever see `Vec<String>` / `String`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept `"a"`, `["a", "b"]` or `null` and produce an ordered list.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// Accept `"a"` or `["a", "b"]` and produce a single string, joining arrays with a space.
pub(crate) fn string_or_joined<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(OneOrMany::One(s)) => Some(s),
        Some(OneOrMany::Many(v)) if v.is_empty() => None,
        Some(OneOrMany::Many(v)) => Some(v.join(" ")),
    })
}
