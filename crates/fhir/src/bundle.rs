//! Reading resource collections as returned by FHIR searches.
//!
//! A search result arrives either as a `Bundle` (`{"resourceType":"Bundle","entry":[{"resource":...}]}`)
//! or, from clients that flatten results, as a bare JSON array of resources. Both are reduced
//! to the list of resource objects in order.

use crate::{from_value_with_path, FhirError, FhirResult};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct BundleWire {
    #[serde(default)]
    entry: Vec<BundleEntryWire>,
}

#[derive(Debug, Deserialize)]
struct BundleEntryWire {
    #[serde(default)]
    resource: Option<Value>,
}

/// Extract the resources from a search result.
///
/// Bundle entries without a `resource` are skipped.
///
/// # Errors
///
/// Returns [`FhirError::InvalidJson`] for malformed JSON, [`FhirError::Translation`] if a
/// bundle does not match the expected shape, and [`FhirError::InvalidInput`] for any other
/// top-level value.
pub fn resources_from_json(json_text: &str) -> FhirResult<Vec<Value>> {
    let value: Value = serde_json::from_str(json_text)?;
    resources_from_value(value)
}

/// As [`resources_from_json`], from an already-decoded JSON value.
pub fn resources_from_value(value: Value) -> FhirResult<Vec<Value>> {
    if resource_type_of(&value) == Some("Bundle") {
        let bundle: BundleWire = from_value_with_path(value, "Bundle")?;
        return Ok(bundle
            .entry
            .into_iter()
            .filter_map(|entry| entry.resource)
            .collect());
    }

    match value {
        Value::Array(resources) => Ok(resources),
        Value::Object(map) => Err(FhirError::InvalidInput(format!(
            "Expected a Bundle or an array of resources, got resourceType '{}'",
            map.get("resourceType")
                .and_then(Value::as_str)
                .unwrap_or("<none>")
        ))),
        other => Err(FhirError::InvalidInput(format!(
            "Expected a Bundle or an array of resources, got {}",
            json_kind(&other)
        ))),
    }
}

/// The `resourceType` of a resource object, if it has one.
pub fn resource_type_of(resource: &Value) -> Option<&str> {
    resource.get("resourceType").and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
