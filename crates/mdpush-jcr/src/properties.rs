//! Property batch preparation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::UpsertError;
use crate::types::Property;

/// Turn a name-to-value map into the property batch for `language`.
///
/// Properties are emitted in name order.
///
/// # Errors
///
/// Returns [`UpsertError::PropertyType`] for the first value that is not a
/// string.
pub fn prepare_properties(
    properties: &BTreeMap<String, Value>,
    language: &str,
) -> Result<Vec<Property>, UpsertError> {
    properties
        .iter()
        .map(|(name, value)| match value {
            Value::String(value) => Ok(Property::string(name, value, language)),
            _ => Err(UpsertError::PropertyType { name: name.clone() }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_properties() {
        let props = prepare_properties(
            &map(json!({"text": "<p>x</p>", "jcr:title": "Home"})),
            "de",
        )
        .unwrap();
        assert_eq!(
            props,
            vec![
                Property::string("jcr:title", "Home", "de"),
                Property::string("text", "<p>x</p>", "de"),
            ]
        );
    }

    #[test]
    fn test_empty_properties() {
        assert!(prepare_properties(&BTreeMap::new(), "en").unwrap().is_empty());
    }

    #[test]
    fn test_non_string_property_is_rejected() {
        for value in [json!(3), json!(true), json!(null), json!(["a"]), json!({"a": "b"})] {
            let err = prepare_properties(&map(json!({"count": value})), "en").unwrap_err();
            match err {
                UpsertError::PropertyType { name } => assert_eq!(name, "count"),
                other => panic!("expected PropertyType, got {other:?}"),
            }
        }
    }
}
