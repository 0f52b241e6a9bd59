use serde_json::{Map, Value};

use crate::errors::{EntityError, Result};
use crate::model::{Entity, PropertyMap, Tri, LABEL_KEY};
use crate::projection::check_property_name;

/// Keys a request body may carry, in the order they are reported
const EXPECTED_KEYS: [&str; 3] = ["label", "uuid", "data"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSystem {
    /// `None` on create when only data was supplied
    pub label: Option<String>,
    /// As supplied on create; the existing entity's uuid on update
    pub uuid: String,
}

/// Entity mutation parsed from a create/update request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEntity {
    pub system: RequestSystem,
    /// Full resolved data; merged onto the current version on update
    pub data: PropertyMap,
    /// What the body explicitly supplied, label included
    pub data_received: PropertyMap,
}

/// Parse and check a JSON request body
///
/// With `existing` set the body is an update: `uuid` is not required, the
/// label defaults to the current one, and supplied data is merged onto the
/// current version (existing key order first, new keys appended).
///
/// # Errors
///
/// Checked in this order, first failure wins:
/// - `UnexpectedParameters` for any key besides `label`, `uuid`, `data`
/// - `RequiredParameterMissing` / `InvalidDataType` for `uuid` (create only)
/// - `RequiredParameterMissing` for an empty label, `InvalidDataType` for a non-string one
/// - `InvalidDataType` if `data` is not an object
/// - `EntityDataInvalid` for an unknown property, `ReservedPropertyName` for one
///   that would shadow a system key, `InvalidDataType` for a non-string value
/// - `EntityDataInvalid` if neither label nor data was supplied
pub fn extract_from_request(
    body: &Value,
    property_names: &[&str],
    existing: Option<&Entity>,
) -> Result<RequestEntity> {
    let body = body
        .as_object()
        .ok_or_else(|| EntityError::data_type("body", "object"))?;

    check_keys(body)?;

    let uuid = match existing {
        Some(entity) => entity.uuid.clone(),
        None => uuid_field(body.get("uuid"))?,
    };

    let label = match label_field(body.get("label"))? {
        Tri::Present(label) => Some(label),
        Tri::Empty => return Err(EntityError::required("label")),
        Tri::Absent => None,
    };

    let received = data_field(body.get("data"), property_names)?;

    if label.is_none() && received.is_empty() {
        return Err(EntityError::invalid("No entity data or label provided."));
    }

    let mut data_received = PropertyMap::new();
    if let Some(label) = &label {
        data_received.insert(LABEL_KEY, label.as_str());
    }
    for (k, v) in received.iter() {
        data_received.insert(k, v);
    }

    let (label, data) = match existing {
        Some(entity) => {
            let current = entity.current()?;
            let label = label.unwrap_or_else(|| current.label.clone());
            (Some(label), current.data.merged_with(&received))
        }
        None => (label, received),
    };

    Ok(RequestEntity {
        system: RequestSystem { label, uuid },
        data,
        data_received,
    })
}

fn check_keys(body: &Map<String, Value>) -> Result<()> {
    if body.keys().all(|k| EXPECTED_KEYS.contains(&k.as_str())) {
        return Ok(());
    }
    Err(EntityError::UnexpectedParameters {
        expected: EXPECTED_KEYS.iter().map(|k| k.to_string()).collect(),
        received: body.keys().cloned().collect(),
    })
}

fn uuid_field(value: Option<&Value>) -> Result<String> {
    match value {
        None => Err(EntityError::required("uuid")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(EntityError::required("uuid")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(EntityError::data_type("uuid", "string")),
    }
}

// null is treated like an omitted label; "" is an explicit, invalid one
fn label_field(value: Option<&Value>) -> Result<Tri<String>> {
    match value {
        None | Some(Value::Null) => Ok(Tri::Absent),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Tri::Empty),
        Some(Value::String(s)) => Ok(Tri::Present(s.clone())),
        Some(_) => Err(EntityError::data_type("label", "string")),
    }
}

fn data_field(value: Option<&Value>, property_names: &[&str]) -> Result<PropertyMap> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(PropertyMap::new()),
        Some(Value::Object(entries)) => entries,
        Some(_) => return Err(EntityError::data_type("data", "object")),
    };

    let mut data = PropertyMap::new();
    for (key, value) in entries {
        if !property_names.contains(&key.as_str()) {
            return Err(EntityError::invalid(format!(
                "You specified the dataset property [{}] which does not exist.",
                key
            )));
        }
        check_property_name(key)?;
        match value {
            Value::String(s) => {
                data.insert(key.as_str(), s.as_str());
            }
            _ => return Err(EntityError::data_type(key.as_str(), "string")),
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, Def};
    use serde_json::json;

    const PROPS: [&str; 2] = ["first_name", "age"];

    fn existing() -> Entity {
        Entity {
            uuid: "12345678-1234-4123-8234-123456789abc".to_string(),
            dataset: "people".to_string(),
            creator: Actor::new("5", "Alice"),
            created_at: chrono::Utc::now(),
            updated_at: None,
            defs: vec![Def {
                id: 1,
                version: 1,
                label: "Johnny Doe".to_string(),
                data: [("first_name", "Johnny"), ("age", "22")].into_iter().collect(),
                data_received: [("first_name", "Johnny"), ("age", "22")].into_iter().collect(),
                base_version: None,
                conflicting_properties: None,
            }],
        }
    }

    fn message(body: Value, existing: Option<&Entity>) -> String {
        extract_from_request(&body, &PROPS, existing)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_create_happy_path() {
        let body = json!({
            "uuid": "12345678-1234-4123-8234-123456789abc",
            "label": "Alice",
            "data": { "first_name": "Alice", "age": "88" }
        });
        let entity = extract_from_request(&body, &PROPS, None).unwrap();
        assert_eq!(entity.system.label.as_deref(), Some("Alice"));
        assert_eq!(entity.system.uuid, "12345678-1234-4123-8234-123456789abc");
        assert_eq!(entity.data.get("age"), Some("88"));
        assert_eq!(
            entity.data_received.keys().collect::<Vec<_>>(),
            vec!["label", "first_name", "age"]
        );
    }

    #[test]
    fn test_unexpected_keys_listed_in_body_order() {
        let body = json!({ "uuid": "x", "label": "Alice", "data": {}, "extra": "nope" });
        assert_eq!(
            message(body, None),
            "Expected parameters: (label, uuid, data). Got (uuid, label, data, extra)."
        );
    }

    #[test]
    fn test_uuid_checks_on_create() {
        assert_eq!(
            message(json!({ "label": "Alice" }), None),
            "Required parameter uuid missing."
        );
        assert_eq!(
            message(json!({ "uuid": 123, "label": "Alice", "data": { "age": 99 } }), None),
            "Invalid input data type: expected (uuid) to be (string)"
        );
    }

    #[test]
    fn test_label_checks() {
        assert_eq!(
            message(json!({ "uuid": "x", "label": "" }), None),
            "Required parameter label missing."
        );
        assert_eq!(
            message(json!({ "uuid": "x", "label": false }), None),
            "Invalid input data type: expected (label) to be (string)"
        );
    }

    #[test]
    fn test_null_label_is_not_provided() {
        let body = json!({ "uuid": "x", "label": null, "data": { "age": "1" } });
        let entity = extract_from_request(&body, &PROPS, None).unwrap();
        assert_eq!(entity.system.label, None);
        assert!(!entity.data_received.contains_key("label"));
    }

    #[test]
    fn test_data_checks() {
        assert_eq!(
            message(json!({ "uuid": "x", "label": "A", "data": "nope" }), None),
            "Invalid input data type: expected (data) to be (object)"
        );
        assert_eq!(
            message(json!({ "uuid": "x", "label": "A", "data": { "city": "Chicago" } }), None),
            "The entity is invalid. You specified the dataset property [city] which does not exist."
        );
        assert_eq!(
            message(json!({ "uuid": "x", "label": "A", "data": { "age": 88 } }), None),
            "Invalid input data type: expected (age) to be (string)"
        );
        assert_eq!(
            message(json!({ "uuid": "x", "label": "A", "data": { "age": null } }), None),
            "Invalid input data type: expected (age) to be (string)"
        );
    }

    #[test]
    fn test_update_requires_something() {
        let entity = existing();
        assert_eq!(
            message(json!({}), Some(&entity)),
            "The entity is invalid. No entity data or label provided."
        );
        assert_eq!(
            message(json!({ "label": "" }), Some(&entity)),
            "Required parameter label missing."
        );
    }

    #[test]
    fn test_update_merges_onto_current() {
        let entity = existing();
        let body = json!({ "data": { "age": "23" } });
        let update = extract_from_request(&body, &PROPS, Some(&entity)).unwrap();
        assert_eq!(update.system.label.as_deref(), Some("Johnny Doe"));
        assert_eq!(update.system.uuid, entity.uuid);
        let pairs: Vec<(&str, &str)> = update.data.iter().collect();
        assert_eq!(pairs, vec![("first_name", "Johnny"), ("age", "23")]);
        assert_eq!(update.data_received.keys().collect::<Vec<_>>(), vec!["age"]);
    }

    #[test]
    fn test_update_label_only() {
        let entity = existing();
        let update =
            extract_from_request(&json!({ "label": "John" }), &PROPS, Some(&entity)).unwrap();
        assert_eq!(update.system.label.as_deref(), Some("John"));
        assert_eq!(update.data, entity.defs[0].data);
        assert_eq!(update.data_received.keys().collect::<Vec<_>>(), vec!["label"]);
    }

    #[test]
    fn test_reserved_property_cannot_shadow_label() {
        let body = json!({
            "uuid": "12345678-1234-4123-8234-123456789abc",
            "label": "System Label",
            "data": { "label": "prop value", "age": "88" }
        });
        assert_eq!(
            extract_from_request(&body, &["label", "age"], None),
            Err(EntityError::ReservedPropertyName {
                property: "label".to_string()
            })
        );
        assert!(matches!(
            extract_from_request(&json!({ "data": { "__id": "x" } }), &["__id"], Some(&existing())),
            Err(EntityError::ReservedPropertyName { .. })
        ));
    }
}
