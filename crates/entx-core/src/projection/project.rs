use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::selection::{Selection, ID_KEY, LABEL_KEY, RESERVED_KEYS, SYSTEM_FIELDS, SYSTEM_KEY};
use crate::errors::{EntityError, Result};
use crate::model::Entity;

/// Render the read view of `entity`, pruned to `selection`
///
/// Keys come out as `__id`, `label`, `__system`, then one key per dataset
/// property in `properties` order. Property keys are [`sanitize`]d; a property
/// the current version has no value for renders as `""`.
///
/// # Errors
///
/// `ReservedPropertyName` if a property renders onto `__id`, `label` or
/// `__system`, and whatever deriving the conflict status from the history
/// returns (`VersionSequenceBroken`, `InvalidBaseVersion`).
pub fn project(entity: &Entity, properties: &[&str], selection: &Selection) -> Result<Value> {
    for property in properties {
        check_property_name(property)?;
    }
    let current = entity.current()?;
    let mut out = Map::new();

    if selection.includes(ID_KEY) {
        out.insert(ID_KEY.to_string(), Value::from(entity.uuid.as_str()));
    }
    if selection.includes(LABEL_KEY) {
        out.insert(LABEL_KEY.to_string(), Value::from(current.label.as_str()));
    }

    if selection.includes_system() {
        let conflict = entity.conflict()?;
        let mut system = Map::new();
        for field in SYSTEM_FIELDS {
            if !selection.includes_system_field(field) {
                continue;
            }
            let value = match field {
                "createdAt" => timestamp(&entity.created_at),
                "creatorId" => Value::from(entity.creator.id.as_str()),
                "creatorName" => Value::from(entity.creator.display_name.as_str()),
                "updatedAt" => entity.updated_at.as_ref().map_or(Value::Null, timestamp),
                "updates" => Value::from(entity.updates()),
                "version" => Value::from(current.version),
                "conflict" => conflict.as_label().map_or(Value::Null, Value::from),
                _ => continue,
            };
            system.insert(field.to_string(), value);
        }
        out.insert(SYSTEM_KEY.to_string(), Value::Object(system));
    }

    for property in properties {
        if !selection.includes(property) {
            continue;
        }
        let value = current.data.get(property).unwrap_or("");
        out.insert(sanitize(property), Value::from(value));
    }

    Ok(Value::Object(out))
}

/// Reject a property name whose output key is one of the system keys
///
/// # Errors
///
/// `ReservedPropertyName` when `sanitize(name)` is `__id`, `label` or `__system`.
pub fn check_property_name(name: &str) -> Result<()> {
    let key = sanitize(name);
    if RESERVED_KEYS.contains(&key.as_str()) {
        return Err(EntityError::ReservedPropertyName {
            property: name.to_string(),
        });
    }
    Ok(())
}

/// Output key for a property name
///
/// Every run of characters outside `[A-Za-z0-9_]` becomes one `_`, and a
/// name that does not start with a letter or `_` gets a leading `_`.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    let first = out.chars().next();
    if matches!(first, Some(c) if !(c.is_ascii_alphabetic() || c == '_')) {
        out.insert(0, '_');
    }
    out
}

fn timestamp(at: &DateTime<Utc>) -> Value {
    Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
