use std::collections::BTreeMap;

use crate::errors::{EntityError, Result};
use crate::model::{PropertyMap, Tri};
use crate::projection::check_property_name;

/// Path suffix of the reserved entity-mutation block
pub const ENTITY_BLOCK: &str = "/meta/entity";

/// One field of the form definition, as supplied by the forms collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Absolute instance path, e.g. `/person/first_name`
    pub path: String,
    pub name: String,
    /// Dataset property this field saves to, if any
    pub property_name: Option<String>,
}

impl FormField {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            property_name: None,
        }
    }

    pub fn saves_to(mut self, property_name: impl Into<String>) -> Self {
        self.property_name = Some(property_name.into());
        self
    }
}

/// Tokenized submission instance: element text and attributes keyed by path
#[derive(Debug, Clone, Default)]
pub struct SubmissionRecord {
    pub values: PropertyMap,
    pub attributes: BTreeMap<String, PropertyMap>,
}

impl SubmissionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.values.insert(path, text);
        self
    }

    pub fn with_attribute(
        mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes
            .entry(path.into())
            .or_default()
            .insert(name, value);
        self
    }
}

/// System attributes of the entity block, exactly as submitted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionSystem {
    pub create: Tri<String>,
    pub update: Tri<String>,
    /// Verbatim, possibly `uuid:`-prefixed
    pub id: Tri<String>,
    pub label: Tri<String>,
    pub dataset: Tri<String>,
    pub base_version: Tri<String>,
}

/// Entity mutation parsed from a submission, not yet validated
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionEntity {
    pub system: SubmissionSystem,
    pub data: PropertyMap,
}

/// Pull the entity mutation out of a submission
///
/// The entity block is the first field whose path ends in `/meta/entity`;
/// its attributes give the system fields and its `label` child the label.
/// Every field bound to a dataset property contributes its value, in field
/// order, when the instance has one.
///
/// # Errors
///
/// `EntityDataInvalid` if no field declares the entity block,
/// `ReservedPropertyName` if a bound property would shadow a system key.
pub fn extract_from_instance(
    fields: &[FormField],
    record: &SubmissionRecord,
) -> Result<SubmissionEntity> {
    let block = fields
        .iter()
        .find(|f| f.path.ends_with(ENTITY_BLOCK))
        .ok_or_else(|| EntityError::invalid("The submission does not declare an entity block."))?;

    let attrs = record.attributes.get(&block.path);
    let attr = |name: &str| Tri::from_text(attrs.and_then(|a| a.get(name)));
    let label_path = format!("{}/label", block.path);

    let system = SubmissionSystem {
        create: attr("create"),
        update: attr("update"),
        id: attr("id"),
        label: Tri::from_text(record.values.get(&label_path)),
        dataset: attr("dataset"),
        base_version: attr("baseVersion"),
    };

    let mut data = PropertyMap::new();
    for field in fields {
        let Some(property) = field.property_name.as_deref() else {
            continue;
        };
        if let Some(value) = record.values.get(&field.path) {
            check_property_name(property)?;
            data.insert(property, value);
        }
    }

    Ok(SubmissionEntity { system, data })
}
