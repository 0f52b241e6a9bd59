use crate::errors::{EntityError, Result};
use crate::extract::SubmissionEntity;
use crate::model::{Dataset, PropertyMap, Tri};
use crate::projection::check_property_name;

/// Optional namespace prefix on submitted uuids, matched case-insensitively
const UUID_PREFIX: &str = "uuid:";

/// A submission mutation ready to become a version
///
/// The transient `create` flag has been consumed and the uuid is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntity {
    pub uuid: String,
    pub label: String,
    /// Carried through unchecked; `None` when absent or blank
    pub dataset: Option<String>,
    pub update: bool,
    /// Present exactly when `update` is set
    pub base_version: Option<u32>,
    pub data: PropertyMap,
}

/// Normalize a submission mutation
///
/// # Errors
///
/// Checked in this order:
/// - `RequiredParameterMissing("label")` for an absent or blank label
/// - `RequiredParameterMissing("uuid")` for an absent or blank id
/// - `InvalidDataType("uuid", "valid UUID")` for a malformed id
/// - `RequiredParameterMissing("baseVersion")` / `InvalidDataType("baseVersion", "integer")`
///   when `update` is set
pub fn validate_entity(entity: SubmissionEntity) -> Result<ValidatedEntity> {
    let system = entity.system;

    let label = system
        .label
        .non_blank()
        .ok_or_else(|| EntityError::required("label"))?
        .to_string();

    let raw_id = system
        .id
        .non_blank()
        .ok_or_else(|| EntityError::required("uuid"))?;
    let uuid = canonical_uuid(raw_id)?;

    let dataset = system.dataset.non_blank().map(str::to_string);

    let update = is_truthy(&system.update);
    let base_version = if update {
        Some(parse_base_version(&system.base_version)?)
    } else {
        None
    };

    Ok(ValidatedEntity {
        uuid,
        label,
        dataset,
        update,
        base_version,
        data: entity.data,
    })
}

/// Check that every property of `dataset` can be stored and rendered
///
/// # Errors
///
/// `ReservedPropertyName` for the first property whose output key is a
/// system key of the read view.
pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    dataset
        .properties
        .iter()
        .try_for_each(|p| check_property_name(&p.name))
}

/// Canonical form of a submitted uuid: lower-case, hyphenated, unprefixed
///
/// # Errors
///
/// `InvalidDataType("uuid", "valid UUID")` unless the input, after an optional
/// `uuid:` prefix, is a 36-character hyphenated uuid.
pub fn canonical_uuid(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let bare = match trimmed.get(..UUID_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(UUID_PREFIX) => &trimmed[UUID_PREFIX.len()..],
        _ => trimmed,
    };

    if bare.len() != 36 {
        return Err(EntityError::data_type("uuid", "valid UUID"));
    }
    uuid::Uuid::try_parse(bare)
        .map(|u| u.hyphenated().to_string())
        .map_err(|_| EntityError::data_type("uuid", "valid UUID"))
}

fn is_truthy(flag: &Tri<String>) -> bool {
    matches!(flag.as_present().map(|s| s.trim()), Some("1") | Some("true"))
}

fn parse_base_version(raw: &Tri<String>) -> Result<u32> {
    let text = raw
        .non_blank()
        .ok_or_else(|| EntityError::required("baseVersion"))?
        .trim();
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntityError::data_type("baseVersion", "integer"));
    }
    text.parse::<u32>()
        .map_err(|_| EntityError::data_type("baseVersion", "integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::extract::SubmissionSystem;

    const UUID: &str = "12345678-1234-4123-8234-123456789abc";

    fn present(s: &str) -> Tri<String> {
        Tri::Present(s.to_string())
    }

    fn submission() -> SubmissionEntity {
        SubmissionEntity {
            system: SubmissionSystem {
                create: present("1"),
                id: present(UUID),
                label: present("foo"),
                dataset: present("people"),
                ..Default::default()
            },
            data: PropertyMap::new(),
        }
    }

    #[test]
    fn test_missing_label() {
        let mut entity = submission();
        entity.system.label = Tri::Absent;
        let err = validate_entity(entity).unwrap_err();
        assert_eq!(err.to_string(), "Required parameter label missing.");
        assert_eq!(err.kind(), ExErrorKind::RequiredParameterMissing);
        assert_eq!(err.kind().problem_code(), Some("400.2"));
    }

    #[test]
    fn test_blank_id() {
        let mut entity = submission();
        entity.system.id = present("  ");
        assert_eq!(
            validate_entity(entity).unwrap_err().to_string(),
            "Required parameter uuid missing."
        );
    }

    #[test]
    fn test_malformed_id() {
        let mut entity = submission();
        entity.system.id = present("uuid:12123123");
        assert_eq!(
            validate_entity(entity).unwrap_err().to_string(),
            "Invalid input data type: expected (uuid) to be (valid UUID)"
        );
    }

    #[test]
    fn test_prefix_stripped_and_create_dropped() {
        let mut entity = submission();
        entity.system.id = present("uuid:12345678-1234-4123-8234-123456789ABC");
        let validated = validate_entity(entity).unwrap();
        assert_eq!(validated.uuid, UUID);
        assert!(!validated.update);
        assert_eq!(validated.base_version, None);
    }

    #[test]
    fn test_update_needs_base_version() {
        let mut entity = submission();
        entity.system.update = present("1");
        assert_eq!(
            validate_entity(entity.clone()).unwrap_err().to_string(),
            "Required parameter baseVersion missing."
        );

        entity.system.base_version = present("a");
        assert_eq!(
            validate_entity(entity.clone()).unwrap_err().to_string(),
            "Invalid input data type: expected (baseVersion) to be (integer)"
        );

        entity.system.base_version = present("-1");
        assert!(validate_entity(entity.clone()).is_err());

        entity.system.base_version = present("2");
        let validated = validate_entity(entity).unwrap();
        assert!(validated.update);
        assert_eq!(validated.base_version, Some(2));
    }

    #[test]
    fn test_base_version_ignored_without_update() {
        let mut entity = submission();
        entity.system.base_version = present("a");
        entity.system.update = present("0");
        assert_eq!(validate_entity(entity).unwrap().base_version, None);
    }

    #[test]
    fn test_dataset_is_optional() {
        let mut entity = submission();
        entity.system.dataset = present("  ");
        assert_eq!(validate_entity(entity).unwrap().dataset, None);
        assert_eq!(
            validate_entity(submission()).unwrap().dataset.as_deref(),
            Some("people")
        );
    }

    #[test]
    fn test_validate_dataset_rejects_reserved_names() {
        assert!(validate_dataset(&Dataset::new("people", ["first_name", "age"])).is_ok());
        for reserved in ["__id", "label", "__system"] {
            assert_eq!(
                validate_dataset(&Dataset::new("people", ["age", reserved])),
                Err(EntityError::ReservedPropertyName {
                    property: reserved.to_string()
                })
            );
        }
    }

    #[test]
    fn test_canonical_uuid_forms() {
        assert_eq!(canonical_uuid(UUID).unwrap(), UUID);
        assert_eq!(canonical_uuid(&format!("UUID:{}", UUID)).unwrap(), UUID);
        assert!(canonical_uuid("12345678123441238234123456789abc").is_err());
        assert!(canonical_uuid("uuid:").is_err());
        assert!(canonical_uuid("ü").is_err());
    }
}
