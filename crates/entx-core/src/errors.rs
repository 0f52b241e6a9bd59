use thiserror::Error;

/// Result type alias using EntityError
pub type Result<T> = std::result::Result<T, EntityError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable `ERR_*` code for programmatic handling and, for
/// the validation kinds that reach API clients, to the problem code the HTTP
/// collaborator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    RequiredParameterMissing,
    UnexpectedParameters,
    InvalidDataType,
    EntityDataInvalid,
    PropertyNotFound,

    // History preconditions
    VersionSequenceBroken,
    InvalidBaseVersion,
    MissingCreationAudit,

    // Persistence collaborator
    NotFound,
    AlreadyExists,
    BaseVersionNotFound,

    // Ambient
    InvalidConfig,
    Io,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::RequiredParameterMissing => "ERR_REQUIRED_PARAMETER_MISSING",
            ExErrorKind::UnexpectedParameters => "ERR_UNEXPECTED_PARAMETERS",
            ExErrorKind::InvalidDataType => "ERR_INVALID_DATA_TYPE",
            ExErrorKind::EntityDataInvalid => "ERR_ENTITY_DATA_INVALID",
            ExErrorKind::PropertyNotFound => "ERR_PROPERTY_NOT_FOUND",
            ExErrorKind::VersionSequenceBroken => "ERR_VERSION_SEQUENCE_BROKEN",
            ExErrorKind::InvalidBaseVersion => "ERR_INVALID_BASE_VERSION",
            ExErrorKind::MissingCreationAudit => "ERR_MISSING_CREATION_AUDIT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::BaseVersionNotFound => "ERR_BASE_VERSION_NOT_FOUND",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Problem code reported to API clients, for kinds that have one
    pub fn problem_code(&self) -> Option<&'static str> {
        match self {
            ExErrorKind::RequiredParameterMissing => Some("400.2"),
            ExErrorKind::InvalidDataType => Some("400.11"),
            ExErrorKind::EntityDataInvalid => Some("400.28"),
            ExErrorKind::UnexpectedParameters => Some("400.31"),
            _ => None,
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context the failing operation
/// knew about (operation, entity, property, version).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_uuid: Option<String>,
    property: Option<String>,
    version: Option<u32>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_uuid: None,
            property: None,
            version: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity uuid context
    pub fn with_entity_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.entity_uuid = Some(uuid.into());
        self
    }

    /// Add the offending field or property name
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add version context
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn problem_code(&self) -> Option<&'static str> {
        self.kind.problem_code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_uuid(&self) -> Option<&str> {
        self.entity_uuid.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(uuid) = &self.entity_uuid {
            write!(f, " (entity_uuid: {})", uuid)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for entity operations
///
/// Validation variants reproduce the wording API clients have always seen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    // ===== Validation Errors =====
    /// A mandatory field is absent or blank
    #[error("Required parameter {field} missing.")]
    RequiredParameterMissing { field: String },

    /// The request body carries top-level keys outside the accepted set
    #[error("Expected parameters: ({}). Got ({}).", .expected.join(", "), .received.join(", "))]
    UnexpectedParameters {
        expected: Vec<String>,
        received: Vec<String>,
    },

    /// Wrong primitive type, or a malformed uuid / integer
    #[error("Invalid input data type: expected ({field}) to be ({expected})")]
    InvalidDataType { field: String, expected: String },

    /// Structurally invalid payload
    #[error("The entity is invalid. {reason}")]
    EntityDataInvalid { reason: String },

    /// `$select` names something that is not selectable
    #[error("Could not find a property named '{property}'")]
    PropertyNotFound { property: String },

    /// A dataset property renders onto one of the read view's system keys
    #[error("The dataset property [{property}] collides with a reserved key.")]
    ReservedPropertyName { property: String },

    // ===== History Preconditions =====
    /// Def history is not the contiguous sequence 1..=n
    #[error("Version history broken at position {position}: expected {expected}, found {found}")]
    VersionSequenceBroken {
        position: usize,
        expected: u32,
        found: u32,
    },

    /// A def's base version is missing where required, present on version 1,
    /// or not older than the def
    #[error("Version {version} has invalid base version {base_version:?}")]
    InvalidBaseVersion {
        version: u32,
        base_version: Option<u32>,
    },

    /// The first def has no matching creation audit entry
    #[error("No creation audit found for entity def {def_id}")]
    MissingCreationAudit { def_id: i64 },

    // ===== Persistence Errors =====
    #[error("Dataset not found: {dataset}")]
    DatasetNotFound { dataset: String },

    #[error("Entity not found: {uuid}")]
    EntityNotFound { uuid: String },

    #[error("Entity already exists: {uuid}")]
    EntityAlreadyExists { uuid: String },

    /// An update names a base version the entity does not have
    #[error("Base version {base_version} does not exist for entity {uuid}")]
    BaseVersionNotFound { uuid: String, base_version: u32 },

    // ===== Generic Errors =====
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EntityError {
    pub(crate) fn required(field: impl Into<String>) -> Self {
        EntityError::RequiredParameterMissing {
            field: field.into(),
        }
    }

    pub(crate) fn data_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        EntityError::InvalidDataType {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EntityError::EntityDataInvalid {
            reason: reason.into(),
        }
    }

    /// The facility kind this error maps to
    pub fn kind(&self) -> ExErrorKind {
        match self {
            EntityError::RequiredParameterMissing { .. } => ExErrorKind::RequiredParameterMissing,
            EntityError::UnexpectedParameters { .. } => ExErrorKind::UnexpectedParameters,
            EntityError::InvalidDataType { .. } => ExErrorKind::InvalidDataType,
            EntityError::EntityDataInvalid { .. } => ExErrorKind::EntityDataInvalid,
            EntityError::PropertyNotFound { .. } => ExErrorKind::PropertyNotFound,
            EntityError::ReservedPropertyName { .. } => ExErrorKind::EntityDataInvalid,
            EntityError::VersionSequenceBroken { .. } => ExErrorKind::VersionSequenceBroken,
            EntityError::InvalidBaseVersion { .. } => ExErrorKind::InvalidBaseVersion,
            EntityError::MissingCreationAudit { .. } => ExErrorKind::MissingCreationAudit,
            EntityError::DatasetNotFound { .. } | EntityError::EntityNotFound { .. } => {
                ExErrorKind::NotFound
            }
            EntityError::EntityAlreadyExists { .. } => ExErrorKind::AlreadyExists,
            EntityError::BaseVersionNotFound { .. } => ExErrorKind::BaseVersionNotFound,
            EntityError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            EntityError::Io { .. } => ExErrorKind::Io,
            EntityError::Internal { .. } => ExErrorKind::Internal,
        }
    }
}

/// Conversion from EntityError to ExError
///
/// The rendered message is kept verbatim; identifying fields are lifted into
/// the structured context.
impl From<EntityError> for ExError {
    fn from(err: EntityError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            EntityError::RequiredParameterMissing { field }
            | EntityError::InvalidDataType { field, .. } => base.with_property(field),
            EntityError::PropertyNotFound { property }
            | EntityError::ReservedPropertyName { property } => base.with_property(property),
            EntityError::VersionSequenceBroken { found, .. } => base.with_version(found),
            EntityError::InvalidBaseVersion { version, .. } => base.with_version(version),
            EntityError::EntityNotFound { uuid } | EntityError::EntityAlreadyExists { uuid } => {
                base.with_entity_uuid(uuid)
            }
            EntityError::BaseVersionNotFound { uuid, base_version } => {
                base.with_entity_uuid(uuid).with_version(base_version)
            }
            _ => base,
        }
    }
}

impl From<toml::de::Error> for EntityError {
    fn from(err: toml::de::Error) -> Self {
        EntityError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_parameters_message() {
        let err = EntityError::UnexpectedParameters {
            expected: vec!["label".into(), "uuid".into(), "data".into()],
            received: vec!["uuid".into(), "label".into(), "data".into(), "extra".into()],
        };
        assert_eq!(
            err.to_string(),
            "Expected parameters: (label, uuid, data). Got (uuid, label, data, extra)."
        );
    }

    #[test]
    fn test_problem_codes_for_validation_kinds() {
        assert_eq!(
            ExErrorKind::RequiredParameterMissing.problem_code(),
            Some("400.2")
        );
        assert_eq!(ExErrorKind::InvalidDataType.problem_code(), Some("400.11"));
        assert_eq!(ExErrorKind::EntityDataInvalid.problem_code(), Some("400.28"));
        assert_eq!(
            ExErrorKind::UnexpectedParameters.problem_code(),
            Some("400.31")
        );
        assert_eq!(ExErrorKind::VersionSequenceBroken.problem_code(), None);
    }

    #[test]
    fn test_conversion_lifts_context() {
        let ex: ExError = EntityError::BaseVersionNotFound {
            uuid: "u1".into(),
            base_version: 7,
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::BaseVersionNotFound);
        assert_eq!(ex.entity_uuid(), Some("u1"));
        assert_eq!(ex.version(), Some(7));
        assert!(ex.message().contains("Base version 7"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let ex = ExError::new(ExErrorKind::PropertyNotFound)
            .with_op("resolve_selection")
            .with_message("Could not find a property named 'x'");
        let rendered = ex.to_string();
        assert!(
            rendered.starts_with("[ERR_PROPERTY_NOT_FOUND] in operation 'resolve_selection'")
        );
        assert!(rendered.ends_with("'x'"));
    }

    #[test]
    fn test_reserved_property_is_entity_data_invalid() {
        let ex: ExError = EntityError::ReservedPropertyName {
            property: "__id".into(),
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::EntityDataInvalid);
        assert_eq!(ex.problem_code(), Some("400.28"));
        assert_eq!(ex.property(), Some("__id"));
    }
}
