//! Canonical schema constants for structured logging
//!
//! Every log line and error report in entx uses these keys.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_ENTITY_UUID: &str = "entity_uuid";
pub const FIELD_DATASET: &str = "dataset";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_BASE_VERSION: &str = "base_version";

// Collection sizes
pub const FIELD_DEF_COUNT: &str = "def_count";
pub const FIELD_CONFLICT_COUNT: &str = "conflict_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
