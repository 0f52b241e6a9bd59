pub mod validation;

pub use validation::{canonical_uuid, validate_dataset, validate_entity, ValidatedEntity};
