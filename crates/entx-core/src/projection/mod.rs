//! Client-facing read view of an entity
//!
//! [`resolve_selection`] turns a `$select` query into a [`Selection`];
//! [`project`] renders the entity and prunes it to that selection.

pub mod project;
pub mod selection;

pub use project::{check_property_name, project, sanitize};
pub use selection::{resolve_selection, Selection, RESERVED_KEYS, SYSTEM_FIELDS};
