//! entx core - entity version and conflict-detection engine
//!
//! Offline clients submit create/update mutations for dataset-bound entities.
//! Each accepted edit becomes an immutable, numbered version ([`Def`]) of the
//! entity, and reads classify every version against the history it was
//! authored from:
//!
//! - [`extract`] builds a normalized mutation from a form submission or an API body
//! - [`rules::validation`] checks a submission mutation before it becomes a version
//! - [`diff`] compares property mappings
//! - [`conflict`] labels versions NONE / SOFT / HARD
//! - [`projection`] renders the client-facing read view with `$select` support
//! - [`ops`] holds the in-memory persistence collaborator and the pipelines that
//!   tie the pieces together
//!
//! Everything except [`ops::MemoryStore`] is a pure function over borrowed input.

pub mod config;
pub mod conflict;
pub mod diff;
pub mod errors;
pub mod extract;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod projection;
pub mod rules;

#[doc(hidden)]
pub use entx_core_types;

pub use config::EngineConfig;
pub use conflict::{list_with_conflicts, ConflictType, VersionConflict};
pub use errors::{EntityError, ExError, ExErrorKind, Result};
pub use model::{Audit, AuditAction, Dataset, Def, Entity, PropertyMap, Tri};
pub use ops::{EntityRepository, MemoryStore};
pub use projection::{project, resolve_selection, Selection};
