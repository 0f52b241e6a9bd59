//! Version conflict classification.
//!
//! An edit conflicts when it was authored against a version older than the
//! one it landed on top of. Whether that matters depends on what the
//! intervening edits touched:
//!
//! - **NONE**: the edit's base is its direct predecessor
//! - **SOFT**: other edits landed in between, on disjoint properties
//! - **HARD**: an intervening edit changed a property this edit also set
//!
//! [`classify`] labels a whole history; [`list_with_conflicts`] adds the
//! provenance check and the conflict-window filter used by review screens.

pub mod classifier;
pub mod model;

pub use classifier::{classify, list_with_conflicts, CreationAuditPolicy};
pub use model::{ConflictType, VersionConflict};
