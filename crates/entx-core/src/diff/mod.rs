//! Property-mapping diffs.
//!
//! Two comparisons with deliberately different coverage:
//!
//! - [`diff_keys`] walks only the left mapping, in its own key order. The
//!   conflict classifier uses it to ask "which of *these* properties changed".
//! - [`history_diff`] reports every property that differs between adjacent
//!   versions, in either direction, for history views.

pub mod engine;
pub mod model;

pub use engine::{diff_keys, history_diff};
pub use model::PropertyChange;
