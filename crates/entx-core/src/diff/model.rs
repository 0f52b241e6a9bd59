//! Diff output types.

use serde::{Deserialize, Serialize};

/// One changed property between two adjacent versions
///
/// `None` on either side means the property was not present in that version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub property_name: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl PropertyChange {
    pub fn new(property_name: &str, old: Option<&str>, new: Option<&str>) -> Self {
        Self {
            property_name: property_name.to_string(),
            old: old.map(str::to_string),
            new: new.map(str::to_string),
        }
    }
}
