use serde::{Deserialize, Serialize};

use crate::model::Def;

/// Conflict class of one version, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    #[default]
    None,
    Soft,
    Hard,
}

impl ConflictType {
    pub fn is_conflict(&self) -> bool {
        !matches!(self, ConflictType::None)
    }

    /// Wire value used by the read projection; `None` has no label
    pub fn as_label(&self) -> Option<&'static str> {
        match self {
            ConflictType::None => None,
            ConflictType::Soft => Some("soft"),
            ConflictType::Hard => Some("hard"),
        }
    }
}

/// A def with its classification and explanatory diffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionConflict {
    /// The input def; `conflicting_properties` is always filled in
    #[serde(flatten)]
    pub def: Def,
    pub conflict: ConflictType,
    /// Edited properties whose value differs from the editor's base version
    pub base_diff: Vec<String>,
    /// Edited properties whose value differs from the predecessor version
    pub server_diff: Vec<String>,
}

impl VersionConflict {
    pub fn version(&self) -> u32 {
        self.def.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(ConflictType::None < ConflictType::Soft);
        assert!(ConflictType::Soft < ConflictType::Hard);
        assert_eq!(
            [ConflictType::Soft, ConflictType::None].iter().max(),
            Some(&ConflictType::Soft)
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConflictType::None.as_label(), None);
        assert_eq!(ConflictType::Hard.as_label(), Some("hard"));
        assert!(!ConflictType::None.is_conflict());
        assert!(ConflictType::Soft.is_conflict());
    }
}
