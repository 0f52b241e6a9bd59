use serde::{Deserialize, Serialize};

use super::property_map::PropertyMap;

/// Reserved key under which a supplied label is recorded in `data_received`
pub const LABEL_KEY: &str = "label";

/// One immutable version of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Def {
    /// Creation-order sequence key across all entities
    pub id: i64,

    /// 1-based, contiguous per entity
    pub version: u32,

    pub label: String,

    /// Fully resolved values after merging this edit onto the previous version
    pub data: PropertyMap,

    /// Values this edit explicitly supplied; `label` appears when the edit set one
    pub data_received: PropertyMap,

    /// Version the submitter believed current; `None` only for version 1
    pub base_version: Option<u32>,

    /// Cached conflict set; `None` means not yet evaluated
    #[serde(default)]
    pub conflicting_properties: Option<Vec<String>>,
}

impl Def {
    /// Value of `key` as seen by conflict analysis; `label` resolves to the def's label
    pub fn value_of(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(v) => Some(v),
            None if key == LABEL_KEY => Some(self.label.as_str()),
            None => None,
        }
    }

    /// Keys this edit explicitly touched, in submission order
    pub fn edited_keys(&self) -> impl Iterator<Item = &str> {
        self.data_received.keys()
    }

    /// The label under [`LABEL_KEY`], then `data`
    pub fn snapshot(&self) -> PropertyMap {
        let mut snapshot = PropertyMap::new();
        snapshot.insert(LABEL_KEY, self.label.as_str());
        snapshot.merged_with(&self.data)
    }
}
