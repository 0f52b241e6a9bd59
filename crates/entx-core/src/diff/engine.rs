//! Diff computation.

use super::model::PropertyChange;
use crate::model::PropertyMap;

/// Keys of `a`, in `a`'s order, whose value differs in `b`
///
/// A key missing from `b` counts as different. Keys only in `b` are never
/// reported.
pub fn diff_keys(a: &PropertyMap, b: &PropertyMap) -> Vec<String> {
    a.iter()
        .filter(|(k, v)| b.get(k) != Some(*v))
        .map(|(k, _)| k.to_string())
        .collect()
}

/// Changes between each pair of adjacent mappings
///
/// Returns `maps.len() - 1` reports (none for zero or one input). Report *i*
/// covers every key of `maps[i]` in order, then keys that only appear in
/// `maps[i + 1]`.
pub fn history_diff(maps: &[PropertyMap]) -> Vec<Vec<PropertyChange>> {
    maps.windows(2)
        .map(|pair| adjacent_changes(&pair[0], &pair[1]))
        .collect()
}

fn adjacent_changes(old: &PropertyMap, new: &PropertyMap) -> Vec<PropertyChange> {
    let added = new.keys().filter(|k| !old.contains_key(k));
    old.keys()
        .chain(added)
        .filter_map(|key| {
            let (before, after) = (old.get(key), new.get(key));
            (before != after).then(|| PropertyChange::new(key, before, after))
        })
        .collect()
}
