use serde::Deserialize;
use std::collections::BTreeSet;

use super::model::{ConflictType, VersionConflict};
use crate::diff::diff_keys;
use crate::errors::{EntityError, Result};
use crate::model::{Audit, Def};

/// What to do when the first def has no creation audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationAuditPolicy {
    /// Log a warning and classify anyway
    #[default]
    Warn,
    /// Fail with `MissingCreationAudit`
    Require,
}

/// Classify every def of one entity's history
///
/// `defs` must be the complete ascending history: version *i + 1* at index
/// *i*, no base on version 1, and `1 <= base < version` everywhere else.
///
/// # Errors
///
/// - `VersionSequenceBroken` if versions are not `1..=n`
/// - `InvalidBaseVersion` if a base version violates the rules above
pub fn classify(defs: &[Def]) -> Result<Vec<VersionConflict>> {
    check_history(defs)?;
    Ok((0..defs.len()).map(|i| classify_at(defs, i)).collect())
}

/// Classify a history after checking its provenance, optionally keeping
/// only the versions relevant to a conflict
///
/// With `only_conflicting` set, the view starts at the lowest `base_version`
/// among the SOFT and HARD versions, clamped to at least 2, and runs to the
/// end of the history. It can therefore begin before the first conflicting
/// version: conflicts at v4 (base 2) and v5 (base 3) keep `[2, 3, 4, 5]`.
/// A history without conflicts yields an empty list.
///
/// # Errors
///
/// Everything [`classify`] returns, plus `MissingCreationAudit` when
/// `policy` is [`CreationAuditPolicy::Require`] and `audits` has no creation
/// entry for the first def.
pub fn list_with_conflicts(
    defs: &[Def],
    audits: &[Audit],
    only_conflicting: bool,
    policy: CreationAuditPolicy,
) -> Result<Vec<VersionConflict>> {
    if let Some(first) = defs.first() {
        if !audits.iter().any(|a| a.is_creation_of(first.id)) {
            match policy {
                CreationAuditPolicy::Require => {
                    return Err(EntityError::MissingCreationAudit { def_id: first.id });
                }
                CreationAuditPolicy::Warn => {
                    tracing::warn!(
                        def_id = first.id,
                        audit_count = audits.len(),
                        "no creation audit for first entity def"
                    );
                }
            }
        }
    }

    let classified = classify(defs)?;
    if !only_conflicting {
        return Ok(classified);
    }
    Ok(conflict_window(classified))
}

fn check_history(defs: &[Def]) -> Result<()> {
    for (position, def) in defs.iter().enumerate() {
        let expected = u32::try_from(position + 1).map_err(|_| EntityError::Internal {
            message: format!("history too long at position {}", position),
        })?;
        if def.version != expected {
            return Err(EntityError::VersionSequenceBroken {
                position,
                expected,
                found: def.version,
            });
        }

        let base_ok = match def.base_version {
            None => def.version == 1,
            Some(base) => def.version > 1 && base >= 1 && base < def.version,
        };
        if !base_ok {
            return Err(EntityError::InvalidBaseVersion {
                version: def.version,
                base_version: def.base_version,
            });
        }
    }
    Ok(())
}

/// Classify `defs[index]`; the history has already been checked
fn classify_at(defs: &[Def], index: usize) -> VersionConflict {
    let def = &defs[index];
    let base_version = match def.base_version {
        Some(base) if index > 0 && base != defs[index - 1].version => base,
        _ => return settle(def, ConflictType::None, Vec::new(), Vec::new(), Vec::new()),
    };

    let predecessor = &defs[index - 1];
    let base = &defs[base_version as usize - 1];
    let edited: Vec<&str> = def.edited_keys().collect();

    let differs_from = |other: &Def| -> Vec<String> {
        edited
            .iter()
            .filter(|k| other.value_of(k) != def.value_of(k))
            .map(|k| k.to_string())
            .collect()
    };
    let base_diff = differs_from(base);
    let server_diff = differs_from(predecessor);

    // Versions base+1 ..= predecessor sit at indices base..index
    let base_snapshot = base.snapshot();
    let intervening: BTreeSet<String> = defs[base_version as usize..index]
        .iter()
        .flat_map(|x| diff_keys(&base_snapshot, &x.snapshot()))
        .collect();

    let conflicting: Vec<String> = edited
        .iter()
        .filter(|k| intervening.contains(**k))
        .map(|k| k.to_string())
        .collect();

    let conflict = if conflicting.is_empty() {
        ConflictType::Soft
    } else {
        ConflictType::Hard
    };
    settle(def, conflict, base_diff, server_diff, conflicting)
}

fn settle(
    def: &Def,
    conflict: ConflictType,
    base_diff: Vec<String>,
    server_diff: Vec<String>,
    conflicting: Vec<String>,
) -> VersionConflict {
    if let Some(cached) = &def.conflicting_properties {
        let cached_set: BTreeSet<&str> = cached.iter().map(String::as_str).collect();
        let computed_set: BTreeSet<&str> = conflicting.iter().map(String::as_str).collect();
        if cached_set != computed_set {
            tracing::warn!(
                def_id = def.id,
                version = def.version,
                cached = ?cached,
                computed = ?conflicting,
                "cached conflicting properties disagree with history"
            );
        }
    }

    let mut def = def.clone();
    def.conflicting_properties = Some(conflicting);
    VersionConflict {
        def,
        conflict,
        base_diff,
        server_diff,
    }
}

fn conflict_window(classified: Vec<VersionConflict>) -> Vec<VersionConflict> {
    let oldest_base = classified
        .iter()
        .filter(|v| v.conflict.is_conflict())
        .filter_map(|v| v.def.base_version)
        .min();

    match oldest_base {
        Some(base) => {
            let start = base.max(2);
            classified
                .into_iter()
                .filter(|v| v.version() >= start)
                .collect()
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyMap;

    fn def(
        version: u32,
        base: Option<u32>,
        data: &[(&str, &str)],
        received: &[(&str, &str)],
    ) -> Def {
        Def {
            id: i64::from(version) * 10,
            version,
            label: format!("v{}", version),
            data: data.iter().copied().collect::<PropertyMap>(),
            data_received: received.iter().copied().collect::<PropertyMap>(),
            base_version: base,
            conflicting_properties: None,
        }
    }

    #[test]
    fn test_first_version_is_never_a_conflict() {
        let defs = vec![def(1, None, &[("a", "1")], &[("a", "1")])];
        let result = classify(&defs).unwrap();
        assert_eq!(result[0].conflict, ConflictType::None);
        assert!(result[0].base_diff.is_empty());
        assert!(result[0].server_diff.is_empty());
    }

    #[test]
    fn test_based_on_predecessor_is_none() {
        let defs = vec![
            def(1, None, &[("a", "1")], &[("a", "1")]),
            def(2, Some(1), &[("a", "2")], &[("a", "2")]),
        ];
        let result = classify(&defs).unwrap();
        assert_eq!(result[1].conflict, ConflictType::None);
        assert!(result[1].base_diff.is_empty());
        assert_eq!(result[1].def.conflicting_properties, Some(vec![]));
    }

    #[test]
    fn test_gap_in_versions_fails_fast() {
        let defs = vec![
            def(1, None, &[], &[]),
            def(3, Some(1), &[], &[]),
        ];
        assert_eq!(
            classify(&defs),
            Err(EntityError::VersionSequenceBroken {
                position: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_base_version_rules() {
        let no_base = vec![def(1, None, &[], &[]), def(2, None, &[], &[])];
        assert!(matches!(
            classify(&no_base),
            Err(EntityError::InvalidBaseVersion { version: 2, .. })
        ));

        let future_base = vec![def(1, None, &[], &[]), def(2, Some(2), &[], &[])];
        assert!(matches!(
            classify(&future_base),
            Err(EntityError::InvalidBaseVersion { version: 2, .. })
        ));

        let based_first = vec![def(1, Some(1), &[], &[])];
        assert!(matches!(
            classify(&based_first),
            Err(EntityError::InvalidBaseVersion { version: 1, .. })
        ));
    }

    #[test]
    fn test_empty_history() {
        assert!(classify(&[]).unwrap().is_empty());
        assert!(list_with_conflicts(&[], &[], true, CreationAuditPolicy::Require)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_label_edits_collide_with_label_edits() {
        let defs = vec![
            def(1, None, &[("a", "1")], &[("a", "1")]),
            def(2, Some(1), &[("a", "1")], &[("label", "v2")]),
            def(3, Some(1), &[("a", "1")], &[("label", "v3")]),
        ];
        let result = classify(&defs).unwrap();
        assert_eq!(result[2].conflict, ConflictType::Hard);
        assert_eq!(result[2].base_diff, vec!["label"]);
        assert_eq!(result[2].server_diff, vec!["label"]);
    }

    #[test]
    fn test_window_is_empty_without_conflicts() {
        let defs = vec![
            def(1, None, &[("a", "1")], &[("a", "1")]),
            def(2, Some(1), &[("a", "2")], &[("a", "2")]),
        ];
        let audits = vec![Audit::new(crate::model::AuditAction::Create, 10, chrono::Utc::now())];
        let result = list_with_conflicts(&defs, &audits, true, CreationAuditPolicy::Warn).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_require_policy_rejects_missing_creation_audit() {
        let defs = vec![def(1, None, &[("a", "1")], &[("a", "1")])];
        let wrong = vec![Audit::new(crate::model::AuditAction::Create, 99, chrono::Utc::now())];
        assert_eq!(
            list_with_conflicts(&defs, &wrong, false, CreationAuditPolicy::Require),
            Err(EntityError::MissingCreationAudit { def_id: 10 })
        );
        assert!(list_with_conflicts(&defs, &wrong, false, CreationAuditPolicy::Warn).is_ok());
    }
}
