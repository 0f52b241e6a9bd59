use chrono::{TimeZone, Utc};
use entx_core::model::{Actor, Audit, AuditAction, Dataset, Def, Entity, PropertyMap};
use entx_core::MemoryStore;

#[allow(dead_code)]
pub const UUID: &str = "12345678-1234-4123-8234-123456789abc";

/// Version 1 of every chain, both resolved and received
const JOHN_88: &[(&str, &str)] = &[("name", "John"), ("age", "88")];

/// Build a property map from literal pairs
#[allow(dead_code)]
pub fn map(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs.iter().copied().collect()
}

/// Build a def whose id equals its version
#[allow(dead_code)]
pub fn def(
    version: u32,
    base: Option<u32>,
    label: &str,
    data: &[(&str, &str)],
    received: &[(&str, &str)],
) -> Def {
    Def {
        id: i64::from(version),
        version,
        label: label.to_string(),
        data: map(data),
        data_received: map(received),
        base_version: base,
        conflicting_properties: None,
    }
}

#[allow(dead_code)]
pub fn creation_audit(def_id: i64) -> Vec<Audit> {
    vec![Audit::new(AuditAction::Create, def_id, Utc::now())]
}

/// v2 changes the name, v3 edits age from a v1 base
#[allow(dead_code)]
pub fn soft_chain() -> Vec<Def> {
    vec![
        def(1, None, "John", JOHN_88, JOHN_88),
        def(
            2,
            Some(1),
            "Jane",
            &[("name", "Jane"), ("age", "88")],
            &[("label", "Jane"), ("name", "Jane")],
        ),
        def(3, Some(1), "Jane", &[("name", "Jane"), ("age", "99")], &[("age", "99")]),
    ]
}

/// As [`soft_chain`], but v2 also changes the age
#[allow(dead_code)]
pub fn hard_chain() -> Vec<Def> {
    vec![
        def(1, None, "John", JOHN_88, JOHN_88),
        def(
            2,
            Some(1),
            "Jane",
            &[("name", "Jane"), ("age", "77")],
            &[("label", "Jane"), ("name", "Jane"), ("age", "77")],
        ),
        def(3, Some(1), "Jane", &[("name", "Jane"), ("age", "99")], &[("age", "99")]),
    ]
}

/// v4 is soft against v3, v5 is hard against v4
#[allow(dead_code)]
pub fn five_chain() -> Vec<Def> {
    vec![
        def(1, None, "John", JOHN_88, JOHN_88),
        def(
            2,
            Some(1),
            "Robert",
            &[("name", "Robert"), ("age", "20")],
            &[("label", "Robert"), ("name", "Robert"), ("age", "20")],
        ),
        def(
            3,
            Some(2),
            "Jane",
            &[("name", "Jane"), ("age", "20")],
            &[("label", "Jane"), ("name", "Jane")],
        ),
        def(4, Some(2), "Jane", &[("name", "Jane"), ("age", "99")], &[("age", "99")]),
        def(5, Some(3), "Jane", &[("name", "Jane"), ("age", "10")], &[("age", "10")]),
    ]
}

#[allow(dead_code)]
pub fn entity(defs: Vec<Def>) -> Entity {
    Entity {
        uuid: UUID.to_string(),
        dataset: "people".to_string(),
        creator: Actor::new("5", "Alice"),
        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        updated_at: None,
        defs,
    }
}

#[allow(dead_code)]
pub fn people() -> Dataset {
    Dataset::new("people", ["first_name", "age"])
}

#[allow(dead_code)]
pub fn people_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.create_dataset(people()).unwrap();
    store
}
