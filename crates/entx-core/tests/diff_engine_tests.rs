#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::map;
use entx_core::diff::{diff_keys, history_diff, PropertyChange};
use entx_core::PropertyMap;
use proptest::prelude::*;

fn property_map() -> impl Strategy<Value = PropertyMap> {
    proptest::collection::vec(("[a-d]{1,2}", "[x-z]{0,2}"), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_diff_keys_of_self_is_empty(a in property_map()) {
        prop_assert!(diff_keys(&a, &a).is_empty());
    }

    #[test]
    fn prop_diff_keys_only_reports_keys_of_first(a in property_map(), b in property_map()) {
        for key in diff_keys(&a, &b) {
            prop_assert!(a.contains_key(&key));
        }
    }

    #[test]
    fn prop_diff_keys_follows_first_map_order(a in property_map(), b in property_map()) {
        let order: Vec<&str> = a.keys().collect();
        let reported = diff_keys(&a, &b);
        let positions: Vec<usize> = reported
            .iter()
            .map(|k| order.iter().position(|o| *o == k.as_str()).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_history_diff_of_identical_maps_is_empty(a in property_map(), n in 0usize..6) {
        let maps = vec![a; n];
        let reports = history_diff(&maps);
        prop_assert_eq!(reports.len(), n.saturating_sub(1));
        prop_assert!(reports.iter().all(Vec::is_empty));
    }
}

#[test]
fn test_diff_keys_includes_keys_missing_from_second() {
    let a = map(&[("name", "John"), ("age", "22"), ("gender", "male")]);
    let b = map(&[("name", "Jane"), ("age", "22"), ("hometown", "Boston")]);
    assert_eq!(diff_keys(&a, &b), vec!["name", "gender"]);
}

#[test]
fn test_history_diff_covers_both_directions() {
    let maps = vec![
        map(&[("name", "John"), ("age", "12")]),
        map(&[("name", "Jane"), ("age", "12"), ("city", "Toronto")]),
        map(&[("name", "Robert"), ("age", "12"), ("city", "Boston")]),
        map(&[("name", "Robert"), ("age", ""), ("city", ""), ("sex", "male")]),
    ];

    let expected = vec![
        vec![
            PropertyChange::new("name", Some("John"), Some("Jane")),
            PropertyChange::new("city", None, Some("Toronto")),
        ],
        vec![
            PropertyChange::new("name", Some("Jane"), Some("Robert")),
            PropertyChange::new("city", Some("Toronto"), Some("Boston")),
        ],
        vec![
            PropertyChange::new("age", Some("12"), Some("")),
            PropertyChange::new("city", Some("Boston"), Some("")),
            PropertyChange::new("sex", None, Some("male")),
        ],
    ];
    assert_eq!(history_diff(&maps), expected);
}

#[test]
fn test_history_diff_short_inputs() {
    assert!(history_diff(&[]).is_empty());
    assert!(history_diff(&[map(&[("name", "John")])]).is_empty());
}
