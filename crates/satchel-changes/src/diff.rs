//! Flat field diff: dirty-field tracking between two snapshots.
//!
//! Given the last-synced snapshot and the current snapshot of the same
//! entity, update a dirty-field set: a field enters the set when its
//! value changed and leaves it when an edit is reverted. The same routine
//! serves every flat surface of a request (url, config, metadata).

use satchel_types::Snapshot;

use crate::set::FieldSet;

/// Update `existing` with the fields of `current` that differ from `last`.
///
/// For every field present in `current`: a value that differs from
/// `last`'s (deep equality) is added to the set; a value that matches
/// again is removed from it. Fields present only in `last` are not
/// visited. If either snapshot is absent there is nothing to diff and the
/// result is empty.
///
/// The existing set is consumed and the updated set returned; no caller
/// storage is aliased.
pub fn diff_fields(
    last: Option<&Snapshot>,
    current: Option<&Snapshot>,
    existing: FieldSet,
) -> FieldSet {
    let (Some(last), Some(current)) = (last, current) else {
        return FieldSet::new();
    };

    let mut dirty = existing;
    for (field, value) in current {
        if last.get(field) != Some(value) {
            dirty.insert(field.clone());
        } else if dirty.contains(field.as_str()) {
            dirty.remove(field.as_str());
        }
    }
    dirty
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_types::Snapshot;
    use serde_json::{json, Value};

    fn make_snapshot(pairs: &[(&str, Value)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn identical_snapshots_stay_clean() {
        let snapshot = make_snapshot(&[("url", json!("ws://localhost")), ("auth", json!(true))]);
        let dirty = diff_fields(Some(&snapshot), Some(&snapshot), FieldSet::new());
        assert!(dirty.is_empty());
    }

    #[test]
    fn identical_snapshots_keep_unrelated_dirt() {
        // Dirt recorded for fields this diff does not visit survives.
        let snapshot = make_snapshot(&[("url", json!("ws://localhost"))]);
        let existing: FieldSet = ["timeout"].into_iter().collect();
        let dirty = diff_fields(Some(&snapshot), Some(&snapshot), existing);
        assert!(dirty.contains("timeout"));
        assert_eq!(dirty.len(), 1);
    }

    #[test]
    fn changed_field_becomes_dirty() {
        let last = make_snapshot(&[("url", json!("ws://a")), ("auth", json!(false))]);
        let current = make_snapshot(&[("url", json!("ws://b")), ("auth", json!(false))]);
        let dirty = diff_fields(Some(&last), Some(&current), FieldSet::new());
        assert!(dirty.contains("url"));
        assert!(!dirty.contains("auth"));
    }

    #[test]
    fn revert_cancels_dirtiness() {
        let last = make_snapshot(&[("url", json!("ws://a"))]);
        let edited = make_snapshot(&[("url", json!("ws://b"))]);
        let dirty = diff_fields(Some(&last), Some(&edited), FieldSet::new());
        assert!(dirty.contains("url"));

        // The user puts the original value back.
        let reverted = last.clone();
        let dirty = diff_fields(Some(&last), Some(&reverted), dirty);
        assert!(dirty.is_empty());
    }

    #[test]
    fn field_new_in_current_is_dirty() {
        let last = make_snapshot(&[("url", json!("ws://a"))]);
        let current = make_snapshot(&[("url", json!("ws://a")), ("timeout", json!(30))]);
        let dirty = diff_fields(Some(&last), Some(&current), FieldSet::new());
        assert!(dirty.contains("timeout"));
    }

    #[test]
    fn field_only_in_last_is_not_visited() {
        let last = make_snapshot(&[("url", json!("ws://a")), ("legacy", json!(1))]);
        let current = make_snapshot(&[("url", json!("ws://a"))]);
        let dirty = diff_fields(Some(&last), Some(&current), FieldSet::new());
        assert!(dirty.is_empty());
    }

    #[test]
    fn absent_snapshot_short_circuits_to_empty() {
        let snapshot = make_snapshot(&[("url", json!("ws://a"))]);
        let existing: FieldSet = ["url"].into_iter().collect();

        assert!(diff_fields(None, Some(&snapshot), existing.clone()).is_empty());
        assert!(diff_fields(Some(&snapshot), None, existing.clone()).is_empty());
        assert!(diff_fields(None, None, existing).is_empty());
    }

    #[test]
    fn nested_values_compare_deeply() {
        let last = make_snapshot(&[("config", json!({"ping": true, "interval": 25}))]);
        let same = make_snapshot(&[("config", json!({"ping": true, "interval": 25}))]);
        let changed = make_snapshot(&[("config", json!({"ping": true, "interval": 10}))]);

        assert!(diff_fields(Some(&last), Some(&same), FieldSet::new()).is_empty());
        let dirty = diff_fields(Some(&last), Some(&changed), FieldSet::new());
        assert!(dirty.contains("config"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
            proptest::collection::btree_map(
                "[a-e]{1,3}",
                prop_oneof![
                    any::<i64>().prop_map(Value::from),
                    any::<bool>().prop_map(Value::from),
                    "[a-z]{0,6}".prop_map(Value::from),
                ],
                0..6,
            )
        }

        proptest! {
            #[test]
            fn self_diff_is_always_empty(snapshot in snapshot_strategy()) {
                let dirty = diff_fields(Some(&snapshot), Some(&snapshot), FieldSet::new());
                prop_assert!(dirty.is_empty());
            }

            #[test]
            fn dirty_fields_actually_differ(
                last in snapshot_strategy(),
                current in snapshot_strategy(),
            ) {
                let dirty = diff_fields(Some(&last), Some(&current), FieldSet::new());
                for field in dirty.iter() {
                    prop_assert_ne!(last.get(field), current.get(field));
                }
            }

            #[test]
            fn diffing_is_idempotent(
                last in snapshot_strategy(),
                current in snapshot_strategy(),
            ) {
                let once = diff_fields(Some(&last), Some(&current), FieldSet::new());
                let twice = diff_fields(Some(&last), Some(&current), once.clone());
                prop_assert_eq!(once, twice);
            }
        }
    }
}
