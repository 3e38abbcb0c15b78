//! Sort-policy tests for reconciliation.
//!
//! Rules covered:
//! - Output is ordered by creation timestamp per the sort policy
//! - Output is a permutation of the visible input (no drops, no duplicates)
//! - Equal timestamps keep snapshot order in both directions
//! - Comments stay in insertion order

use crate::reconcile;
use board_core::{PostId, SortOrder};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

fn snapshot(entries: &[(&str, i64)]) -> Value {
    let mut map = Map::new();
    for (key, ts) in entries {
        map.insert(
            key.to_string(),
            json!({"content": format!("post {key}"), "timestamp": ts}),
        );
    }
    Value::Object(map)
}

fn ids(keys: &[&str]) -> Vec<PostId> {
    keys.iter().map(|k| PostId::from(*k)).collect()
}

#[test]
fn newest_first_and_oldest_first() {
    let snap = snapshot(&[("a", 30), ("b", 10), ("c", 20)]);
    assert_eq!(
        reconcile(&snap, SortOrder::Newest, None).ids(),
        ids(&["a", "c", "b"])
    );
    assert_eq!(
        reconcile(&snap, SortOrder::Oldest, None).ids(),
        ids(&["b", "c", "a"])
    );
}

#[test]
fn ties_keep_snapshot_order() {
    let snap = snapshot(&[("a", 5), ("b", 5), ("c", 1), ("d", 5)]);
    assert_eq!(
        reconcile(&snap, SortOrder::Oldest, None).ids(),
        ids(&["c", "a", "b", "d"])
    );
    assert_eq!(
        reconcile(&snap, SortOrder::Newest, None).ids(),
        ids(&["a", "b", "d", "c"])
    );
}

#[test]
fn output_is_a_sorted_permutation() {
    let entries: Vec<(String, i64)> = (0..50)
        .map(|i| (format!("k{i:02}"), (i * 37 % 11) as i64))
        .collect();
    let borrowed: Vec<(&str, i64)> = entries.iter().map(|(k, t)| (k.as_str(), *t)).collect();
    let snap = snapshot(&borrowed);

    for sort in [SortOrder::Newest, SortOrder::Oldest] {
        let view = reconcile(&snap, sort, None);
        assert_eq!(view.len(), entries.len());

        let unique: BTreeSet<PostId> = view.ids().into_iter().collect();
        assert_eq!(unique.len(), entries.len());

        let stamps: Vec<i64> = view.posts.iter().map(|p| p.created_at).collect();
        let ordered = stamps.windows(2).all(|w| match sort {
            SortOrder::Newest => w[0] >= w[1],
            SortOrder::Oldest => w[0] <= w[1],
        });
        assert!(ordered, "{sort:?} not ordered: {stamps:?}");
    }
}

#[test]
fn comments_in_key_order() {
    let snap = json!({
        "p": {
            "content": "x",
            "timestamp": 1,
            "comments": {
                "01HZZ0000000000000000000A": {"user": "a", "text": "one", "timestamp": 3},
                "01HZZ0000000000000000000B": {"user": "b", "text": "two", "timestamp": 1},
                "01HZZ0000000000000000000C": {"user": "c", "text": "three", "timestamp": 2}
            }
        }
    });
    let view = reconcile(&snap, SortOrder::Newest, None);
    let texts: Vec<&str> = view.posts[0]
        .comments
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}
