// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Invariants of recency lists and run history under arbitrary call sequences.
#![allow(clippy::unwrap_used)]

use envprefs_core::{EnvPrefs, HistoryRecord, MemoryStore};
use proptest::prelude::*;
use serde_json::json;

fn value_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", " ", "default", "kube-system", "a", "b", "c", "d", "e"])
        .prop_map(str::to_owned)
}

proptest! {
    #[test]
    fn recents_stay_capped_and_unique(
        values in prop::collection::vec(value_strategy(), 0..64),
        cap in 1usize..6,
    ) {
        let prefs = EnvPrefs::new(MemoryStore::new());
        for v in &values {
            prefs.save_recent("e1", "list", v, cap).unwrap();
            let list = prefs.get_recents("e1", "list");
            prop_assert!(list.len() <= cap);
            let mut sorted = list.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), list.len());
            if !v.trim().is_empty() {
                prop_assert_eq!(&list[0], v);
            }
        }
    }

    #[test]
    fn saving_same_value_twice_is_idempotent(
        prefix in prop::collection::vec(value_strategy(), 0..16),
        v in "[a-z]{1,8}",
    ) {
        let prefs = EnvPrefs::new(MemoryStore::new());
        for p in &prefix {
            prefs.save_k8s_recent("e1", "pod", p).unwrap();
        }
        prefs.save_k8s_recent("e1", "pod", &v).unwrap();
        let once = prefs.get_k8s_recents("e1", "pod");
        prefs.save_k8s_recent("e1", "pod", &v).unwrap();
        let twice = prefs.get_k8s_recents("e1", "pod");
        prop_assert_eq!(&twice[0], &v);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn history_never_holds_duplicate_identities(
        runs in prop::collection::vec((0u8..4, 0u8..3), 0..40),
        max in 1usize..8,
    ) {
        let prefs = EnvPrefs::new(MemoryStore::new());
        for (ts, (image, x)) in (0i64..).zip(&runs) {
            let record = HistoryRecord::new(format!("img-{image}"), json!({"x": x}), ts);
            prefs.add_gadget_to_history("e1", record, max).unwrap();
        }
        let history = prefs.get_gadget_history("e1");
        prop_assert!(history.len() <= max);
        for (i, a) in history.iter().enumerate() {
            for b in &history[i + 1..] {
                prop_assert!(!(a.image == b.image && a.params == b.params));
            }
        }
        let mut stamps: Vec<i64> = history.iter().map(|r| r.timestamp).collect();
        let original = stamps.clone();
        stamps.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(stamps, original);
    }
}
