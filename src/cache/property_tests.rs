//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key building and memoization behaviour over
//! generated arguments.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{wrap, CacheKey, DisableSwitch, MemoConfig, MemoryStore, OperationId};
use crate::error::CacheError;

const SEARCH: OperationId = OperationId::new("Tracker", "search");

// == Strategies ==
fn word_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ ]{0,24}".prop_map(|s| s)
}

fn filters_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Same inputs always give the same key.
    #[test]
    fn prop_key_is_deterministic(
        prefix in word_strategy(),
        query in word_strategy(),
        filters in filters_strategy()
    ) {
        let a = CacheKey::build(&prefix, SEARCH, &(query.clone(), filters.clone())).unwrap();
        let b = CacheKey::build(&prefix, SEARCH, &(query, filters)).unwrap();
        prop_assert_eq!(a, b);
    }

    // Different argument tuples never share a key.
    #[test]
    fn prop_distinct_arguments_distinct_keys(
        (q1, n1) in (word_strategy(), any::<u32>()),
        (q2, n2) in (word_strategy(), any::<u32>())
    ) {
        prop_assume!((q1.as_str(), n1) != (q2.as_str(), n2));
        let a = CacheKey::build("", SEARCH, &(q1, n1)).unwrap();
        let b = CacheKey::build("", SEARCH, &(q2, n2)).unwrap();
        prop_assert_ne!(a, b);
    }

    // Key starts with prefix and identity in that order.
    #[test]
    fn prop_key_layout(prefix in word_strategy(), query in word_strategy()) {
        let key = CacheKey::build(&prefix, SEARCH, &(query,)).unwrap();
        let head = format!("{}Tracker_search_", prefix);
        prop_assert!(key.as_str().starts_with(&head));
    }

    // Two sequential identical calls run the operation once and agree.
    #[test]
    fn prop_repeat_call_runs_once(query in word_strategy(), filters in filters_strategy()) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let memo = wrap(
            move |(), (q, f): (String, BTreeMap<String, i64>)| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, CacheError>(format!("{}:{}", q, f.len())) }
            },
            MemoConfig::new(SEARCH),
            Arc::new(MemoryStore::new()),
            DisableSwitch::enabled(),
        )
        .unwrap();

        let (first, second) = runtime().block_on(async {
            let first = memo.call((), (query.clone(), filters.clone())).await.unwrap();
            let second = memo.call((), (query, filters)).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first, second);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // With the switch off every call reaches the operation and nothing is stored.
    #[test]
    fn prop_disabled_never_stores(query in word_strategy(), repeats in 1usize..5) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let store = Arc::new(MemoryStore::new());
        let memo = wrap(
            move |(), (q,): (String,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, CacheError>(q.len()) }
            },
            MemoConfig::new(SEARCH),
            store.clone(),
            DisableSwitch::disabled(),
        )
        .unwrap();

        let stored = runtime().block_on(async {
            for _ in 0..repeats {
                memo.call((), (query.clone(),)).await.unwrap();
            }
            store.len().await
        });

        prop_assert_eq!(calls.load(Ordering::SeqCst), repeats);
        prop_assert_eq!(stored, 0);
    }
}
