// ==============================================
// CACHE MANAGER BEHAVIOR TESTS (integration)
// ==============================================
//
// Public-API checks of the LRU contract: capacity bound, recency order,
// promotion on read and update, eviction notification, delete semantics.
// Everything here goes through `lrukit::prelude`.

use std::sync::{Arc, Mutex};

use lrukit::prelude::*;
use proptest::prelude::*;

fn with_recorder<K, V>(cache: &CacheManager<K, V>) -> Arc<Mutex<Vec<K>>>
where
    K: Eq + std::hash::Hash + Clone + Send + 'static,
    V: 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    cache
        .subscribe(move |_, key: &K| sink.lock().unwrap().push(key.clone()))
        .unwrap();
    seen
}

// ==============================================
// Capacity Bound
// ==============================================

mod capacity_bound {
    use super::*;

    #[test]
    fn size_never_exceeds_capacity() {
        let cache: CacheManager<u32, u32> = CacheManager::new(8).unwrap();
        for i in 0..100 {
            cache.put(i % 23, i).unwrap();
            assert!(cache.current_size().unwrap() <= cache.capacity());
        }
        assert_eq!(cache.current_size().unwrap(), 8);
    }

    #[test]
    fn capacity_one_keeps_only_latest_key() {
        let cache: CacheManager<&str, i32> = CacheManager::new(1).unwrap();
        let evicted = with_recorder(&cache);

        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.put("c", 3).unwrap();

        assert_eq!(cache.current_size().unwrap(), 1);
        assert_eq!(*cache.most_recently_used().unwrap(), 3);
        assert_eq!(*cache.least_recently_used().unwrap(), 3);
        assert_eq!(*evicted.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn zero_capacity_is_invalid() {
        assert_eq!(
            CacheManager::<u32, u32>::new(0).unwrap_err(),
            CacheError::InvalidCapacity(0)
        );
        assert_eq!(
            CacheManagerBuilder::<u32, u32>::new(0).build().unwrap_err(),
            CacheError::InvalidCapacity(0)
        );
    }
}

// ==============================================
// Recency Ordering and Promotion
// ==============================================

mod recency {
    use super::*;

    #[test]
    fn insertion_order_without_reads() {
        let cache: CacheManager<u32, String> = CacheManager::new(5).unwrap();
        for i in 1..=5 {
            cache.put(i, format!("v{i}")).unwrap();
        }
        assert_eq!(*cache.least_recently_used().unwrap(), "v1");
        assert_eq!(*cache.most_recently_used().unwrap(), "v5");
        assert_eq!(cache.keys_by_recency().unwrap(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn get_promotes_to_mru() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 10).unwrap();
        cache.put(2, 20).unwrap();
        cache.put(3, 30).unwrap();

        assert_eq!(cache.get(&1).unwrap().as_deref(), Some(&10));
        assert_eq!(*cache.most_recently_used().unwrap(), 10);
        assert_eq!(*cache.least_recently_used().unwrap(), 20);
    }

    #[test]
    fn get_miss_leaves_order_unchanged() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 10).unwrap();
        cache.put(2, 20).unwrap();

        assert!(cache.get(&99).unwrap().is_none());
        assert_eq!(cache.keys_by_recency().unwrap(), vec![2, 1]);
    }

    #[test]
    fn update_promotes_and_keeps_size() {
        let cache: CacheManager<u32, &str> = CacheManager::new(3).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(3, "c").unwrap();

        cache.put(1, "a2").unwrap();
        assert_eq!(cache.current_size().unwrap(), 3);
        assert_eq!(*cache.most_recently_used().unwrap(), "a2");
        assert_eq!(*cache.least_recently_used().unwrap(), "b");
    }

    #[test]
    fn update_at_capacity_does_not_evict() {
        let cache: CacheManager<u32, u32> = CacheManager::new(2).unwrap();
        let evicted = with_recorder(&cache);

        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();
        cache.put(1, 100).unwrap();

        assert!(evicted.lock().unwrap().is_empty());
        assert!(cache.contains(&2).unwrap());
    }

    #[test]
    fn peek_and_contains_do_not_promote() {
        let cache: CacheManager<u32, u32> = CacheManager::new(2).unwrap();
        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();

        assert!(cache.contains(&1).unwrap());
        assert_eq!(cache.peek(&1).unwrap().as_deref(), Some(&1));

        cache.put(3, 3).unwrap();
        assert!(!cache.contains(&1).unwrap());
    }

    #[test]
    fn empty_cache_accessors_report_empty() {
        let cache: CacheManager<u32, u32> = CacheManager::new(2).unwrap();
        assert_eq!(cache.most_recently_used().unwrap_err(), CacheError::EmptyCache);
        assert_eq!(cache.least_recently_used().unwrap_err(), CacheError::EmptyCache);
    }
}

// ==============================================
// Eviction Notification
// ==============================================

mod eviction {
    use super::*;

    #[test]
    fn one_over_capacity_evicts_first_key_once() {
        let capacity = 4;
        let cache: CacheManager<u32, u32> = CacheManager::new(capacity).unwrap();
        let evicted = with_recorder(&cache);

        for i in 0..=capacity as u32 {
            cache.put(i, i).unwrap();
        }

        assert_eq!(*evicted.lock().unwrap(), vec![0]);
        assert!(!cache.contains(&0).unwrap());
        for i in 1..=capacity as u32 {
            assert!(cache.contains(&i).unwrap());
        }
    }

    #[test]
    fn every_observer_sees_each_eviction() {
        let cache: CacheManager<u32, u32> = CacheManager::new(1).unwrap();
        let a = with_recorder(&cache);
        let b = with_recorder(&cache);

        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();

        assert_eq!(*a.lock().unwrap(), vec![1]);
        assert_eq!(*b.lock().unwrap(), vec![1]);
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let cache: CacheManager<u32, u32> = CacheManager::new(1).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = cache
            .subscribe(move |_, key| sink.lock().unwrap().push(*key))
            .unwrap();

        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();
        assert!(cache.unsubscribe(id));
        cache.put(3, 3).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert!(!cache.unsubscribe(id));
    }

    #[test]
    fn delete_and_clear_do_not_notify() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        let evicted = with_recorder(&cache);

        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();
        cache.delete(&1).unwrap();
        cache.clear().unwrap();

        assert!(evicted.lock().unwrap().is_empty());
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn evicted_value_outlives_entry() {
        let cache: CacheManager<u32, String> = CacheManager::new(1).unwrap();
        cache.put(1, "kept".to_string()).unwrap();
        let held = cache.get(&1).unwrap().unwrap();

        cache.put(2, "other".to_string()).unwrap();
        assert!(!cache.contains(&1).unwrap());
        assert_eq!(*held, "kept");
    }
}

// ==============================================
// Delete
// ==============================================

mod delete {
    use super::*;

    #[test]
    fn absent_key_returns_false_and_changes_nothing() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();

        assert!(!cache.delete(&7).unwrap());
        assert_eq!(cache.current_size().unwrap(), 2);
        assert_eq!(cache.keys_by_recency().unwrap(), vec![2, 1]);
    }

    #[test]
    fn deleting_mru_exposes_next_entry() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 10).unwrap();
        cache.put(2, 20).unwrap();
        cache.put(3, 30).unwrap();

        assert!(cache.delete(&3).unwrap());
        assert!(!cache.contains(&3).unwrap());
        assert_eq!(*cache.most_recently_used().unwrap(), 20);
    }

    #[test]
    fn deleting_lru_exposes_next_entry() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 10).unwrap();
        cache.put(2, 20).unwrap();

        assert!(cache.delete(&1).unwrap());
        assert_eq!(*cache.least_recently_used().unwrap(), 20);
    }

    #[test]
    fn repeated_delete_returns_false() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 1).unwrap();

        assert!(cache.delete(&1).unwrap());
        assert!(!cache.delete(&1).unwrap());
        assert!(!cache.delete(&1).unwrap());
    }

    #[test]
    fn deleting_last_entry_empties_cache() {
        let cache: CacheManager<u32, u32> = CacheManager::new(3).unwrap();
        cache.put(1, 1).unwrap();
        cache.delete(&1).unwrap();

        assert_eq!(cache.current_size().unwrap(), 0);
        assert_eq!(cache.most_recently_used().unwrap_err(), CacheError::EmptyCache);
    }
}

// ==============================================
// Reference Scenario
// ==============================================

#[test]
fn three_entry_walkthrough() {
    let cache: CacheManager<&str, i32> = CacheManager::new(3).unwrap();
    let evicted = with_recorder(&cache);

    cache.put("A", 1).unwrap();
    cache.put("B", 2).unwrap();
    cache.put("C", 3).unwrap();
    assert_eq!(*cache.least_recently_used().unwrap(), 1);
    assert_eq!(*cache.most_recently_used().unwrap(), 3);

    assert_eq!(cache.get(&"A").unwrap().as_deref(), Some(&1));
    assert_eq!(*cache.most_recently_used().unwrap(), 1);

    cache.put("D", 4).unwrap();
    assert_eq!(*evicted.lock().unwrap(), vec!["B"]);
    assert!(!cache.contains(&"B").unwrap());
    assert_eq!(cache.current_size().unwrap(), 3);
}

// ==============================================
// Disposal
// ==============================================

#[test]
fn disposed_manager_rejects_every_operation() {
    let cache: CacheManager<u32, u32> = CacheManager::new(2).unwrap();
    cache.put(1, 1).unwrap();
    assert!(cache.dispose());

    assert_eq!(cache.put(2, 2), Err(CacheError::Disposed));
    assert_eq!(cache.get(&1).unwrap_err(), CacheError::Disposed);
    assert_eq!(cache.peek(&1).unwrap_err(), CacheError::Disposed);
    assert_eq!(cache.delete(&1), Err(CacheError::Disposed));
    assert_eq!(cache.contains(&1), Err(CacheError::Disposed));
    assert_eq!(cache.current_size(), Err(CacheError::Disposed));
    assert_eq!(cache.clear(), Err(CacheError::Disposed));
    assert_eq!(cache.most_recently_used().unwrap_err(), CacheError::Disposed);
    assert_eq!(cache.least_recently_used().unwrap_err(), CacheError::Disposed);
    assert_eq!(cache.subscribe(|_, _| {}).unwrap_err(), CacheError::Disposed);
    assert_eq!(cache.capacity(), 2);
    assert_eq!(cache.observer_count(), 0);
}

// ==============================================
// Property Tests
// ==============================================

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u16),
    Get(u8),
    Delete(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..32, any::<u16>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => (0u8..32).prop_map(Op::Get),
        1 => (0u8..32).prop_map(Op::Delete),
    ]
}

proptest! {
    /// The manager agrees with a most-recent-first vector model, including
    /// which key every eviction reports.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_matches_recency_model(
        capacity in 1usize..12,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let cache: CacheManager<u8, u16> = CacheManager::new(capacity).unwrap();
        let evicted = with_recorder(&cache);
        let mut model: Vec<(u8, u16)> = Vec::new();
        let mut expected_evictions = Vec::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    if let Some(pos) = model.iter().position(|(mk, _)| *mk == k) {
                        model.remove(pos);
                    } else if model.len() == capacity {
                        let (victim, _) = model.pop().unwrap();
                        expected_evictions.push(victim);
                    }
                    model.insert(0, (k, v));
                    cache.put(k, v).unwrap();
                }
                Op::Get(k) => {
                    let expected = model.iter().position(|(mk, _)| *mk == k).map(|pos| {
                        let entry = model.remove(pos);
                        model.insert(0, entry);
                        entry.1
                    });
                    prop_assert_eq!(cache.get(&k).unwrap().as_deref().copied(), expected);
                }
                Op::Delete(k) => {
                    let pos = model.iter().position(|(mk, _)| *mk == k);
                    if let Some(pos) = pos {
                        model.remove(pos);
                    }
                    prop_assert_eq!(cache.delete(&k).unwrap(), pos.is_some());
                }
            }

            prop_assert!(cache.current_size().unwrap() <= capacity);
            let keys: Vec<u8> = model.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(cache.keys_by_recency().unwrap(), keys);
        }

        prop_assert_eq!(&*evicted.lock().unwrap(), &expected_evictions);
    }
}
