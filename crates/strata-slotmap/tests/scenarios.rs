//! End-to-end slot map scenarios through the public API only.

use std::collections::HashMap;

use strata_arena::ArenaConfig;
use strata_slotmap::{Handle, SlotMap, SlotMapError};
use strata_test_utils::fixtures::{CacheLine, Marker, Odd, Wide};
use strata_test_utils::{DropCounter, Recorder};

// ── Helpers ─────────────────────────────────────────────────────

fn paged<T>(page_capacity: usize) -> SlotMap<T> {
    SlotMap::with_config(ArenaConfig::new(page_capacity)).unwrap()
}

// ── Lifecycle ───────────────────────────────────────────────────

#[test]
fn entity_table_lifecycle() {
    let mut entities: SlotMap<String> = paged(4);
    let mut names: HashMap<Handle<String>, &str> = HashMap::new();

    for name in ["ash", "birch", "cedar", "dogwood", "elm", "fir"] {
        let h = entities.add(name.to_string()).unwrap();
        names.insert(h, name);
    }
    assert_eq!(entities.len(), 6);

    let doomed: Vec<_> = names
        .iter()
        .filter(|(_, n)| n.len() <= 3)
        .map(|(&h, _)| h)
        .collect();
    for h in &doomed {
        entities.remove(*h).unwrap();
    }

    for (&h, &name) in &names {
        match entities.find(h) {
            Some(found) => assert_eq!(found, name),
            None => assert!(doomed.contains(&h)),
        }
    }
    assert_eq!(entities.len(), 3);
    assert_eq!(
        entities.values().map(String::as_str).collect::<Vec<_>>(),
        ["birch", "cedar", "dogwood"]
    );
}

#[test]
fn values_do_not_move_when_the_map_grows() {
    let mut map: SlotMap<u64> = paged(2);
    let first = map.add(1).unwrap();
    let before: *const u64 = map.at(first).unwrap();
    for i in 0..100 {
        map.add(i).unwrap();
    }
    let after: *const u64 = map.at(first).unwrap();
    assert_eq!(before, after);
}

#[test]
fn reused_slot_rejects_every_previous_handle() {
    let mut map: SlotMap<u32> = paged(1);
    let mut history = Vec::new();
    let mut current = map.add(0).unwrap();
    for round in 1..20 {
        map.remove(current).unwrap();
        history.push(current);
        current = map.add(round).unwrap();
        assert_eq!(current.index(), 0);
        assert_eq!(current.version(), round + 1);
    }
    for h in history {
        assert_eq!(
            map.at(h),
            Err(SlotMapError::InvalidHandle {
                index: 0,
                version: h.version()
            })
        );
    }
    assert_eq!(map.at(current), Ok(&19));
}

// ── Deletion hooks ──────────────────────────────────────────────

#[test]
fn deleter_sees_removed_cleared_and_dropped_values() {
    let recorder = Recorder::new();
    {
        let mut map =
            SlotMap::with_config_and_deleter(ArenaConfig::new(3), recorder.sink()).unwrap();
        let handles: Vec<_> = (0..6).map(|i| map.add(i).unwrap()).collect();
        map.remove(handles[4]).unwrap();
        assert_eq!(recorder.take(), vec![4]);

        map.clear();
        let mut cleared = recorder.take();
        cleared.sort();
        assert_eq!(cleared, vec![0, 1, 2, 3, 5]);

        map.add(10).unwrap();
        map.add(11).unwrap();
    }
    let mut dropped = recorder.take();
    dropped.sort();
    assert_eq!(dropped, vec![10, 11]);
}

#[test]
fn default_deleter_drops_each_value_exactly_once() {
    let counter = DropCounter::new();
    let mut map = paged(2);
    let handles: Vec<_> = (0..10).map(|i| map.add(counter.track(i)).unwrap()).collect();
    for h in handles.iter().step_by(3) {
        map.remove(*h).unwrap();
    }
    assert_eq!(counter.dropped(), 4);

    let taken = map.take(handles[1]).unwrap();
    assert_eq!(*taken, 1);
    assert_eq!(counter.dropped(), 4);
    drop(taken);
    drop(map);
    assert_eq!(counter.dropped(), 10);
}

// ── Element layouts ─────────────────────────────────────────────

#[test]
fn over_aligned_values_stay_aligned() {
    let mut map: SlotMap<CacheLine> = paged(3);
    let handles: Vec<_> = (0..10).map(|i| map.add(CacheLine(i)).unwrap()).collect();
    for (i, h) in handles.iter().enumerate() {
        let value = map.at(*h).unwrap();
        assert_eq!(value as *const CacheLine as usize % 64, 0);
        assert_eq!(value.0, i as u64);
    }
}

#[test]
fn zero_sized_values_still_get_versioned_handles() {
    let mut map: SlotMap<Marker> = paged(4);
    let a = map.add(Marker).unwrap();
    let b = map.add(Marker).unwrap();
    map.remove(a).unwrap();
    let c = map.add(Marker).unwrap();
    assert_eq!((c.index(), c.version()), (0, 2));
    assert!(!map.contains(a));
    assert!(map.contains(b) && map.contains(c));
    assert_eq!(map.iter().len(), 2);
}

#[test]
fn wide_and_odd_values_round_trip() {
    let mut wide: SlotMap<Wide> = paged(2);
    let hs: Vec<_> = (0..5).map(|i| wide.add(Wide::splat(i)).unwrap()).collect();
    assert!(hs.iter().enumerate().all(|(i, h)| wide[*h] == Wide::splat(i as u64)));

    let mut odd: SlotMap<Odd> = paged(5);
    let hs: Vec<_> = (0..12u8).map(|i| odd.add(Odd([i, i, i])).unwrap()).collect();
    odd.remove(hs[7]).unwrap();
    assert_eq!(odd.values().map(|o| o.0[0]).sum::<u8>(), (0..12).sum::<u8>() - 7);
}

// ── Limits and failure ──────────────────────────────────────────

#[test]
fn bounded_map_reports_arena_exhaustion() {
    let mut map: SlotMap<u8> =
        SlotMap::with_config(ArenaConfig::new(4).with_max_pages(2)).unwrap();
    let handles: Vec<_> = (0..8).map(|i| map.add(i).unwrap()).collect();
    let err = map.add(8).unwrap_err();
    assert!(matches!(err, SlotMapError::Arena(_)));
    assert!(std::error::Error::source(&err).is_some());

    map.remove(handles[5]).unwrap();
    assert_eq!(map.add(8).unwrap().index(), 5);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let err = SlotMap::<u8>::with_config(ArenaConfig::new(0)).unwrap_err();
    assert!(matches!(err, SlotMapError::Arena(_)));
}

// ── Threads ─────────────────────────────────────────────────────

#[test]
fn map_moves_across_threads() {
    let mut map: SlotMap<Vec<u32>> = paged(8);
    let h = map.add(vec![1, 2, 3]).unwrap();
    let map = std::thread::spawn(move || {
        map[h].push(4);
        map
    })
    .join()
    .unwrap();
    assert_eq!(map[h], vec![1, 2, 3, 4]);
}
