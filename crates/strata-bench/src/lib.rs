//! Benchmark workloads for the strata arenas and slot map.
//!
//! - [`churn_schedule`]: deterministic add/remove mix via a seeded LCG
//! - [`run_churn`]: replay a schedule against a [`SlotMap`]
//! - [`populated`]: a map with a given live count and freed holes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_arena::ArenaConfig;
use strata_slotmap::{Handle, SlotMap, SlotMapError};

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnOp {
    /// Add a value.
    Add(u64),
    /// Remove the live handle at this position (modulo the live count).
    Remove(usize),
}

/// Knuth MMIX LCG. Good enough to scatter removals; not for statistics.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }
}

/// Generate `len` churn steps. Roughly `add_percent` of steps are adds.
pub fn churn_schedule(len: usize, add_percent: u64, seed: u64) -> Vec<ChurnOp> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| {
            let roll = rng.next_u64();
            if (roll >> 33) % 100 < add_percent {
                ChurnOp::Add(roll)
            } else {
                ChurnOp::Remove((roll >> 17) as usize)
            }
        })
        .collect()
}

/// Replay `schedule` against `map`, tracking live handles in `live`.
///
/// Removes against an empty `live` set are skipped. Returns the number of
/// operations applied; the first failing add or remove stops the replay.
pub fn run_churn(
    map: &mut SlotMap<u64>,
    live: &mut Vec<Handle<u64>>,
    schedule: &[ChurnOp],
) -> Result<usize, SlotMapError> {
    let mut applied = 0;
    for op in schedule {
        match *op {
            ChurnOp::Add(value) => live.push(map.add(value)?),
            ChurnOp::Remove(pick) => {
                if live.is_empty() {
                    continue;
                }
                let h = live.swap_remove(pick % live.len());
                map.remove(h)?;
            }
        }
        applied += 1;
    }
    Ok(applied)
}

/// A map holding `live` values with every `hole_every`-th slot freed.
/// A `hole_every` below 2 leaves no holes.
///
/// Returns the map and the handles still live.
pub fn populated(
    live: usize,
    hole_every: usize,
    page_capacity: usize,
) -> (SlotMap<u64>, Vec<Handle<u64>>) {
    let config = ArenaConfig::new(page_capacity);
    let mut map = SlotMap::with_config(config).unwrap();
    let mut handles = Vec::with_capacity(live);
    let mut holes = Vec::new();
    let mut i = 0u64;
    while handles.len() < live {
        let h = map.add(i).unwrap();
        if hole_every > 1 && i as usize % hole_every == hole_every - 1 {
            holes.push(h);
        } else {
            handles.push(h);
        }
        i += 1;
    }
    for h in holes {
        map.remove(h).unwrap();
    }
    (map, handles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_deterministic() {
        assert_eq!(churn_schedule(500, 60, 42), churn_schedule(500, 60, 42));
        assert_ne!(churn_schedule(500, 60, 42), churn_schedule(500, 60, 43));
    }

    #[test]
    fn schedule_respects_add_share_roughly() {
        let adds = churn_schedule(10_000, 70, 7)
            .iter()
            .filter(|op| matches!(op, ChurnOp::Add(_)))
            .count();
        assert!((6_500..7_500).contains(&adds), "adds = {adds}");
    }

    #[test]
    fn churn_keeps_map_and_handles_in_step() {
        let mut map = SlotMap::with_config(ArenaConfig::new(64)).unwrap();
        let mut live = Vec::new();
        run_churn(&mut map, &mut live, &churn_schedule(2_000, 55, 9)).unwrap();
        assert_eq!(map.len(), live.len());
        assert!(live.iter().all(|&h| map.contains(h)));
    }

    #[test]
    fn churn_surfaces_add_failures() {
        let config = ArenaConfig::new(4).with_max_pages(1);
        let mut map = SlotMap::with_config(config).unwrap();
        let mut live = Vec::new();
        let adds = vec![ChurnOp::Add(0); 5];
        let err = run_churn(&mut map, &mut live, &adds).unwrap_err();
        assert!(matches!(err, SlotMapError::Arena(_)));
        assert_eq!(live.len(), 4);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn populated_has_requested_live_count() {
        let (map, handles) = populated(100, 4, 16);
        assert_eq!(map.len(), 100);
        assert_eq!(handles.len(), 100);
        assert_eq!(map.free_count(), 33);
        assert_eq!(map.capacity(), 133);
    }
}
