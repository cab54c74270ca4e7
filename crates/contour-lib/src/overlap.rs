use crate::signal::IntervalSample;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Which copy of a duplicated boundary record survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keep {
    /// Keep the copy of the interval ending at the boundary.
    Left,
    /// Keep the copy of the interval starting at the boundary.
    Right,
}

/// Remove records duplicated across the shared boundary of consecutive intervals.
///
/// For each group, the interval indices present are scanned in ascending
/// order. A record of interval `i+1` whose raw timestamp also occurs in
/// interval `i` is a duplicate. `Keep::Left` drops it from `i+1` and
/// `Keep::Right` drops the matching records of `i`. Input order is preserved.
///
/// Each resolved boundary lowers one interval's count by one; callers that
/// need exact per-interval counts must request one more pulse there.
pub fn resolve<T>(records: &[T], keep: Keep) -> Vec<T>
where
    T: IntervalSample + Clone,
{
    // group -> interval -> record positions
    let mut partitions: BTreeMap<&str, BTreeMap<usize, Vec<usize>>> = BTreeMap::new();
    for (pos, record) in records.iter().enumerate() {
        partitions
            .entry(record.group_id())
            .or_default()
            .entry(record.interval_index())
            .or_default()
            .push(pos);
    }

    let mut dropped: HashSet<usize> = HashSet::new();
    for intervals in partitions.values() {
        let ordered: Vec<&Vec<usize>> = intervals.values().collect();
        for pair in ordered.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let left_times: HashSet<u64> = left
                .iter()
                .map(|&pos| time_key(records[pos].timestamp()))
                .collect();
            let right_times: HashSet<u64> = right
                .iter()
                .map(|&pos| time_key(records[pos].timestamp()))
                .collect();
            match keep {
                Keep::Left => dropped.extend(
                    right
                        .iter()
                        .filter(|&&pos| left_times.contains(&time_key(records[pos].timestamp()))),
                ),
                Keep::Right => dropped.extend(
                    left.iter()
                        .filter(|&&pos| right_times.contains(&time_key(records[pos].timestamp()))),
                ),
            }
        }
    }

    if !dropped.is_empty() {
        debug!(
            "resolved {} duplicated boundary record(s) keeping {:?}",
            dropped.len(),
            keep
        );
    }
    records
        .iter()
        .enumerate()
        .filter(|(pos, _)| !dropped.contains(pos))
        .map(|(_, record)| record.clone())
        .collect()
}

// Exact equality on timestamps, with -0.0 folded onto 0.0.
fn time_key(t: f64) -> u64 {
    if t == 0.0 {
        0f64.to_bits()
    } else {
        t.to_bits()
    }
}
