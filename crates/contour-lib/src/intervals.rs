use crate::error::{ContourError, Result};
use crate::signal::Interval;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tie-break rule for points lying exactly on an interval boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// `start <= t < end`: a boundary point belongs to the interval starting there.
    #[default]
    LeftClosedRightOpen,
    /// `start < t <= end`: a boundary point belongs to the interval ending there.
    LeftOpenRightClosed,
    /// `start <= t <= end`: a boundary point is duplicated into both neighbours.
    Closed,
}

impl BoundaryPolicy {
    pub fn contains(&self, interval: &Interval, t: f64) -> bool {
        match self {
            BoundaryPolicy::LeftClosedRightOpen => interval.start_time <= t && t < interval.end_time,
            BoundaryPolicy::LeftOpenRightClosed => interval.start_time < t && t <= interval.end_time,
            BoundaryPolicy::Closed => interval.start_time <= t && t <= interval.end_time,
        }
    }
}

/// Per-group interval tables, validated and ordered by `interval_index`.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    groups: BTreeMap<String, Vec<Interval>>,
}

impl IntervalIndex {
    /// Build the index, rejecting inverted bounds, overlaps and repeated indices.
    pub fn new(intervals: &[Interval]) -> Result<Self> {
        let mut groups: BTreeMap<String, Vec<Interval>> = BTreeMap::new();
        for interval in intervals {
            if !(interval.start_time < interval.end_time) {
                return Err(malformed(
                    interval,
                    format!(
                        "start_time {} must be before end_time {}",
                        interval.start_time, interval.end_time
                    ),
                ));
            }
            groups
                .entry(interval.group_id.clone())
                .or_default()
                .push(interval.clone());
        }
        for table in groups.values_mut() {
            table.sort_by_key(|interval| interval.interval_index);
            for pair in table.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                if prev.interval_index == next.interval_index {
                    return Err(malformed(next, "interval_index is repeated".into()));
                }
                if next.start_time < prev.start_time {
                    return Err(malformed(
                        next,
                        format!(
                            "out of order: starts at {}, before interval {} which starts at {}",
                            next.start_time, prev.interval_index, prev.start_time
                        ),
                    ));
                }
                if next.start_time < prev.end_time {
                    return Err(malformed(
                        next,
                        format!(
                            "overlaps interval {} ({} < {})",
                            prev.interval_index, next.start_time, prev.end_time
                        ),
                    ));
                }
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn intervals(&self, group_id: &str) -> &[Interval] {
        self.groups.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of intervals across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Intervals of `group_id` containing `t` under `policy`.
    ///
    /// Empty when the point falls outside every interval (or the group is
    /// unknown). The half-open policies return at most one interval; `Closed`
    /// returns two for a point on a shared boundary.
    pub fn lookup(&self, group_id: &str, t: f64, policy: BoundaryPolicy) -> Vec<&Interval> {
        let table = self.intervals(group_id);
        if table.is_empty() || t.is_nan() {
            return Vec::new();
        }
        // Starts and ends are both non-decreasing once overlaps are ruled out,
        // so the candidates form a contiguous run found by two binary searches.
        let first = table.partition_point(|interval| interval.end_time < t);
        let last = table.partition_point(|interval| interval.start_time <= t);
        table[first..last.max(first)]
            .iter()
            .filter(|interval| policy.contains(interval, t))
            .collect()
    }
}

fn malformed(interval: &Interval, reason: String) -> ContourError {
    ContourError::MalformedInterval {
        group_id: interval.group_id.clone(),
        interval_index: interval.interval_index,
        reason,
    }
}
