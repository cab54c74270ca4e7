use crate::error::{ContourError, Result};
use crate::signal::{LabeledPoint, ResampledPoint};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of output pulses requested per interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "crate::config::PulseSection",
    into = "crate::config::PulseSection"
)]
pub enum PulseCounts {
    /// Same count for every interval.
    Uniform(usize),
    /// Keyed by `interval_index`.
    PerInterval(BTreeMap<usize, usize>),
    /// Keyed by interval label.
    PerLabel(BTreeMap<String, usize>),
}

impl Default for PulseCounts {
    fn default() -> Self {
        PulseCounts::Uniform(10)
    }
}

impl PulseCounts {
    /// Reject any configured count below 1, including counts for intervals
    /// that end up with no labeled points.
    pub fn validate(&self) -> Result<()> {
        let invalid = |interval_index, label| ContourError::InvalidCount {
            group_id: None,
            interval_index,
            label,
            count: 0,
        };
        match self {
            PulseCounts::Uniform(0) => Err(invalid(None, None)),
            PulseCounts::Uniform(_) => Ok(()),
            PulseCounts::PerInterval(map) => match map.iter().find(|&(_, &n)| n == 0) {
                Some((&index, _)) => Err(invalid(Some(index), None)),
                None => Ok(()),
            },
            PulseCounts::PerLabel(map) => match map.iter().find(|&(_, &n)| n == 0) {
                Some((label, _)) => Err(invalid(None, Some(label.clone()))),
                None => Ok(()),
            },
        }
    }

    fn count_for(&self, group_id: &str, interval_index: usize, label: &str) -> Result<usize> {
        let count = match self {
            PulseCounts::Uniform(n) => Some(*n),
            PulseCounts::PerInterval(map) => map.get(&interval_index).copied(),
            PulseCounts::PerLabel(map) => map.get(label).copied(),
        };
        match count {
            Some(n) => Ok(n),
            None => Err(ContourError::MissingCount {
                group_id: group_id.to_string(),
                interval_index,
                label: label.to_string(),
            }),
        }
    }
}

/// Per-partition digest of resampled output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub group_id: String,
    pub interval_index: usize,
    pub label: String,
    pub count: usize,
    pub min_value: f64,
    pub max_value: f64,
}

struct Partition<'a> {
    points: Vec<&'a LabeledPoint>,
    pulses: usize,
}

/// Resample every (group, interval) partition to its requested number of
/// evenly spaced pulses, interpolating linearly between the original points.
///
/// The first and last pulses coincide exactly with the first and last
/// original points; nothing is extrapolated. Output is ordered by group,
/// interval index, then ascending position. All partitions are validated
/// before any is resampled.
pub fn resample(labeled: &[LabeledPoint], pulses_per_section: &PulseCounts) -> Result<Vec<ResampledPoint>> {
    pulses_per_section
        .validate()
        .map_err(|err| locate_invalid_count(err, labeled))?;

    let mut grouped: BTreeMap<(&str, usize), Vec<&LabeledPoint>> = BTreeMap::new();
    for point in labeled {
        grouped
            .entry((point.group_id.as_str(), point.interval_index))
            .or_default()
            .push(point);
    }

    let mut partitions = Vec::with_capacity(grouped.len());
    for ((group_id, interval_index), mut points) in grouped {
        let pulses = pulses_per_section.count_for(group_id, interval_index, &points[0].label)?;
        if points.len() < 2 {
            return Err(ContourError::InsufficientPoints {
                group_id: group_id.to_string(),
                interval_index,
                found: points.len(),
            });
        }
        points.sort_by(|a, b| a.position.total_cmp(&b.position));
        partitions.push(Partition { points, pulses });
    }

    let resampled: Vec<Vec<ResampledPoint>> = partitions
        .par_iter()
        .map(|partition| resample_partition(&partition.points, partition.pulses))
        .collect();
    Ok(resampled.into_iter().flatten().collect())
}

/// Fill in the first partition, in output order, that an invalid count applies to.
fn locate_invalid_count(err: ContourError, labeled: &[LabeledPoint]) -> ContourError {
    let ContourError::InvalidCount {
        interval_index,
        label,
        count,
        ..
    } = err
    else {
        return err;
    };
    let owner = labeled
        .iter()
        .filter(|p| interval_index.map_or(true, |index| p.interval_index == index))
        .filter(|p| label.as_deref().map_or(true, |l| p.label == l))
        .min_by(|a, b| (a.group_id.as_str(), a.interval_index).cmp(&(b.group_id.as_str(), b.interval_index)));
    match owner {
        Some(p) => ContourError::InvalidCount {
            group_id: Some(p.group_id.clone()),
            interval_index: Some(p.interval_index),
            label: Some(p.label.clone()),
            count,
        },
        None => ContourError::InvalidCount {
            group_id: None,
            interval_index,
            label,
            count,
        },
    }
}

fn resample_partition(points: &[&LabeledPoint], pulses: usize) -> Vec<ResampledPoint> {
    let first = points[0];
    let last = points[points.len() - 1];
    if pulses == 1 {
        return vec![pulse(first, first.position, first.timestamp, first.value)];
    }

    let span = last.position - first.position;
    let raw_span = last.timestamp - first.timestamp;
    let steps = (pulses - 1) as f64;
    let mut out = Vec::with_capacity(pulses);
    let mut cursor = 0usize;
    for j in 0..pulses {
        if j == 0 {
            out.push(pulse(first, first.position, first.timestamp, first.value));
            continue;
        }
        if j == pulses - 1 {
            out.push(pulse(first, last.position, last.timestamp, last.value));
            continue;
        }
        let frac = j as f64 / steps;
        let position = first.position + frac * span;
        let timestamp = first.timestamp + frac * raw_span;
        let value = interpolate(points, position, &mut cursor);
        out.push(pulse(first, position, timestamp, value));
    }
    out
}

/// Linear interpolation at `position`; `cursor` only moves forward since
/// pulses are generated in ascending order.
fn interpolate(points: &[&LabeledPoint], position: f64, cursor: &mut usize) -> f64 {
    let last = points.len() - 1;
    while *cursor + 1 < last && points[*cursor + 1].position < position {
        *cursor += 1;
    }
    let lo = points[*cursor];
    let hi = points[*cursor + 1];
    if position == lo.position {
        return lo.value;
    }
    if position == hi.position {
        return hi.value;
    }
    let width = hi.position - lo.position;
    if width <= 0.0 {
        return lo.value;
    }
    lo.value + (hi.value - lo.value) * (position - lo.position) / width
}

fn pulse(owner: &LabeledPoint, position: f64, timestamp: f64, value: f64) -> ResampledPoint {
    ResampledPoint {
        group_id: owner.group_id.clone(),
        interval_index: owner.interval_index,
        label: owner.label.clone(),
        position,
        timestamp,
        value,
    }
}

/// Count and value range of each (group, interval) partition, in output order.
pub fn summarize(resampled: &[ResampledPoint]) -> Vec<PartitionSummary> {
    let mut summaries: BTreeMap<(&str, usize), PartitionSummary> = BTreeMap::new();
    for sample in resampled {
        summaries
            .entry((sample.group_id.as_str(), sample.interval_index))
            .and_modify(|s| {
                s.count += 1;
                s.min_value = s.min_value.min(sample.value);
                s.max_value = s.max_value.max(sample.value);
            })
            .or_insert_with(|| PartitionSummary {
                group_id: sample.group_id.clone(),
                interval_index: sample.interval_index,
                label: sample.label.clone(),
                count: 1,
                min_value: sample.value,
                max_value: sample.value,
            });
    }
    summaries.into_values().collect()
}
