use serde::{Deserialize, Serialize};

/// Labeled, bounded time span belonging to one group (e.g. a phone or syllable span of a recording).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub group_id: String,
    /// 1-based position of the interval within its group
    pub interval_index: usize,
    pub label: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Interval {
    pub fn new(
        group_id: impl Into<String>,
        interval_index: usize,
        label: impl Into<String>,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            interval_index,
            label: label.into(),
            start_time,
            end_time,
        }
    }
}

/// Timestamped scalar measurement (e.g. an f0 pulse in Hz).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub group_id: String,
    pub timestamp: f64,
    pub value: f64,
}

impl Point {
    pub fn new(group_id: impl Into<String>, timestamp: f64, value: f64) -> Self {
        Self {
            group_id: group_id.into(),
            timestamp,
            value,
        }
    }
}

/// A point after it has been assigned to the interval containing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub group_id: String,
    /// Raw time, never rewritten by later stages.
    pub timestamp: f64,
    /// Working time axis. Equal to `timestamp` until the point is normalized.
    pub position: f64,
    pub value: f64,
    pub interval_index: usize,
    pub label: String,
    pub interval_start: f64,
    pub interval_end: f64,
}

impl LabeledPoint {
    pub fn from_point(point: &Point, interval: &Interval) -> Self {
        Self {
            group_id: point.group_id.clone(),
            timestamp: point.timestamp,
            position: point.timestamp,
            value: point.value,
            interval_index: interval.interval_index,
            label: interval.label.clone(),
            interval_start: interval.start_time,
            interval_end: interval.end_time,
        }
    }
}

/// One synthetic, evenly spaced sample produced by the resampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledPoint {
    pub group_id: String,
    pub interval_index: usize,
    pub label: String,
    /// Position on the working axis (normalized or raw, depending on the upstream stages)
    pub position: f64,
    /// Raw time of the sample
    pub timestamp: f64,
    pub value: f64,
}

/// Records that belong to one (group, interval) partition and carry a raw timestamp.
pub trait IntervalSample {
    fn group_id(&self) -> &str;
    fn interval_index(&self) -> usize;
    fn timestamp(&self) -> f64;
}

impl IntervalSample for LabeledPoint {
    fn group_id(&self) -> &str {
        &self.group_id
    }
    fn interval_index(&self) -> usize {
        self.interval_index
    }
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

impl IntervalSample for ResampledPoint {
    fn group_id(&self) -> &str {
        &self.group_id
    }
    fn interval_index(&self) -> usize {
        self.interval_index
    }
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
