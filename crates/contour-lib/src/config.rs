use crate::intervals::BoundaryPolicy;
use crate::overlap::Keep;
use crate::resample::PulseCounts;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Named options for the labeling and resampling pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub boundary_policy: BoundaryPolicy,
    /// Resolve duplicated boundary pulses after resampling.
    pub keep: Option<Keep>,
    /// Resample on the per-interval [0, 1] axis instead of raw time.
    pub normalize_time: bool,
    pub pulses_per_section: PulseCounts,
}

/// On-disk shape of [`PulseCounts`]. TOML table keys are always strings, so
/// interval indices are parsed on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseSection {
    Uniform(usize),
    PerInterval(BTreeMap<String, usize>),
    PerLabel(BTreeMap<String, usize>),
}

impl TryFrom<PulseSection> for PulseCounts {
    type Error = String;

    fn try_from(section: PulseSection) -> std::result::Result<Self, Self::Error> {
        match section {
            PulseSection::Uniform(n) => Ok(PulseCounts::Uniform(n)),
            PulseSection::PerInterval(map) => map
                .into_iter()
                .map(|(key, count)| {
                    key.trim()
                        .parse::<usize>()
                        .map(|index| (index, count))
                        .map_err(|_| format!("per_interval key '{}' is not an interval index", key))
                })
                .collect::<std::result::Result<BTreeMap<_, _>, _>>()
                .map(PulseCounts::PerInterval),
            PulseSection::PerLabel(map) => Ok(PulseCounts::PerLabel(map)),
        }
    }
}

impl From<PulseCounts> for PulseSection {
    fn from(counts: PulseCounts) -> Self {
        match counts {
            PulseCounts::Uniform(n) => PulseSection::Uniform(n),
            PulseCounts::PerInterval(map) => PulseSection::PerInterval(
                map.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            ),
            PulseCounts::PerLabel(map) => PulseSection::PerLabel(map),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(contents).context("parsing pipeline config")?;
        Ok(config)
    }
}

pub fn read_config(path: &Path) -> Result<PipelineConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    PipelineConfig::from_toml_str(&contents).with_context(|| format!("parsing config {}", path.display()))
}

/// Parse `"1=15,2=14"` style per-interval counts.
pub fn parse_pulse_map(text: &str) -> Result<PulseCounts> {
    let mut map = BTreeMap::new();
    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (index, count) = entry
            .split_once('=')
            .with_context(|| format!("expected INDEX=COUNT, got '{}'", entry))?;
        let index: usize = index
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not an interval index", index.trim()))?;
        let count: usize = count
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a pulse count", count.trim()))?;
        map.insert(index, count);
    }
    if map.is_empty() {
        anyhow::bail!("no per-interval pulse counts found");
    }
    Ok(PulseCounts::PerInterval(map))
}
