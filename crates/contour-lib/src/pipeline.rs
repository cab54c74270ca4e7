use crate::{
    config::PipelineConfig,
    error::Result,
    intervals::IntervalIndex,
    labeling::label,
    normalize::normalize,
    overlap::resolve,
    resample::resample,
    signal::{Interval, Point, ResampledPoint},
};
use log::{info, warn};

/// Label, optionally normalize, resample, and optionally resolve boundary duplicates.
///
/// Resolution runs on the resampled output, so with `keep` set every interval
/// after the first loses the pulse it shares with its predecessor (or the
/// predecessor loses it, for `Keep::Right`).
pub fn run_pipeline(
    points: &[Point],
    intervals: &[Interval],
    cfg: &PipelineConfig,
) -> Result<Vec<ResampledPoint>> {
    let index = IntervalIndex::new(intervals)?;
    if index.is_empty() && !points.is_empty() {
        warn!("no intervals supplied; all {} points will be dropped", points.len());
    }
    let labeled = label(points, &index, cfg.boundary_policy);
    info!(
        "labeled {} of {} points into {} intervals",
        labeled.len(),
        points.len(),
        index.len()
    );
    let labeled = if cfg.normalize_time {
        normalize(&labeled)?
    } else {
        labeled
    };
    let resampled = resample(&labeled, &cfg.pulses_per_section)?;
    info!("resampled to {} pulses", resampled.len());
    Ok(match cfg.keep {
        Some(keep) => {
            let resolved = resolve(&resampled, keep);
            info!("{} pulses after boundary resolution", resolved.len());
            resolved
        }
        None => resampled,
    })
}
