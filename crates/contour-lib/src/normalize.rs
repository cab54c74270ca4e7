use crate::error::{ContourError, Result};
use crate::signal::LabeledPoint;

/// Rescale each point's position to `[0, 1]` within its interval.
///
/// `position = (timestamp - interval_start) / (interval_end - interval_start)`.
/// The raw `timestamp` is kept untouched.
pub fn normalize(labeled: &[LabeledPoint]) -> Result<Vec<LabeledPoint>> {
    if let Some(bad) = labeled.iter().find(|p| !has_positive_span(p)) {
        return Err(ContourError::DegenerateInterval {
            group_id: bad.group_id.clone(),
            interval_index: bad.interval_index,
        });
    }
    Ok(labeled
        .iter()
        .map(|p| LabeledPoint {
            position: (p.timestamp - p.interval_start) / (p.interval_end - p.interval_start),
            ..p.clone()
        })
        .collect())
}

fn has_positive_span(p: &LabeledPoint) -> bool {
    let span = p.interval_end - p.interval_start;
    span.is_finite() && span > 0.0
}
