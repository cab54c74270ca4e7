use crate::error::Result;
use crate::intervals::IntervalIndex;
pub use crate::intervals::BoundaryPolicy;
use crate::signal::{Interval, LabeledPoint, Point};
use log::debug;

/// Assign every point to the interval(s) of its group containing it.
///
/// Input order is preserved. Points outside all intervals of their group are
/// dropped, the same as a join with no match.
pub fn label(points: &[Point], index: &IntervalIndex, policy: BoundaryPolicy) -> Vec<LabeledPoint> {
    let mut out = Vec::with_capacity(points.len());
    let mut unmatched = 0usize;
    for point in points {
        let hits = index.lookup(&point.group_id, point.timestamp, policy);
        if hits.is_empty() {
            unmatched += 1;
            continue;
        }
        out.extend(hits.into_iter().map(|interval| LabeledPoint::from_point(point, interval)));
    }
    if unmatched > 0 {
        debug!(
            "dropped {} of {} points outside every interval ({:?})",
            unmatched,
            points.len(),
            policy
        );
    }
    out
}

/// Build the interval index and label in one call.
pub fn label_points(
    points: &[Point],
    intervals: &[Interval],
    policy: BoundaryPolicy,
) -> Result<Vec<LabeledPoint>> {
    let index = IntervalIndex::new(intervals)?;
    Ok(label(points, &index, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn intervals() -> Vec<Interval> {
        vec![
            Interval::new("rec", 1, "a", 0.0, 1.0),
            Interval::new("rec", 2, "b", 1.0, 1.4),
            Interval::new("rec", 3, "c", 1.4, 2.0),
        ]
    }

    #[test]
    fn boundary_point_follows_policy() {
        let points = vec![Point::new("rec", 1.0, 110.0)];
        let lcro = label_points(&points, &intervals(), BoundaryPolicy::LeftClosedRightOpen).unwrap();
        assert_eq!(lcro.len(), 1);
        assert_eq!(lcro[0].interval_index, 2);
        let locr = label_points(&points, &intervals(), BoundaryPolicy::LeftOpenRightClosed).unwrap();
        assert_eq!(locr.len(), 1);
        assert_eq!(locr[0].interval_index, 1);
    }

    #[test]
    fn closed_policy_duplicates_shared_boundaries() {
        let points = vec![Point::new("rec", 0.0, 90.0), Point::new("rec", 1.4, 70.0)];
        let labeled = label_points(&points, &intervals(), BoundaryPolicy::Closed).unwrap();
        let assigned: Vec<_> = labeled.iter().map(|p| (p.timestamp, p.interval_index)).collect();
        assert_eq!(assigned, [(0.0, 1), (1.4, 2), (1.4, 3)]);
    }

    #[test]
    fn drops_points_outside_intervals_and_unknown_groups() {
        let points = vec![
            Point::new("rec", -0.5, 1.0),
            Point::new("rec", 0.5, 2.0),
            Point::new("rec", 2.0, 3.0),
            Point::new("other", 0.5, 4.0),
        ];
        let labeled = label_points(&points, &intervals(), BoundaryPolicy::default()).unwrap();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].value, 2.0);
        assert_eq!(labeled[0].label, "a");
        assert_eq!(labeled[0].interval_start, 0.0);
        assert_eq!(labeled[0].interval_end, 1.0);
    }

    #[test]
    fn keeps_input_order_across_groups() {
        let mut all = intervals();
        all.push(Interval::new("rec2", 1, "x", 0.0, 5.0));
        let points = vec![
            Point::new("rec2", 3.0, 1.0),
            Point::new("rec", 1.5, 2.0),
            Point::new("rec2", 0.1, 3.0),
        ];
        let labeled = label_points(&points, &all, BoundaryPolicy::default()).unwrap();
        let values: Vec<_> = labeled.iter().map(|p| p.value).collect();
        assert_eq!(values, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn malformed_intervals_fail_before_labeling() {
        let bad = vec![Interval::new("rec", 1, "a", 2.0, 1.0)];
        assert!(label_points(&[Point::new("rec", 1.5, 0.0)], &bad, BoundaryPolicy::default()).is_err());
    }

    #[test]
    fn random_points_land_in_exactly_one_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bounds = vec![0.0];
        for _ in 0..12 {
            let last = *bounds.last().unwrap();
            bounds.push(last + rng.gen_range(0.05..0.5));
        }
        let table: Vec<Interval> = bounds
            .windows(2)
            .enumerate()
            .map(|(i, w)| Interval::new("rec", i + 1, format!("s{}", i + 1), w[0], w[1]))
            .collect();
        let span_end = *bounds.last().unwrap();
        let mut points: Vec<Point> = (0..500)
            .map(|_| Point::new("rec", rng.gen_range(0.0..span_end), rng.gen_range(50.0..300.0)))
            .collect();
        // exact boundary hits are the interesting case
        points.extend(bounds[..bounds.len() - 1].iter().map(|&b| Point::new("rec", b, 100.0)));
        let index = IntervalIndex::new(&table).unwrap();
        for policy in [BoundaryPolicy::LeftClosedRightOpen, BoundaryPolicy::LeftOpenRightClosed] {
            let labeled = label(&points, &index, policy);
            let inside = points
                .iter()
                .filter(|p| match policy {
                    BoundaryPolicy::LeftOpenRightClosed => p.timestamp > 0.0,
                    _ => true,
                })
                .count();
            assert_eq!(labeled.len(), inside, "{:?}", policy);
            for p in &labeled {
                assert!(policy.contains(&table[p.interval_index - 1], p.timestamp));
            }
        }
    }
}
