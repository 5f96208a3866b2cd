//! Trajectory and geometric operators over `Sequence<GeomPoint>`
//! (`spec.md` §4.I): trajectory projection, length, speed, azimuth,
//! time-weighted centroid, restriction to/minus a geometry, and
//! nearest-approach queries.
//!
//! `point_distance` generalizes the teacher's `distance_between`/
//! `DistanceMetric` (`src/spatial.rs`) from a metric chosen per call to
//! one chosen from the point's own `geodetic` flag, since a temporal
//! point's coordinate system doesn't change mid-trajectory.

use chronogeo_types::point::GeomPoint;
use geo::{Contains, Distance, Euclidean, Haversine};

use crate::sync::fraction_to_timestamp;
use crate::temporal::instant::Instant;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::temporal::sequence_set::SequenceSet;
use crate::time::Timestamp;

/// Distance between two points, in the unit implied by `a`'s coordinate
/// system: meters for geodetic (lon/lat) points via Haversine, planar
/// units via Euclidean otherwise. 3D points add the vertical delta with
/// a final `hypot`.
pub fn point_distance(a: &GeomPoint, b: &GeomPoint) -> f64 {
    let horizontal = if a.geodetic() {
        Haversine.distance(a.get_point2d(), b.get_point2d())
    } else {
        Euclidean.distance(a.get_point2d(), b.get_point2d())
    };
    match (a.z(), b.z()) {
        (Some(za), Some(zb)) => horizontal.hypot(za - zb),
        _ => horizontal,
    }
}

/// The sequence's cached trajectory (`spec.md` §4.I): a point if every
/// instant collapses to the same coordinates, otherwise the linestring
/// through the instants. Reads the field `Sequence::new` already
/// computed rather than recomputing it.
pub fn trajectory(seq: &Sequence<GeomPoint>) -> geo::Geometry<f64> {
    seq.trajectory()
        .cloned()
        .expect("a GeomPoint sequence always has spatial coordinates")
}

/// The trajectory of a whole `SequenceSet` (`spec.md` §4.I): the union of
/// its point-collapsed member trajectories (as a multipoint) with its
/// moving member trajectories (as a multilinestring). When both kinds are
/// present the result is their `GeometryCollection`, since `geo`'s
/// boolean-union algorithms operate on (multi)polygons, not on points and
/// linestrings.
pub fn trajectory_set(set: &crate::temporal::sequence_set::SequenceSet<GeomPoint>) -> geo::Geometry<f64> {
    let mut points = Vec::new();
    let mut lines = Vec::new();
    for seq in set.sequences() {
        match trajectory(seq) {
            geo::Geometry::Point(p) => points.push(p),
            geo::Geometry::LineString(ls) => lines.push(ls),
            other => unreachable!("Sequence::trajectory only ever returns Point or LineString: {other:?}"),
        }
    }

    match (points.is_empty(), lines.is_empty()) {
        (true, true) => geo::Geometry::GeometryCollection(geo::GeometryCollection(vec![])),
        (false, true) => geo::Geometry::MultiPoint(geo::MultiPoint::new(points)),
        (true, false) => geo::Geometry::MultiLineString(geo::MultiLineString::new(lines)),
        (false, false) => geo::Geometry::GeometryCollection(geo::GeometryCollection(vec![
            geo::Geometry::MultiPoint(geo::MultiPoint::new(points)),
            geo::Geometry::MultiLineString(geo::MultiLineString::new(lines)),
        ])),
    }
}

/// Total path length. `Step` sequences never move continuously between
/// instants, so their length is zero by convention.
pub fn length(seq: &Sequence<GeomPoint>) -> f64 {
    if !matches!(seq.interpolation(), Interpolation::Linear) {
        return 0.0;
    }
    seq.instants()
        .windows(2)
        .map(|w| point_distance(w[0].value(), w[1].value()))
        .sum()
}

/// Running total length at each instant, starting at zero.
pub fn cumulative_length(seq: &Sequence<GeomPoint>) -> Sequence<f64> {
    let insts = seq.instants();
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(insts.len());
    out.push(Instant::new(0.0, insts[0].timestamp()));
    for w in insts.windows(2) {
        if matches!(seq.interpolation(), Interpolation::Linear) {
            acc += point_distance(w[0].value(), w[1].value());
        }
        out.push(Instant::new(acc, w[1].timestamp()));
    }
    Sequence::new(out, seq.lower_inc(), seq.upper_inc(), Interpolation::Linear)
        .expect("a non-decreasing running total is always a valid sequence")
}

/// Per-segment speed, held constant (`Step`) across each segment and
/// carried onto the final instant. `None` for `Step` sequences or
/// single-instant sequences, where speed is undefined.
pub fn speed(seq: &Sequence<GeomPoint>) -> Option<Sequence<f64>> {
    if !matches!(seq.interpolation(), Interpolation::Linear) || seq.num_instants() < 2 {
        return None;
    }
    let insts = seq.instants();
    let mut out = Vec::with_capacity(insts.len());
    for w in insts.windows(2) {
        let dt_secs = (w[1].timestamp().as_micros() - w[0].timestamp().as_micros()) as f64 / 1e6;
        let v = if dt_secs > 0.0 {
            point_distance(w[0].value(), w[1].value()) / dt_secs
        } else {
            0.0
        };
        out.push(Instant::new(v, w[0].timestamp()));
    }
    let last_speed = *out[out.len() - 1].value();
    out.push(Instant::new(last_speed, insts[insts.len() - 1].timestamp()));
    Sequence::new(out, seq.lower_inc(), seq.upper_inc(), Interpolation::Step).ok()
}

/// Bearing from `from` to `to`, in radians clockwise from north
/// (the `ST_Azimuth` convention), normalized to `[0, 2*pi)`.
pub fn azimuth(from: &GeomPoint, to: &GeomPoint) -> f64 {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let az = dx.atan2(dy);
    if az < 0.0 {
        az + 2.0 * std::f64::consts::PI
    } else {
        az
    }
}

/// Time-weighted centroid: each segment's midpoint contributes in
/// proportion to its duration, so a trajectory that lingers somewhere
/// pulls the centroid there more than a pass-through segment would.
pub fn twcentroid(seq: &Sequence<GeomPoint>) -> Option<GeomPoint> {
    let insts = seq.instants();
    if insts.len() == 1 {
        return Some(insts[0].value().clone());
    }

    let mut weight_sum = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sz = 0.0;
    let mut all_have_z = true;

    for w in insts.windows(2) {
        let dt = (w[1].timestamp().as_micros() - w[0].timestamp().as_micros()) as f64;
        let (x0, y0, z0) = w[0].value().get_point3d();
        let (x1, y1, z1) = w[1].value().get_point3d();
        all_have_z = all_have_z && w[0].value().has_z() && w[1].value().has_z();
        sx += dt * (x0 + x1) / 2.0;
        sy += dt * (y0 + y1) / 2.0;
        sz += dt * (z0 + z1) / 2.0;
        weight_sum += dt;
    }

    if weight_sum == 0.0 {
        return None;
    }

    let first = insts[0].value();
    let (x, y) = (sx / weight_sum, sy / weight_sum);
    Some(if all_have_z {
        GeomPoint::new_3d(x, y, sz / weight_sum, first.srid()).with_geodetic(first.geodetic())
    } else {
        GeomPoint::new_2d(x, y, first.srid()).with_geodetic(first.geodetic())
    })
}

/// `true` for geometries with interior area, where "inside" is a
/// meaningful containment test; `false` for point/line geometries, which
/// a chord can only ever touch at an isolated crossing.
fn is_areal(geometry: &geo::Geometry<f64>) -> bool {
    matches!(geometry, geo::Geometry::Polygon(_) | geo::Geometry::MultiPolygon(_))
}

fn geometry_contains(geometry: &geo::Geometry<f64>, p: &geo::Point<f64>) -> bool {
    match geometry {
        geo::Geometry::Polygon(poly) => poly.contains(p),
        geo::Geometry::MultiPolygon(mp) => mp.contains(p),
        _ => false,
    }
}

/// Every edge of `geometry`'s boundary, as raw coordinate pairs: the
/// rings of a (multi)polygon, or the segments of a (multi)linestring.
fn boundary_segments(geometry: &geo::Geometry<f64>) -> Vec<((f64, f64), (f64, f64))> {
    let mut segs = Vec::new();
    let mut push_ring = |ring: &geo::LineString<f64>| {
        for w in ring.0.windows(2) {
            segs.push(((w[0].x, w[0].y), (w[1].x, w[1].y)));
        }
    };
    match geometry {
        geo::Geometry::LineString(ls) => push_ring(ls),
        geo::Geometry::MultiLineString(mls) => mls.0.iter().for_each(|ls| push_ring(ls)),
        geo::Geometry::Polygon(poly) => {
            push_ring(poly.exterior());
            poly.interiors().iter().for_each(|r| push_ring(r));
        }
        geo::Geometry::MultiPolygon(mp) => {
            for poly in &mp.0 {
                push_ring(poly.exterior());
                poly.interiors().iter().for_each(|r| push_ring(r));
            }
        }
        _ => {}
    }
    segs
}

/// Fraction `s` in `(0, 1)` at which chord `p0->p1` crosses segment
/// `q0->q1`, via Cramer's rule on the two segments' line equations.
/// `None` for parallel or non-intersecting segments.
fn chord_crossing_fraction(
    p0: (f64, f64),
    p1: (f64, f64),
    q0: (f64, f64),
    q1: (f64, f64),
) -> Option<f64> {
    let (dpx, dpy) = (p1.0 - p0.0, p1.1 - p0.1);
    let (dqx, dqy) = (q1.0 - q0.0, q1.1 - q0.1);
    let denom = dpx * dqy - dpy * dqx;
    if denom.abs() < 1e-12 {
        return None;
    }
    let (ex, ey) = (q0.0 - p0.0, q0.1 - p0.1);
    let s = (ex * dqy - ey * dqx) / denom;
    let u = (ex * dpy - ey * dpx) / denom;
    if s > 1e-9 && s < 1.0 - 1e-9 && u > -1e-9 && u < 1.0 + 1e-9 {
        Some(s)
    } else {
        None
    }
}

/// Whether `(px, py)` lies on segment `q0->q1` (used to catch a chord
/// endpoint that lands exactly on a boundary the midpoint-based interval
/// classification below never samples).
fn point_on_segment(px: f64, py: f64, q0: (f64, f64), q1: (f64, f64)) -> bool {
    let (dx, dy) = (q1.0 - q0.0, q1.1 - q0.1);
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-18 {
        return (px - q0.0).abs() < 1e-9 && (py - q0.1).abs() < 1e-9;
    }
    let t = ((px - q0.0) * dx + (py - q0.1) * dy) / len_sq;
    if !(-1e-9..=1.0 + 1e-9).contains(&t) {
        return false;
    }
    let (cx, cy) = (q0.0 + t * dx, q0.1 + t * dy);
    (px - cx).abs() < 1e-9 && (py - cy).abs() < 1e-9
}

fn flush_piece(
    current: &mut Vec<Instant<GeomPoint>>,
    seq: &Sequence<GeomPoint>,
) -> Sequence<GeomPoint> {
    let insts = std::mem::take(current);
    let lower_inc = insts[0].timestamp() != seq.start_timestamp() || seq.lower_inc();
    let last = insts.len() - 1;
    let upper_inc = insts[last].timestamp() != seq.end_timestamp() || seq.upper_inc();
    Sequence::new(insts, lower_inc, upper_inc, seq.interpolation())
        .expect("a run of already-sampled instants is always a valid sub-sequence")
}

/// Shared engine for [`at_geometry`]/[`minus_geometry`] (`spec.md` §4.I):
/// per chord, finds every crossing of `geometry`'s boundary, resamples
/// the sequence at those crossing timestamps (same technique as
/// [`crate::restrict::at_range`]'s boundary-crossing insertion), then
/// groups the refined segments by inside/outside. Areal geometries
/// (polygon/multipolygon) classify a segment by its midpoint's
/// containment; point/line geometries have no interior, so `at_geometry`
/// instead picks up each instant that lands exactly on the geometry as
/// an isolated `[t, t]` sub-sequence.
fn restrict_to_geometry(
    seq: &Sequence<GeomPoint>,
    geometry: &geo::Geometry<f64>,
    keep_inside: bool,
) -> Option<SequenceSet<GeomPoint>> {
    let segs = boundary_segments(geometry);
    let areal = is_areal(geometry);

    let mut ts: Vec<Timestamp> = seq.instants().iter().map(|i| i.timestamp()).collect();
    for w in seq.instants().windows(2) {
        let p0 = w[0].value().get_point2d();
        let p1 = w[1].value().get_point2d();
        for (q0, q1) in &segs {
            if let Some(s) = chord_crossing_fraction((p0.x(), p0.y()), (p1.x(), p1.y()), *q0, *q1) {
                if let Some(t) = fraction_to_timestamp(w[0].timestamp(), w[1].timestamp(), s) {
                    ts.push(t);
                }
            }
        }
    }
    ts.sort();
    ts.dedup();

    let refined: Vec<Instant<GeomPoint>> = ts
        .into_iter()
        .filter_map(|t| seq.value_at(t).map(|v| Instant::new(v, t)))
        .collect();

    if refined.len() < 2 {
        return None;
    }

    let mut pieces: Vec<Sequence<GeomPoint>> = Vec::new();
    let mut current: Vec<Instant<GeomPoint>> = Vec::new();

    for w in refined.windows(2) {
        let mid = w[0].value().interpolate(w[1].value(), 0.5);
        let inside = areal && geometry_contains(geometry, &mid.get_point2d());
        if inside == keep_inside {
            if current.is_empty() {
                current.push(w[0].clone());
            }
            current.push(w[1].clone());
        } else if !current.is_empty() {
            pieces.push(flush_piece(&mut current, seq));
        }
    }
    if !current.is_empty() {
        pieces.push(flush_piece(&mut current, seq));
    }

    if keep_inside && !areal {
        for inst in &refined {
            let p = inst.value().get_point2d();
            let on_boundary = segs.iter().any(|(q0, q1)| point_on_segment(p.x(), p.y(), *q0, *q1));
            if on_boundary {
                if let Ok(singleton) = Sequence::new(vec![inst.clone()], true, true, seq.interpolation()) {
                    pieces.push(singleton);
                }
            }
        }
    }

    if pieces.is_empty() {
        None
    } else {
        SequenceSet::new(pieces).ok()
    }
}

/// Restriction to the portions of `seq` that lie within `geometry`
/// (`spec.md` §4.I). A `Linear` segment whose chord only crosses the
/// geometry's boundary between two samples gets the crossing instant
/// inserted first, reproducing e.g.
/// `atGeometry("[Point(0 0)@t1, Point(4 0)@t2]", "LINESTRING(2 -1, 2 1)")`
/// as the single-instant `[Point(2 0)@t]` where the chord actually meets
/// the line, not an empty result.
pub fn at_geometry(seq: &Sequence<GeomPoint>, geometry: &geo::Geometry<f64>) -> Option<SequenceSet<GeomPoint>> {
    restrict_to_geometry(seq, geometry, true)
}

/// The set-complement of [`at_geometry`].
pub fn minus_geometry(seq: &Sequence<GeomPoint>, geometry: &geo::Geometry<f64>) -> Option<SequenceSet<GeomPoint>> {
    restrict_to_geometry(seq, geometry, false)
}

/// The smallest distance ever achieved between the two moving points,
/// over the period they're both defined. Exact even when the true
/// minimum falls strictly inside a segment, because
/// [`crate::sync::lift_distance`] inserts the analytic crossing instant.
pub fn nearest_approach_distance(a: &Sequence<GeomPoint>, b: &Sequence<GeomPoint>) -> Option<f64> {
    let dist_seq = crate::sync::lift_distance(a, b)?;
    dist_seq.values().into_iter().copied().reduce(f64::min)
}

/// The instant at which the two moving points are nearest to each other.
pub fn nearest_approach_instant(a: &Sequence<GeomPoint>, b: &Sequence<GeomPoint>) -> Option<Timestamp> {
    let dist_seq = crate::sync::lift_distance(a, b)?;
    dist_seq
        .instants()
        .iter()
        .min_by(|x, y| x.value().partial_cmp(y.value()).unwrap_or(std::cmp::Ordering::Equal))
        .map(|i| i.timestamp())
}

/// The pair of positions realizing the nearest approach.
pub fn shortest_line(a: &Sequence<GeomPoint>, b: &Sequence<GeomPoint>) -> Option<(GeomPoint, GeomPoint)> {
    let t = nearest_approach_instant(a, b)?;
    Some((a.value_at(t)?, b.value_at(t)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::instant::Instant;

    fn pt_seq(points: &[(f64, f64, i64)]) -> Sequence<GeomPoint> {
        let instants = points
            .iter()
            .map(|(x, y, t)| Instant::new(GeomPoint::new_2d(*x, *y, 0), Timestamp::from_micros(*t)))
            .collect();
        Sequence::new(instants, true, true, Interpolation::Linear).unwrap()
    }

    #[test]
    fn trajectory_reads_the_cached_field() {
        let seq = pt_seq(&[(0.0, 0.0, 0), (1.0, 1.0, 10), (2.0, 0.0, 20)]);
        match trajectory(&seq) {
            geo::Geometry::LineString(ls) => assert_eq!(ls.0.len(), 3),
            other => panic!("expected a linestring, got {other:?}"),
        }
    }

    #[test]
    fn at_geometry_inserts_the_chord_crossing() {
        let day = 86_400_000_000i64;
        let seq = pt_seq(&[(0.0, 0.0, 0), (4.0, 0.0, 4 * day)]);
        let query = geo::Geometry::LineString(geo::LineString::from(vec![(2.0, -1.0), (2.0, 1.0)]));

        let restricted = at_geometry(&seq, &query).unwrap();
        assert_eq!(restricted.num_sequences(), 1);
        let hit = &restricted.sequences()[0];
        assert_eq!(hit.num_instants(), 1);
        assert_eq!(hit.start_timestamp(), Timestamp::from_micros(2 * day));
        let p = hit.instants()[0].value();
        assert!((p.x() - 2.0).abs() < 1e-9 && p.y().abs() < 1e-9);
    }

    #[test]
    fn at_geometry_polygon_keeps_the_interior_run() {
        let seq = pt_seq(&[(-5.0, 0.0, 0), (5.0, 0.0, 10)]);
        let square = geo::Polygon::new(
            geo::LineString::from(vec![(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0)]),
            vec![],
        );
        let query = geo::Geometry::Polygon(square);

        let restricted = at_geometry(&seq, &query).unwrap();
        assert_eq!(restricted.num_sequences(), 1);
        let hit = &restricted.sequences()[0];
        assert!(hit.value_at(Timestamp::from_micros(5)).unwrap().x().abs() < 1e-9);
    }

    #[test]
    fn length_sums_segment_distances() {
        let seq = pt_seq(&[(0.0, 0.0, 0), (3.0, 4.0, 10), (3.0, 4.0 + 0.0, 20)]);
        assert!((length(&seq) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn speed_is_distance_over_duration() {
        let seq = pt_seq(&[(0.0, 0.0, 0), (10.0, 0.0, 1_000_000)]);
        let s = speed(&seq).unwrap();
        assert!((*s.instants()[0].value() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn azimuth_points_east() {
        let from = GeomPoint::new_2d(0.0, 0.0, 0);
        let to = GeomPoint::new_2d(1.0, 0.0, 0);
        assert!((azimuth(&from, &to) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn twcentroid_weights_by_duration() {
        let seq = pt_seq(&[(0.0, 0.0, 0), (0.0, 0.0, 90), (10.0, 0.0, 100)]);
        let c = twcentroid(&seq).unwrap();
        assert!(c.x() < 5.0);
    }

    #[test]
    fn cumulative_length_is_monotone() {
        let seq = pt_seq(&[(0.0, 0.0, 0), (3.0, 4.0, 10), (3.0, 4.0 + 0.0, 20)]);
        let cum = cumulative_length(&seq);
        let values: Vec<f64> = cum.values().into_iter().copied().collect();
        assert!(values.windows(2).all(|w| w[1] >= w[0]));
        assert!((*values.last().unwrap() - 5.0).abs() < 1e-9);
    }
}
