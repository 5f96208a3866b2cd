//! The synchronization & lifting kernel (`spec.md` §4.F) — the heart of
//! the engine. Two temporal values are aligned onto a common,
//! piecewise-linear time partition, with analytically-computed crossing
//! points inserted wherever a lifted operator's extremum or sign change
//! would otherwise fall strictly inside a segment rather than on one of
//! the sampled instants. A pointwise operator is then evaluated exactly
//! at every point of that partition.
//!
//! Two concrete lifted operators are provided: [`lift_distance`], which
//! inserts the quadratic-minimum crossing so nearest-approach queries are
//! exact, and [`lift_equals`], which inserts the linear-root crossing so
//! a temporal equality predicate flips exactly where the two values
//! actually cross.

use chronogeo_types::point::GeomPoint;

use crate::geomops::point_distance;
use crate::temporal::instant::Instant;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::time::{Period, Timestamp};
use crate::value::BaseValue;

/// The overlapping period of two sequences, plus every original
/// breakpoint timestamp of either one that falls inside it. Within any
/// two consecutive timestamps of the result, both `a` and `b` are
/// guaranteed linear (or both constant, for `Step`), since every vertex
/// either one ever had is already a breakpoint.
fn merged_breakpoints<V: BaseValue, W: BaseValue>(
    a: &Sequence<V>,
    b: &Sequence<W>,
) -> Option<(Period, Vec<Timestamp>)> {
    let overlap = a.period().intersection(&b.period())?;

    let mut ts: Vec<Timestamp> = a
        .instants()
        .iter()
        .map(|i| i.timestamp())
        .chain(b.instants().iter().map(|i| i.timestamp()))
        .filter(|t| overlap.contains_timestamp(*t))
        .collect();
    ts.push(overlap.lower());
    ts.push(overlap.upper());
    ts.sort();
    ts.dedup();

    Some((overlap, ts))
}

/// The instant within `(t0, t1)` — exclusive on both ends — at which the
/// squared distance between two linearly-moving points is minimized.
/// `None` if the relative motion is constant (parallel tracks) or the
/// minimum falls at or outside the segment's own endpoints, in which
/// case the endpoints the partition already includes are sufficient.
///
/// Squared distance is quadratic in the interpolation fraction `s`:
/// writing the relative position as `D(s) = D0 + Dv*s`,
/// `|D(s)|^2 = |Dv|^2*s^2 + 2*(D0.Dv)*s + |D0|^2`, minimized at
/// `s = -(D0.Dv) / |Dv|^2`.
pub fn quadratic_min_crossing(
    t0: Timestamp,
    t1: Timestamp,
    pa0: &GeomPoint,
    pa1: &GeomPoint,
    pb0: &GeomPoint,
    pb1: &GeomPoint,
) -> Option<Timestamp> {
    let d0x = pa0.x() - pb0.x();
    let d0y = pa0.y() - pb0.y();
    let dvx = (pa1.x() - pa0.x()) - (pb1.x() - pb0.x());
    let dvy = (pa1.y() - pa0.y()) - (pb1.y() - pb0.y());

    let (d0z, dvz) = match (pa0.z(), pa1.z(), pb0.z(), pb1.z()) {
        (Some(za0), Some(za1), Some(zb0), Some(zb1)) => {
            (za0 - zb0, (za1 - za0) - (zb1 - zb0))
        }
        _ => (0.0, 0.0),
    };

    let a = dvx * dvx + dvy * dvy + dvz * dvz;
    if a.abs() < 1e-12 {
        return None;
    }
    let b = 2.0 * (d0x * dvx + d0y * dvy + d0z * dvz);
    let s = -b / (2.0 * a);

    if s > 1e-9 && s < 1.0 - 1e-9 {
        fraction_to_timestamp(t0, t1, s)
    } else {
        None
    }
}

/// The fraction within `(0, 1)` at which two linear scalar segments
/// cross, i.e. the root of `(a0 - b0) + ((a1 - a0) - (b1 - b0))*s = 0`.
/// `None` if the segments are parallel (including identically equal,
/// which the endpoints already capture) or cross at/outside the
/// segment's own bounds.
pub fn linear_equality_crossing(a0: f64, a1: f64, b0: f64, b1: f64) -> Option<f64> {
    let slope_diff = (a1 - a0) - (b1 - b0);
    if slope_diff.abs() < 1e-12 {
        return None;
    }
    let s = -(a0 - b0) / slope_diff;
    (s > 1e-9 && s < 1.0 - 1e-9).then_some(s)
}

pub(crate) fn fraction_to_timestamp(t0: Timestamp, t1: Timestamp, s: f64) -> Option<Timestamp> {
    let span = t1.as_micros() - t0.as_micros();
    let offset = (span as f64 * s).round() as i64;
    t0.checked_add_micros(offset)
}

/// Lifts Euclidean distance across two moving points, synchronized onto
/// their common period with the quadratic-minimum crossing inserted —
/// the operator `spec.md` calls "the heart" of the engine, since
/// nearest-approach queries depend on it being exact rather than a
/// piecewise-linear approximation of the true (non-linear) distance
/// curve.
pub fn lift_distance(a: &Sequence<GeomPoint>, b: &Sequence<GeomPoint>) -> Option<Sequence<f64>> {
    let (overlap, mut ts) = merged_breakpoints(a, b)?;

    if matches!(a.interpolation(), Interpolation::Linear) && matches!(b.interpolation(), Interpolation::Linear) {
        let mut extra = Vec::new();
        for w in ts.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let (pa0, pa1) = (a.value_at(t0)?, a.value_at(t1)?);
            let (pb0, pb1) = (b.value_at(t0)?, b.value_at(t1)?);
            if let Some(tc) = quadratic_min_crossing(t0, t1, &pa0, &pa1, &pb0, &pb1) {
                extra.push(tc);
            }
        }
        ts.extend(extra);
        ts.sort();
        ts.dedup();
    }

    let instants = ts
        .iter()
        .map(|&t| {
            let pa = a.value_at(t)?;
            let pb = b.value_at(t)?;
            Some(Instant::new(point_distance(&pa, &pb), t))
        })
        .collect::<Option<Vec<_>>>()?;

    Sequence::new(instants, overlap.lower_inc(), overlap.upper_inc(), Interpolation::Linear).ok()
}

/// Lifts value equality across two temporal floats, synchronized with
/// the linear-root crossing inserted so the result flips exactly where
/// the two values actually cross rather than one sample later.
pub fn lift_equals(a: &Sequence<f64>, b: &Sequence<f64>) -> Option<Sequence<i64>> {
    let (overlap, mut ts) = merged_breakpoints(a, b)?;

    if matches!(a.interpolation(), Interpolation::Linear) && matches!(b.interpolation(), Interpolation::Linear) {
        let mut extra = Vec::new();
        for w in ts.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let (a0, a1) = (a.value_at(t0)?, a.value_at(t1)?);
            let (b0, b1) = (b.value_at(t0)?, b.value_at(t1)?);
            if let Some(s) = linear_equality_crossing(a0, a1, b0, b1) {
                if let Some(tc) = fraction_to_timestamp(t0, t1, s) {
                    // `Step` interpolation holds a value from the instant it
                    // starts at; equality between two distinct linear
                    // functions holds for a single instant, so an immediate
                    // follow-up instant one microsecond later is needed to
                    // make the held value revert to unequal right after the
                    // crossing.
                    extra.push(tc);
                    if let Some(after) = tc.checked_add_micros(1) {
                        if after < t1 {
                            extra.push(after);
                        }
                    }
                }
            }
        }
        ts.extend(extra);
        ts.sort();
        ts.dedup();
    }

    let instants = ts
        .iter()
        .map(|&t| {
            let va = a.value_at(t)?;
            let vb = b.value_at(t)?;
            Some(Instant::new(if va.approx_eq(&vb) { 1i64 } else { 0 }, t))
        })
        .collect::<Option<Vec<_>>>()?;

    Sequence::new(instants, overlap.lower_inc(), overlap.upper_inc(), Interpolation::Step).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_seq(points: &[(f64, f64, i64)]) -> Sequence<GeomPoint> {
        let instants = points
            .iter()
            .map(|(x, y, t)| Instant::new(GeomPoint::new_2d(*x, *y, 0), Timestamp::from_micros(*t)))
            .collect();
        Sequence::new(instants, true, true, Interpolation::Linear).unwrap()
    }

    fn float_seq(points: &[(f64, i64)]) -> Sequence<f64> {
        let instants = points
            .iter()
            .map(|(v, t)| Instant::new(*v, Timestamp::from_micros(*t)))
            .collect();
        Sequence::new(instants, true, true, Interpolation::Linear).unwrap()
    }

    #[test]
    fn lift_distance_finds_interior_minimum() {
        // a moves from (0,0) to (10,0); b stays fixed at (5,5).
        // nearest approach is at t=5 (x=5), distance 5.
        let a = point_seq(&[(0.0, 0.0, 0), (10.0, 0.0, 10)]);
        let b = point_seq(&[(5.0, 5.0, 0), (5.0, 5.0, 10)]);
        let d = lift_distance(&a, &b).unwrap();
        let min = d.values().into_iter().copied().reduce(f64::min).unwrap();
        assert!((min - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lift_equals_flips_at_crossing() {
        // a: 0 -> 10 over [0,10]; b constant 5. They cross at t=5.
        let a = float_seq(&[(0.0, 0), (10.0, 10)]);
        let b = float_seq(&[(5.0, 0), (5.0, 10)]);
        let eq = lift_equals(&a, &b).unwrap();
        assert_eq!(eq.value_at(Timestamp::from_micros(5)), Some(1));
        assert_eq!(eq.value_at(Timestamp::from_micros(2)), Some(0));
        assert_eq!(eq.value_at(Timestamp::from_micros(8)), Some(0));
    }

    #[test]
    fn disjoint_periods_produce_no_lift() {
        let a = point_seq(&[(0.0, 0.0, 0), (1.0, 0.0, 10)]);
        let b = point_seq(&[(0.0, 0.0, 100), (1.0, 0.0, 110)]);
        assert!(lift_distance(&a, &b).is_none());
    }
}
