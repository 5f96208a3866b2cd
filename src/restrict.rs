//! Restriction & set algebra (`spec.md` §4.G): `at`/`minus` against a
//! value, a range, a timestamp, or a period, each preserving the normal
//! form of whatever they return. `at_range` inserts boundary-crossing
//! instants the same way [`crate::sync`] inserts operator crossings, so
//! a value that only grazes a range boundary between samples is still
//! clipped exactly there rather than one sample early or late.

use crate::sync::{fraction_to_timestamp, linear_equality_crossing};
use crate::temporal::instant::Instant;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::temporal::sequence_set::SequenceSet;
use crate::time::{Period, Range, Timestamp};
use crate::value::BaseValue;

/// Value at `t`, or `None` if `t` falls outside the sequence's period.
pub fn at_timestamp<V: BaseValue>(seq: &Sequence<V>, t: Timestamp) -> Option<V> {
    seq.value_at(t)
}

fn clip_to_period<V: BaseValue>(seq: &Sequence<V>, period: &Period) -> Option<Sequence<V>> {
    let overlap = seq.period().intersection(period)?;

    let mut instants: Vec<Instant<V>> = seq
        .instants()
        .iter()
        .filter(|i| overlap.contains_timestamp(i.timestamp()))
        .cloned()
        .collect();

    if instants.first().map(|i| i.timestamp()) != Some(overlap.lower()) {
        let v = seq.value_at(overlap.lower())?;
        instants.insert(0, Instant::new(v, overlap.lower()));
    }
    if instants.last().map(|i| i.timestamp()) != Some(overlap.upper()) {
        let v = seq.value_at(overlap.upper())?;
        instants.push(Instant::new(v, overlap.upper()));
    }

    Sequence::new(instants, overlap.lower_inc(), overlap.upper_inc(), seq.interpolation()).ok()
}

/// Restriction to the portion of `seq` that falls within `period`.
pub fn at_period<V: BaseValue>(seq: &Sequence<V>, period: &Period) -> Option<Sequence<V>> {
    clip_to_period(seq, period)
}

/// Restriction to the portion of `seq` that falls outside `period` —
/// up to two pieces (before and after), each re-clipped to `seq`'s own
/// bounds.
pub fn minus_period<V: BaseValue>(seq: &Sequence<V>, period: &Period) -> Option<SequenceSet<V>> {
    let own = seq.period();
    let mut pieces = Vec::new();

    let starts_before = own.lower() < period.lower()
        || (own.lower() == period.lower() && own.lower_inc() && !period.lower_inc());
    if starts_before {
        let upper = period.lower().min(own.upper());
        if let Ok(left) = Period::new(own.lower(), upper, own.lower_inc(), !period.lower_inc()) {
            if let Some(s) = clip_to_period(seq, &left) {
                pieces.push(s);
            }
        }
    }

    let ends_after = own.upper() > period.upper()
        || (own.upper() == period.upper() && own.upper_inc() && !period.upper_inc());
    if ends_after {
        let lower = period.upper().max(own.lower());
        if let Ok(right) = Period::new(lower, own.upper(), !period.upper_inc(), own.upper_inc()) {
            if let Some(s) = clip_to_period(seq, &right) {
                pieces.push(s);
            }
        }
    }

    if pieces.is_empty() {
        None
    } else {
        SequenceSet::new(pieces).ok()
    }
}

fn group_runs<V: BaseValue>(
    seq: &Sequence<V>,
    keep: impl Fn(&V) -> bool,
) -> Option<SequenceSet<V>> {
    let insts = seq.instants();
    let mut groups: Vec<Vec<Instant<V>>> = Vec::new();

    for (idx, inst) in insts.iter().enumerate() {
        if keep(inst.value()) {
            let continues_prev = idx > 0 && keep(insts[idx - 1].value());
            if continues_prev {
                groups.last_mut().expect("continuation implies a prior group").push(inst.clone());
            } else {
                groups.push(vec![inst.clone()]);
            }
        }
    }

    if groups.is_empty() {
        return None;
    }

    let pieces: Vec<Sequence<V>> = groups
        .into_iter()
        .filter_map(|g| Sequence::new(g, true, true, seq.interpolation()).ok())
        .collect();

    if pieces.is_empty() {
        None
    } else {
        SequenceSet::new(pieces).ok()
    }
}

/// Re-samples `seq` at every instant where it already equals `target`
/// plus every interior crossing [`BaseValue::crossing_fraction`] finds
/// along each segment, so a restriction to an interior value (`spec.md`
/// §4.G) doesn't miss a crossing that falls strictly between two
/// samples. Mirrors [`insert_range_crossings`] but keyed on a single
/// target instead of a range's two bounds.
fn insert_value_crossings<V: BaseValue>(seq: &Sequence<V>, target: &V) -> Sequence<V> {
    if !matches!(seq.interpolation(), Interpolation::Linear) {
        return seq.clone();
    }

    let mut ts: Vec<Timestamp> = seq.instants().iter().map(|i| i.timestamp()).collect();
    for w in seq.instants().windows(2) {
        let (t0, t1) = (w[0].timestamp(), w[1].timestamp());
        if let Some(s) = V::crossing_fraction(w[0].value(), w[1].value(), target) {
            if let Some(tc) = fraction_to_timestamp(t0, t1, s) {
                ts.push(tc);
            }
        }
    }
    ts.sort();
    ts.dedup();

    let instants = ts
        .into_iter()
        .filter_map(|t| seq.value_at(t).map(|v| Instant::new(v, t)))
        .collect();

    Sequence::new(instants, seq.lower_inc(), seq.upper_inc(), seq.interpolation())
        .expect("re-sampling a sequence at its own supported timestamps stays in normal form")
}

/// Restriction to the instants equal to `target`. Adjacent matching
/// instants are kept together as one sub-sequence rather than split
/// into singletons. Segments that only graze `target` strictly between
/// two samples get the crossing instant inserted first, so a moving
/// point that passes through a value without ever being sampled there
/// is still caught (`spec.md` §4.G, worked example in §8).
pub fn at_value<V: BaseValue>(seq: &Sequence<V>, target: &V) -> Option<SequenceSet<V>> {
    let refined = insert_value_crossings(seq, target);
    group_runs(&refined, |v| v.approx_eq(target))
}

/// The set-complement of [`at_value`].
pub fn minus_value<V: BaseValue>(seq: &Sequence<V>, target: &V) -> Option<SequenceSet<V>> {
    let refined = insert_value_crossings(seq, target);
    group_runs(&refined, |v| !v.approx_eq(target))
}

/// Restriction to the sub-periods where the value falls within `range`.
/// `Linear` sequences get the boundary-crossing instant inserted first,
/// so a trajectory that only touches the range's edge between samples is
/// still clipped exactly there.
pub fn at_range(seq: &Sequence<f64>, range: &Range<f64>) -> Option<SequenceSet<f64>> {
    let refined = insert_range_crossings(seq, range);
    group_runs(&refined, |v| range.contains(*v))
}

pub fn minus_range(seq: &Sequence<f64>, range: &Range<f64>) -> Option<SequenceSet<f64>> {
    let refined = insert_range_crossings(seq, range);
    group_runs(&refined, |v| !range.contains(*v))
}

fn insert_range_crossings(seq: &Sequence<f64>, range: &Range<f64>) -> Sequence<f64> {
    if !matches!(seq.interpolation(), Interpolation::Linear) {
        return seq.clone();
    }

    let mut ts: Vec<Timestamp> = seq.instants().iter().map(|i| i.timestamp()).collect();
    for w in seq.instants().windows(2) {
        let (t0, t1) = (w[0].timestamp(), w[1].timestamp());
        let (v0, v1) = (*w[0].value(), *w[1].value());
        for bound in [range.lower(), range.upper()] {
            if let Some(s) = linear_equality_crossing(v0, v1, bound, bound) {
                if let Some(tc) = fraction_to_timestamp(t0, t1, s) {
                    ts.push(tc);
                }
            }
        }
    }
    ts.sort();
    ts.dedup();

    let instants = ts
        .into_iter()
        .filter_map(|t| seq.value_at(t).map(|v| Instant::new(v, t)))
        .collect();

    Sequence::new(instants, seq.lower_inc(), seq.upper_inc(), Interpolation::Linear)
        .expect("re-sampling a sequence at its own supported timestamps stays in normal form")
}

/// Restriction to the sub-periods where the value equals the sequence's
/// own minimum. Safe to compute via instant-level equality because a
/// piecewise-linear sequence's extrema are always attained at a vertex —
/// each segment is monotonic (or constant), so no interior point can
/// beat both of its endpoints.
pub fn at_min(seq: &Sequence<f64>) -> Option<SequenceSet<f64>> {
    let min = seq.values().into_iter().copied().fold(f64::INFINITY, f64::min);
    at_value(seq, &min)
}

pub fn at_max(seq: &Sequence<f64>) -> Option<SequenceSet<f64>> {
    let max = seq.values().into_iter().copied().fold(f64::NEG_INFINITY, f64::max);
    at_value(seq, &max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_seq(points: &[(f64, i64)]) -> Sequence<f64> {
        let instants = points
            .iter()
            .map(|(v, t)| Instant::new(*v, Timestamp::from_micros(*t)))
            .collect();
        Sequence::new(instants, true, true, Interpolation::Linear).unwrap()
    }

    #[test]
    fn at_period_clips_and_interpolates_endpoints() {
        let seq = float_seq(&[(0.0, 0), (10.0, 10)]);
        let period = Period::new(Timestamp::from_micros(2), Timestamp::from_micros(8), true, true).unwrap();
        let clipped = at_period(&seq, &period).unwrap();
        assert_eq!(clipped.value_at(Timestamp::from_micros(2)), Some(2.0));
        assert_eq!(clipped.value_at(Timestamp::from_micros(8)), Some(8.0));
    }

    #[test]
    fn minus_period_leaves_two_pieces() {
        let seq = float_seq(&[(0.0, 0), (10.0, 10)]);
        let period = Period::new(Timestamp::from_micros(4), Timestamp::from_micros(6), true, true).unwrap();
        let rest = minus_period(&seq, &period).unwrap();
        assert_eq!(rest.num_sequences(), 2);
    }

    #[test]
    fn at_min_finds_valley_instant() {
        let seq = float_seq(&[(5.0, 0), (0.0, 5), (5.0, 10)]);
        let restricted = at_min(&seq).unwrap();
        assert_eq!(restricted.num_sequences(), 1);
        assert_eq!(restricted.value_at(Timestamp::from_micros(5)), Some(0.0));
    }

    #[test]
    fn at_value_inserts_interior_crossing() {
        use chronogeo_types::point::GeomPoint;

        let instants = vec![
            Instant::new(GeomPoint::new_2d(0.0, 0.0, 0), Timestamp::from_micros(0)),
            Instant::new(GeomPoint::new_2d(4.0, 4.0, 0), Timestamp::from_micros(4 * 86_400_000_000)),
        ];
        let seq = Sequence::new(instants, true, true, Interpolation::Linear).unwrap();
        let target = GeomPoint::new_2d(2.0, 2.0, 0);

        let restricted = at_value(&seq, &target).unwrap();
        assert_eq!(restricted.num_sequences(), 1);
        let hit = &restricted.sequences()[0];
        assert_eq!(hit.start_timestamp(), Timestamp::from_micros(2 * 86_400_000_000));
        assert_eq!(hit.end_timestamp(), hit.start_timestamp());
    }

    #[test]
    fn at_range_clips_to_boundary_crossing() {
        let seq = float_seq(&[(0.0, 0), (10.0, 10)]);
        let range = Range::<f64>::new(0.0, 5.0, true, true).unwrap();
        let restricted = at_range(&seq, &range).unwrap();
        assert_eq!(restricted.num_sequences(), 1);
        let seq0 = &restricted.sequences()[0];
        assert_eq!(seq0.end_timestamp(), Timestamp::from_micros(5));
    }
}
