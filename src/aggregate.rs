//! Aggregation core (`spec.md` §4.H): `transition`/`combine`/`final` over
//! a centroid accumulator. State owns its handle and moves by value
//! through each step, mirroring the teacher's `AtomicBatch`
//! (`src/batch.rs`) building up a list of operations before a single
//! `commit` materializes the result — here the "operation" is one global
//! `Double4` running sum plus the set of timestamps observed, and `final`
//! is the commit.
//!
//! The aggregate is a single centroid, not one per timestamp: every
//! point folded in via `transition`, regardless of which observation or
//! timestamp it came from, contributes to the same running sum. `final`
//! then broadcasts that one averaged point across every timestamp any
//! input was observed at — this is what lets two observations with
//! disjoint timestamps still combine into a single meaningful average
//! instead of a no-op union of per-timestamp singletons.
//!
//! The accumulator's temporal *shape* (one value per sample vs. a
//! continuous path between samples) is decided once, by the first
//! `transition`, and is then fixed for the state's lifetime: mixing a
//! discretely-sampled input into a continuous accumulator (or vice versa)
//! is rejected the same way `combine` rejects a 2D/3D accumulator
//! mismatch.

use std::collections::BTreeSet;

use chronogeo_types::accumulator::Double4;
use chronogeo_types::point::GeomPoint;

use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::temporal::instant_set::InstantSet;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::temporal::sequence_set::SequenceSet;
use crate::temporal::Temporal;
use crate::time::Timestamp;
use crate::value::BaseValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Built from `Instant`/`InstantSet` inputs: points have no
    /// interpolated existence between samples.
    Discrete,
    /// Built from `Sequence`/`SequenceSet` inputs: the accumulator is
    /// itself continuous between samples.
    Continuous,
}

/// A partial (or complete) centroid aggregation. Owned exclusively by
/// whoever holds it; `transition`/`combine` consume it and return the
/// next handle rather than mutating in place, so there is never more
/// than one live reference to a given state.
#[derive(Debug, Clone)]
pub struct CentroidState {
    shape: Shape,
    has_z: bool,
    sum: Double4,
    timestamps: BTreeSet<i64>,
}

fn temporal_instants<V: BaseValue>(t: &Temporal<GeomPoint>) -> (Vec<(Timestamp, GeomPoint)>, Shape)
where
    V: Clone,
{
    match t {
        Temporal::Instant(i) => (vec![(i.timestamp(), i.value().clone())], Shape::Discrete),
        Temporal::InstantSet(s) => (
            s.instants().iter().map(|i| (i.timestamp(), i.value().clone())).collect(),
            Shape::Discrete,
        ),
        Temporal::Sequence(s) => (
            s.instants().iter().map(|i| (i.timestamp(), i.value().clone())).collect(),
            Shape::Continuous,
        ),
        Temporal::SequenceSet(s) => (
            s.sequences()
                .iter()
                .flat_map(|seq| seq.instants().iter().map(|i| (i.timestamp(), i.value().clone())))
                .collect(),
            Shape::Continuous,
        ),
    }
}

/// Folds a new observation into `state`: every point in `new` adds to
/// the single running sum, and every timestamp it carries joins the set
/// broadcast at `final` time. Observations with timestamps disjoint from
/// everything seen so far still pull the running average toward their
/// own points — there is no per-timestamp bucketing to keep them apart.
pub fn centroid_transition(state: Option<CentroidState>, new: &Temporal<GeomPoint>) -> Result<CentroidState> {
    let (instants, shape) = temporal_instants::<GeomPoint>(new);
    if instants.is_empty() {
        return state.ok_or_else(|| ChronoError::invalid_input("cannot transition an empty aggregate with no observations"));
    }
    let has_z = instants.iter().all(|(_, p)| p.has_z());
    if !has_z && instants.iter().any(|(_, p)| p.has_z()) {
        return Err(ChronoError::invalid_input(
            "centroid transition requires every point in an observation to share the same dimensionality",
        ));
    }

    let mut new_sum = Double4::zero(has_z);
    let mut new_timestamps = BTreeSet::new();
    for (t, p) in instants {
        new_sum = new_sum + Double4::from_point(p.x(), p.y(), p.z());
        new_timestamps.insert(t.as_micros());
    }

    match state {
        None => Ok(CentroidState { shape, has_z, sum: new_sum, timestamps: new_timestamps }),
        Some(prev) => {
            if prev.shape != shape {
                return Err(ChronoError::invalid_input(
                    "cannot transition a discretely-sampled aggregate with a continuous observation, or vice versa",
                ));
            }
            if prev.has_z != has_z {
                return Err(ChronoError::invalid_input("centroid aggregate dimensionality mismatch (2D vs 3D)"));
            }
            let mut timestamps = prev.timestamps;
            timestamps.extend(new_timestamps);
            Ok(CentroidState { shape: prev.shape, has_z, sum: prev.sum + new_sum, timestamps })
        }
    }
}

/// Merges two partial states. The empty-state short-circuit happens
/// before the dimensionality check: an aggregate that has never seen a
/// `transition` carries no shape or dimensionality commitment yet, so it
/// cannot conflict with anything (matching `tpoint_tcentroid_combinefn`
/// in the source this was distilled from).
pub fn centroid_combine(a: Option<CentroidState>, b: Option<CentroidState>) -> Result<CentroidState> {
    match (a, b) {
        (None, None) => Err(ChronoError::invalid_input("cannot combine two empty aggregates")),
        (Some(s), None) | (None, Some(s)) => Ok(s),
        (Some(a), Some(b)) => {
            if a.shape != b.shape {
                return Err(ChronoError::invalid_input(
                    "cannot combine a discretely-sampled aggregate with a continuous one",
                ));
            }
            if a.has_z != b.has_z {
                return Err(ChronoError::invalid_input("centroid aggregate dimensionality mismatch (2D vs 3D)"));
            }
            let mut timestamps = a.timestamps;
            timestamps.extend(b.timestamps);
            Ok(CentroidState { shape: a.shape, has_z: a.has_z, sum: a.sum + b.sum, timestamps })
        }
    }
}

/// Divides the global `(sx, sy[, sz], n)` sum by `n` once and broadcasts
/// the single resulting point across every timestamp any folded-in
/// observation carried: an `InstantSet` if every observation was itself
/// discretely sampled, a single-piece `SequenceSet` (constant between
/// samples, since every sample is the same averaged point) if any was
/// continuous.
pub fn centroid_final(state: &CentroidState) -> Result<Temporal<GeomPoint>> {
    let (x, y, z) = state
        .sum
        .finalize()
        .ok_or_else(|| ChronoError::invalid_input("cannot finalize an aggregate with zero observations"))?;
    let p = match z {
        Some(z) => GeomPoint::new_3d(x, y, z, 0),
        None => GeomPoint::new_2d(x, y, 0),
    };

    let instants: Vec<Instant<GeomPoint>> = state
        .timestamps
        .iter()
        .map(|&micros| Instant::new(p.clone(), Timestamp::from_micros(micros)))
        .collect();

    match state.shape {
        Shape::Discrete => Ok(Temporal::InstantSet(InstantSet::new(instants)?)),
        Shape::Continuous => {
            let seq = Sequence::new(instants, true, true, Interpolation::Linear)?;
            Ok(Temporal::SequenceSet(SequenceSet::new(vec![seq])?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_seq(points: &[(f64, f64, i64)]) -> Temporal<GeomPoint> {
        let instants = points
            .iter()
            .map(|(x, y, t)| Instant::new(GeomPoint::new_2d(*x, *y, 0), Timestamp::from_micros(*t)))
            .collect();
        Temporal::Sequence(Sequence::new(instants, true, true, Interpolation::Linear).unwrap())
    }

    #[test]
    fn transition_then_final_averages_matching_timestamps() {
        let a = point_seq(&[(0.0, 0.0, 0), (10.0, 0.0, 10)]);
        let b = point_seq(&[(0.0, 10.0, 0), (10.0, 10.0, 10)]);

        let state = centroid_transition(None, &a).unwrap();
        let state = centroid_transition(Some(state), &b).unwrap();
        let result = centroid_final(&state).unwrap();

        assert_eq!(result.value_at(Timestamp::from_micros(0)).unwrap().y(), 5.0);
        assert_eq!(result.value_at(Timestamp::from_micros(10)).unwrap().y(), 5.0);
    }

    #[test]
    fn combine_rejects_dimensionality_mismatch() {
        let flat = centroid_transition(None, &point_seq(&[(0.0, 0.0, 0)])).unwrap();
        let raised = {
            let instants = vec![Instant::new(GeomPoint::new_3d(0.0, 0.0, 5.0, 0), Timestamp::from_micros(0))];
            let t = Temporal::Sequence(Sequence::new(instants, true, true, Interpolation::Linear).unwrap());
            centroid_transition(None, &t).unwrap()
        };
        assert!(centroid_combine(Some(flat), Some(raised)).is_err());
    }

    #[test]
    fn combine_short_circuits_on_empty_state_before_dimensionality_check() {
        let flat = centroid_transition(None, &point_seq(&[(0.0, 0.0, 0)])).unwrap();
        let combined = centroid_combine(None, Some(flat)).unwrap();
        assert_eq!(combined.timestamps.len(), 1);
    }

    #[test]
    fn disjoint_timestamps_still_collapse_into_one_global_centroid() {
        let a = Temporal::Instant(Instant::new(GeomPoint::new_2d(0.0, 0.0, 0), Timestamp::from_micros(0)));
        let b = Temporal::Instant(Instant::new(GeomPoint::new_2d(2.0, 0.0, 0), Timestamp::from_micros(10)));
        let c = Temporal::Instant(Instant::new(GeomPoint::new_2d(0.0, 2.0, 0), Timestamp::from_micros(20)));

        let state = centroid_transition(None, &a).unwrap();
        let state = centroid_transition(Some(state), &b).unwrap();
        let state = centroid_transition(Some(state), &c).unwrap();
        let result = centroid_final(&state).unwrap();

        for t in [0, 10, 20] {
            let p = result.value_at(Timestamp::from_micros(t)).unwrap();
            assert!((p.x() - 2.0 / 3.0).abs() < 1e-9);
            assert!((p.y() - 2.0 / 3.0).abs() < 1e-9);
        }
    }
}
