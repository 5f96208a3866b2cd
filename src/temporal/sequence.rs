//! `Sequence<V>`: a continuous run of instants over a single time period,
//! interpolated either `Linear` or `Step` (`spec.md` §4.C).

use crate::bbox::BBox4D;
use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::temporal::normalize::remove_redundant_collinear;
use crate::time::{Interval, Period, Timestamp};
use crate::value::BaseValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<V: BaseValue> {
    instants: Vec<Instant<V>>,
    lower_inc: bool,
    upper_inc: bool,
    interpolation: Interpolation,
    bbox: BBox4D,
    trajectory: Option<geo::Geometry<f64>>,
}

impl<V: BaseValue> Sequence<V> {
    /// Builds a sequence, applying the normal-form reduction (collinear
    /// instant removal for `Linear` sequences) and forcing a singleton
    /// sequence's bounds to closed on both ends — an instantaneous
    /// sequence has no "exclusive" side to speak of.
    pub fn new(
        mut instants: Vec<Instant<V>>,
        mut lower_inc: bool,
        mut upper_inc: bool,
        interpolation: Interpolation,
    ) -> Result<Self> {
        if instants.is_empty() {
            return Err(ChronoError::normal_form("Sequence must have at least one instant"));
        }
        instants.sort_by_key(|i| i.timestamp());
        for w in instants.windows(2) {
            if w[0].timestamp() == w[1].timestamp() {
                return Err(ChronoError::normal_form(
                    "Sequence instants must have distinct timestamps",
                ));
            }
        }

        if instants.len() == 1 {
            lower_inc = true;
            upper_inc = true;
        }

        if matches!(interpolation, Interpolation::Linear) {
            instants = remove_redundant_collinear(instants);
        }

        let bbox = compute_bbox(&instants, interpolation);
        let trajectory = compute_trajectory(&instants);

        Ok(Self {
            instants,
            lower_inc,
            upper_inc,
            interpolation,
            bbox,
            trajectory,
        })
    }

    pub fn instants(&self) -> &[Instant<V>] {
        &self.instants
    }

    pub fn num_instants(&self) -> usize {
        self.instants.len()
    }

    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn bbox(&self) -> BBox4D {
        self.bbox
    }

    /// The cached trajectory (`spec.md` §4.I): a point when every instant
    /// collapses to the same coordinates, otherwise the linestring through
    /// the instants in order. `None` for non-spatial base values.
    pub fn trajectory(&self) -> Option<&geo::Geometry<f64>> {
        self.trajectory.as_ref()
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.instants[0].timestamp()
    }

    pub fn end_timestamp(&self) -> Timestamp {
        self.instants[self.instants.len() - 1].timestamp()
    }

    pub fn period(&self) -> Period {
        Period::new(
            self.start_timestamp(),
            self.end_timestamp(),
            self.lower_inc,
            self.upper_inc,
        )
        .expect("Sequence bounds are always lower <= upper by construction")
    }

    pub fn duration_micros(&self) -> i64 {
        self.end_timestamp().as_micros() - self.start_timestamp().as_micros()
    }

    pub fn contains_timestamp(&self, t: Timestamp) -> bool {
        self.period().contains_timestamp(t)
    }

    /// Value at `t`. `Step` sequences hold the most recent instant's value
    /// until the next one; `Linear` sequences interpolate between the
    /// bracketing instants. Returns `None` outside the sequence's period.
    pub fn value_at(&self, t: Timestamp) -> Option<V> {
        if !self.contains_timestamp(t) {
            return None;
        }

        match self
            .instants
            .binary_search_by_key(&t, |i| i.timestamp())
        {
            Ok(idx) => Some(self.instants[idx].value().clone()),
            Err(insert_at) => {
                if insert_at == 0 || insert_at == self.instants.len() {
                    return None;
                }
                let before = &self.instants[insert_at - 1];
                match self.interpolation {
                    Interpolation::Step => Some(before.value().clone()),
                    Interpolation::Linear => {
                        let after = &self.instants[insert_at];
                        let frac = before.timestamp().fraction_between(after.timestamp(), t);
                        Some(before.value().interpolate(after.value(), frac))
                    }
                }
            }
        }
    }

    pub fn values(&self) -> Vec<&V> {
        self.instants.iter().map(|i| i.value()).collect()
    }

    pub fn shift(&self, interval: Interval) -> Self {
        let instants = self
            .instants
            .iter()
            .map(|i| Instant::new(i.value().clone(), interval.apply(i.timestamp())))
            .collect();
        let bbox = compute_bbox(&instants, self.interpolation);
        let trajectory = compute_trajectory(&instants);
        Self {
            instants,
            lower_inc: self.lower_inc,
            upper_inc: self.upper_inc,
            interpolation: self.interpolation,
            bbox,
            trajectory,
        }
    }
}

/// `spec.md` §4.I: the linestring through a sequence's instants,
/// deduplicating consecutive equal points; collapses to a single point
/// if every instant shares the same coordinates. `None` for base value
/// types with no spatial coordinates.
fn compute_trajectory<V: BaseValue>(instants: &[Instant<V>]) -> Option<geo::Geometry<f64>> {
    let coords: Vec<(f64, f64)> = instants
        .iter()
        .filter_map(|i| i.value().spatial_coords().map(|(x, y, _)| (x, y)))
        .collect();
    if coords.len() != instants.len() || coords.is_empty() {
        return None;
    }

    let mut dedup: Vec<(f64, f64)> = Vec::with_capacity(coords.len());
    for c in coords {
        if dedup.last() != Some(&c) {
            dedup.push(c);
        }
    }

    if dedup.len() == 1 {
        let (x, y) = dedup[0];
        Some(geo::Geometry::Point(geo::Point::new(x, y)))
    } else {
        Some(geo::Geometry::LineString(geo::LineString::from(dedup)))
    }
}

fn compute_bbox<V: BaseValue>(instants: &[Instant<V>], _interpolation: Interpolation) -> BBox4D {
    let mut acc = BBox4D::empty();
    for i in instants {
        let geodetic = i.value().geodetic();
        let b = match i.value().spatial_coords() {
            Some((x, y, z)) => BBox4D::from_point_time(x, y, z, i.timestamp(), geodetic),
            None => BBox4D::from_timestamp(i.timestamp()),
        };
        acc.union(&b);
    }
    acc
}
