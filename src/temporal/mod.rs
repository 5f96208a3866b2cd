//! `Temporal<V>`: the sum type over the four temporal subtypes
//! (`spec.md` §4.C) — `Instant`, `InstantSet`, `Sequence`, and
//! `SequenceSet`. Downstream modules (`sync`, `restrict`, `aggregate`,
//! `geomops`) mostly work against this type rather than the four
//! variants directly.

pub mod instant;
pub mod instant_set;
pub mod normalize;
pub mod sequence;
pub mod sequence_set;

pub use instant::Instant;
pub use instant_set::InstantSet;
pub use sequence::{Interpolation, Sequence};
pub use sequence_set::SequenceSet;

use crate::bbox::BBox4D;
use crate::time::{Interval, Period, Timestamp};
use crate::value::BaseValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Temporal<V: BaseValue> {
    Instant(Instant<V>),
    InstantSet(InstantSet<V>),
    Sequence(Sequence<V>),
    SequenceSet(SequenceSet<V>),
}

impl<V: BaseValue> Temporal<V> {
    pub fn kind(&self) -> &'static str {
        match self {
            Temporal::Instant(_) => "Instant",
            Temporal::InstantSet(_) => "InstantSet",
            Temporal::Sequence(_) => "Sequence",
            Temporal::SequenceSet(_) => "SequenceSet",
        }
    }

    pub fn bbox(&self) -> BBox4D {
        match self {
            Temporal::Instant(i) => {
                let geodetic = i.value().geodetic();
                match i.value().spatial_coords() {
                    Some((x, y, z)) => BBox4D::from_point_time(x, y, z, i.timestamp(), geodetic),
                    None => BBox4D::from_timestamp(i.timestamp()),
                }
            }
            Temporal::InstantSet(s) => s.bbox(),
            Temporal::Sequence(s) => s.bbox(),
            Temporal::SequenceSet(s) => s.bbox(),
        }
    }

    pub fn start_timestamp(&self) -> Timestamp {
        match self {
            Temporal::Instant(i) => i.timestamp(),
            Temporal::InstantSet(s) => s.start_timestamp(),
            Temporal::Sequence(s) => s.start_timestamp(),
            Temporal::SequenceSet(s) => s.start_timestamp(),
        }
    }

    pub fn end_timestamp(&self) -> Timestamp {
        match self {
            Temporal::Instant(i) => i.timestamp(),
            Temporal::InstantSet(s) => s.end_timestamp(),
            Temporal::Sequence(s) => s.end_timestamp(),
            Temporal::SequenceSet(s) => s.end_timestamp(),
        }
    }

    pub fn duration_micros(&self) -> i64 {
        self.end_timestamp().as_micros() - self.start_timestamp().as_micros()
    }

    /// The timestamp period the temporal value spans. Instants and
    /// instant sets are treated as closed on both ends; sequences and
    /// sequence sets carry their own bound inclusivity.
    pub fn timespan(&self) -> Period {
        match self {
            Temporal::Instant(i) => Period::instant(i.timestamp()),
            Temporal::InstantSet(s) => {
                Period::new(s.start_timestamp(), s.end_timestamp(), true, true)
                    .expect("InstantSet is non-empty and sorted by construction")
            }
            Temporal::Sequence(s) => s.period(),
            Temporal::SequenceSet(s) => {
                let first = &s.sequences()[0];
                let last = &s.sequences()[s.sequences().len() - 1];
                Period::new(
                    first.start_timestamp(),
                    last.end_timestamp(),
                    first.lower_inc(),
                    last.upper_inc(),
                )
                .expect("SequenceSet sequences are validated non-overlapping and ordered")
            }
        }
    }

    pub fn value_at(&self, t: Timestamp) -> Option<V> {
        match self {
            Temporal::Instant(i) => (i.timestamp() == t).then(|| i.value().clone()),
            Temporal::InstantSet(s) => s.value_at(t).cloned(),
            Temporal::Sequence(s) => s.value_at(t),
            Temporal::SequenceSet(s) => s.value_at(t),
        }
    }

    pub fn values(&self) -> Vec<&V> {
        match self {
            Temporal::Instant(i) => vec![i.value()],
            Temporal::InstantSet(s) => s.values(),
            Temporal::Sequence(s) => s.values(),
            Temporal::SequenceSet(s) => s.values(),
        }
    }

    pub fn ever_equals(&self, target: &V) -> bool {
        self.values().into_iter().any(|v| v.approx_eq(target))
    }

    pub fn always_equals(&self, target: &V) -> bool {
        self.values().into_iter().all(|v| v.approx_eq(target))
    }

    pub fn min_value(&self) -> Option<&V> {
        self.values()
            .into_iter()
            .min_by(|a, b| a.cmp_value(b))
    }

    pub fn max_value(&self) -> Option<&V> {
        self.values()
            .into_iter()
            .max_by(|a, b| a.cmp_value(b))
    }

    pub fn shift(&self, interval: Interval) -> Self {
        match self {
            Temporal::Instant(i) => {
                Temporal::Instant(Instant::new(i.value().clone(), interval.apply(i.timestamp())))
            }
            Temporal::InstantSet(s) => Temporal::InstantSet(s.shift(interval)),
            Temporal::Sequence(s) => Temporal::Sequence(s.shift(interval)),
            Temporal::SequenceSet(s) => Temporal::SequenceSet(s.shift(interval)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    #[test]
    fn instant_timespan_is_degenerate_period() {
        let t = Temporal::Instant(Instant::new(1i64, Timestamp::from_micros(5)));
        let span = t.timespan();
        assert_eq!(span.lower(), span.upper());
    }

    #[test]
    fn ever_always_equals_over_sequence() {
        let instants = vec![
            Instant::new(1i64, Timestamp::from_micros(0)),
            Instant::new(1i64, Timestamp::from_micros(10)),
        ];
        let seq = Sequence::new(instants, true, true, Interpolation::Step).unwrap();
        let t = Temporal::Sequence(seq);
        assert!(t.ever_equals(&1));
        assert!(t.always_equals(&1));
        assert!(!t.ever_equals(&2));
    }

    #[test]
    fn min_max_value_over_instant_set() {
        use crate::temporal::instant_set::InstantSet;
        let instants = vec![
            Instant::new(3.0f64, Timestamp::from_micros(0)),
            Instant::new(1.0f64, Timestamp::from_micros(10)),
            Instant::new(2.0f64, Timestamp::from_micros(20)),
        ];
        let t = Temporal::InstantSet(InstantSet::new(instants).unwrap());
        assert_eq!(*t.min_value().unwrap(), 1.0);
        assert_eq!(*t.max_value().unwrap(), 3.0);
    }
}
