//! `InstantSet<V>`: an unordered-in-time-semantics, strictly-increasing
//! sequence of instants with no interpolation between them — the
//! temporal analogue of a sparse sample set (`spec.md` §4.C).

use crate::bbox::BBox4D;
use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::time::{Timestamp, TimestampSet};
use crate::value::BaseValue;

#[derive(Debug, Clone, PartialEq)]
pub struct InstantSet<V: BaseValue> {
    instants: Vec<Instant<V>>,
}

impl<V: BaseValue> InstantSet<V> {
    /// Builds from instants in any order; sorts by timestamp and rejects
    /// duplicate timestamps, mirroring `TimestampSet`'s normal form.
    pub fn new(mut instants: Vec<Instant<V>>) -> Result<Self> {
        if instants.is_empty() {
            return Err(ChronoError::normal_form("InstantSet must be non-empty"));
        }
        instants.sort_by_key(|i| i.timestamp());
        for w in instants.windows(2) {
            if w[0].timestamp() == w[1].timestamp() {
                return Err(ChronoError::normal_form(
                    "InstantSet timestamps must be distinct",
                ));
            }
        }
        Ok(Self { instants })
    }

    pub fn instants(&self) -> &[Instant<V>] {
        &self.instants
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.instants[0].timestamp()
    }

    pub fn end_timestamp(&self) -> Timestamp {
        self.instants[self.instants.len() - 1].timestamp()
    }

    pub fn timestamps(&self) -> TimestampSet {
        TimestampSet::new(self.instants.iter().map(|i| i.timestamp()).collect())
            .expect("InstantSet invariant guarantees strictly increasing timestamps")
    }

    /// Value at `t`, if an instant exists exactly there; `None` otherwise —
    /// `InstantSet` never interpolates (`spec.md` §4.C).
    pub fn value_at(&self, t: Timestamp) -> Option<&V> {
        self.instants
            .binary_search_by_key(&t, |i| i.timestamp())
            .ok()
            .map(|idx| self.instants[idx].value())
    }

    pub fn values(&self) -> Vec<&V> {
        self.instants.iter().map(|i| i.value()).collect()
    }

    pub fn bbox(&self) -> BBox4D {
        let mut acc = BBox4D::empty();
        for i in &self.instants {
            let coords = i.value().spatial_coords();
            let geodetic = i.value().geodetic();
            let point_bbox = match coords {
                Some((x, y, z)) => BBox4D::from_point_time(x, y, z, i.timestamp(), geodetic),
                None => BBox4D::from_timestamp(i.timestamp()),
            };
            acc.union(&point_bbox);
        }
        acc
    }

    pub fn shift(&self, interval: crate::time::Interval) -> Self {
        let instants = self
            .instants
            .iter()
            .map(|i| Instant::new(i.value().clone(), interval.apply(i.timestamp())))
            .collect();
        Self { instants }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_rejects_duplicate_timestamps() {
        let a = Instant::new(1i64, Timestamp::from_micros(10));
        let b = Instant::new(2i64, Timestamp::from_micros(0));
        let set = InstantSet::new(vec![a, b]).unwrap();
        assert_eq!(set.start_timestamp(), Timestamp::from_micros(0));
        assert_eq!(set.end_timestamp(), Timestamp::from_micros(10));

        let dup_a = Instant::new(1i64, Timestamp::from_micros(5));
        let dup_b = Instant::new(2i64, Timestamp::from_micros(5));
        assert!(InstantSet::new(vec![dup_a, dup_b]).is_err());
    }

    #[test]
    fn value_at_only_matches_exact_instants() {
        let a = Instant::new(1i64, Timestamp::from_micros(0));
        let b = Instant::new(2i64, Timestamp::from_micros(10));
        let set = InstantSet::new(vec![a, b]).unwrap();
        assert_eq!(set.value_at(Timestamp::from_micros(10)), Some(&2));
        assert_eq!(set.value_at(Timestamp::from_micros(5)), None);
    }
}
