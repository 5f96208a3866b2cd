//! `Period` and `PeriodSet`.
//!
//! A `Period` is a (possibly degenerate) closed-or-half-open interval of
//! timestamps; a `PeriodSet` is an ordered sequence of pairwise
//! non-overlapping, non-adjacent periods. The relational predicate family
//! (`before`/`after`/`overbefore`/`overafter`/`adjacent`/`contains`/
//! `contained`/`overlaps`/`equals`) is the vocabulary both the octree's
//! directional scan-keys and the selectivity estimator dispatch on.

use crate::error::{ChronoError, Result};
use crate::time::timestamp::Timestamp;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    lower: Timestamp,
    upper: Timestamp,
    lower_inc: bool,
    upper_inc: bool,
}

impl Period {
    pub fn new(lower: Timestamp, upper: Timestamp, lower_inc: bool, upper_inc: bool) -> Result<Self> {
        if lower > upper {
            return Err(ChronoError::normal_form(
                "period lower bound must be <= upper bound",
            ));
        }
        if lower == upper && !(lower_inc && upper_inc) {
            return Err(ChronoError::normal_form(
                "a degenerate period (lower == upper) must be inclusive on both ends",
            ));
        }
        Ok(Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        })
    }

    pub fn instant(t: Timestamp) -> Self {
        Self {
            lower: t,
            upper: t,
            lower_inc: true,
            upper_inc: true,
        }
    }

    pub fn lower(&self) -> Timestamp {
        self.lower
    }
    pub fn upper(&self) -> Timestamp {
        self.upper
    }
    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }
    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn contains_timestamp(&self, t: Timestamp) -> bool {
        let above_lower = if self.lower_inc { t >= self.lower } else { t > self.lower };
        let below_upper = if self.upper_inc { t <= self.upper } else { t < self.upper };
        above_lower && below_upper
    }

    /// Whether `self` and `other` share at least one timestamp.
    pub fn overlaps(&self, other: &Period) -> bool {
        let lower_ok = match self.upper.cmp(&other.lower) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.upper_inc && other.lower_inc,
        };
        let upper_ok = match other.upper.cmp(&self.lower) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => other.upper_inc && self.lower_inc,
        };
        lower_ok && upper_ok
    }

    pub fn contains(&self, other: &Period) -> bool {
        let lower_ok = self.lower < other.lower || (self.lower == other.lower && (self.lower_inc || !other.lower_inc));
        let upper_ok = self.upper > other.upper || (self.upper == other.upper && (self.upper_inc || !other.upper_inc));
        lower_ok && upper_ok
    }

    pub fn contained(&self, other: &Period) -> bool {
        other.contains(self)
    }

    pub fn equals(&self, other: &Period) -> bool {
        self.lower == other.lower
            && self.upper == other.upper
            && self.lower_inc == other.lower_inc
            && self.upper_inc == other.upper_inc
    }

    /// Strictly entirely before `other` (no shared bound either).
    pub fn before(&self, other: &Period) -> bool {
        self.upper < other.lower || (self.upper == other.lower && !(self.upper_inc && other.lower_inc))
    }

    pub fn after(&self, other: &Period) -> bool {
        other.before(self)
    }

    /// Before-or-touching: `self` does not extend past the start of `other`.
    pub fn overbefore(&self, other: &Period) -> bool {
        self.upper < other.upper || (self.upper == other.upper && (!self.upper_inc || other.upper_inc))
    }

    pub fn overafter(&self, other: &Period) -> bool {
        other.overbefore(self)
    }

    /// True iff the two periods touch at exactly one timestamp with at
    /// most one side inclusive there (§3.3 SequenceSet adjacency rule).
    pub fn adjacent(&self, other: &Period) -> bool {
        (self.upper == other.lower && !(self.upper_inc && other.lower_inc))
            || (other.upper == self.lower && !(other.upper_inc && self.lower_inc))
    }

    pub fn duration_micros(&self) -> i64 {
        self.upper.checked_sub(self.lower).unwrap_or(0)
    }

    /// Intersection, or `None` if disjoint.
    pub fn intersection(&self, other: &Period) -> Option<Period> {
        if !self.overlaps(other) {
            return None;
        }
        let (lower, lower_inc) = match self.lower.cmp(&other.lower) {
            Ordering::Greater => (self.lower, self.lower_inc),
            Ordering::Less => (other.lower, other.lower_inc),
            Ordering::Equal => (self.lower, self.lower_inc && other.lower_inc),
        };
        let (upper, upper_inc) = match self.upper.cmp(&other.upper) {
            Ordering::Less => (self.upper, self.upper_inc),
            Ordering::Greater => (other.upper, other.upper_inc),
            Ordering::Equal => (self.upper, self.upper_inc && other.upper_inc),
        };
        Period::new(lower, upper, lower_inc, upper_inc).ok()
    }
}

/// An ordered sequence of pairwise non-overlapping, non-adjacent periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    pub fn new(mut periods: Vec<Period>) -> Result<Self> {
        periods.sort_by(|a, b| a.lower.cmp(&b.lower));
        for w in periods.windows(2) {
            if w[0].overlaps(&w[1]) || w[0].adjacent(&w[1]) {
                return Err(ChronoError::normal_form(
                    "PeriodSet periods must be pairwise non-overlapping and non-adjacent",
                ));
            }
        }
        Ok(Self { periods })
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn contains_timestamp(&self, t: Timestamp) -> bool {
        self.periods.iter().any(|p| p.contains_timestamp(t))
    }

    pub fn span(&self) -> Option<Period> {
        let first = self.periods.first()?;
        let last = self.periods.last()?;
        Period::new(first.lower, last.upper, first.lower_inc, last.upper_inc).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(micros: i64) -> Timestamp {
        Timestamp::from_micros(micros)
    }

    #[test]
    fn degenerate_period_requires_both_inclusive() {
        let t = ts(5);
        assert!(Period::new(t, t, true, true).is_ok());
        assert!(Period::new(t, t, true, false).is_err());
    }

    #[test]
    fn overlap_touching_inclusive_bounds() {
        let a = Period::new(ts(0), ts(10), true, true).unwrap();
        let b = Period::new(ts(10), ts(20), true, true).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.adjacent(&b));
    }

    #[test]
    fn adjacent_when_one_side_exclusive() {
        let a = Period::new(ts(0), ts(10), true, false).unwrap();
        let b = Period::new(ts(10), ts(20), true, true).unwrap();
        assert!(a.adjacent(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contains_and_contained_are_duals() {
        let outer = Period::new(ts(0), ts(100), true, true).unwrap();
        let inner = Period::new(ts(10), ts(20), true, true).unwrap();
        assert!(outer.contains(&inner));
        assert!(inner.contained(&outer));
    }

    #[test]
    fn before_after_are_duals() {
        let a = Period::new(ts(0), ts(10), true, false).unwrap();
        let b = Period::new(ts(10), ts(20), true, true).unwrap();
        assert!(a.before(&b));
        assert!(b.after(&a));
    }

    #[test]
    fn intersection_clips_bounds() {
        let a = Period::new(ts(0), ts(10), true, true).unwrap();
        let b = Period::new(ts(5), ts(15), true, true).unwrap();
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.lower(), ts(5));
        assert_eq!(i.upper(), ts(10));
    }

    #[test]
    fn period_set_rejects_overlapping_input() {
        let a = Period::new(ts(0), ts(10), true, true).unwrap();
        let b = Period::new(ts(5), ts(15), true, true).unwrap();
        assert!(PeriodSet::new(vec![a, b]).is_err());
    }

    #[test]
    fn period_set_rejects_adjacent_input() {
        let a = Period::new(ts(0), ts(10), true, false).unwrap();
        let b = Period::new(ts(10), ts(20), true, true).unwrap();
        assert!(PeriodSet::new(vec![a, b]).is_err());
    }
}
