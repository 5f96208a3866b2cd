//! `SequenceSet<V>`: an ordered run of sequences, each covering a distinct
//! period, merged where they touch and agree (`spec.md` §4.C).

use crate::bbox::BBox4D;
use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::time::{Interval, Period, Timestamp};
use crate::value::BaseValue;

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSet<V: BaseValue> {
    sequences: Vec<Sequence<V>>,
    bbox: BBox4D,
}

impl<V: BaseValue> SequenceSet<V> {
    /// Builds from unordered sequences. Two consecutive sequences that
    /// touch at a shared timestamp are merged into one when exactly one
    /// side is inclusive there and the two boundary values agree —
    /// otherwise a shared, doubly-inclusive boundary or disagreeing
    /// values are both normal-form violations. Non-touching sequences
    /// are kept distinct and must not overlap.
    pub fn new(mut sequences: Vec<Sequence<V>>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(ChronoError::normal_form("SequenceSet must have at least one sequence"));
        }
        sequences.sort_by_key(|s| s.start_timestamp());

        let mut merged: Vec<Sequence<V>> = Vec::with_capacity(sequences.len());
        for seq in sequences {
            let Some(last) = merged.last() else {
                merged.push(seq);
                continue;
            };

            if last.period().overlaps(&seq.period()) {
                return Err(ChronoError::normal_form(
                    "SequenceSet sequences must not overlap in time",
                ));
            }

            let touches = last.end_timestamp() == seq.start_timestamp();
            if touches {
                let shared_ok = !(last.upper_inc() && seq.lower_inc());
                if !shared_ok {
                    return Err(ChronoError::normal_form(
                        "SequenceSet sequences sharing a timestamp cannot both be inclusive there",
                    ));
                }
                let same_interpolation = last.interpolation() == seq.interpolation();
                let last_value = last.instants().last().expect("non-empty").value();
                let seq_value = seq.instants().first().expect("non-empty").value();
                let boundary_values_agree = last_value.approx_eq(seq_value);

                if same_interpolation && boundary_values_agree {
                    let prev = merged.pop().unwrap();
                    merged.push(merge_touching(prev, seq)?);
                    continue;
                }
            }

            merged.push(seq);
        }

        let mut bbox = BBox4D::empty();
        for s in &merged {
            bbox.union(&s.bbox());
        }

        Ok(Self {
            sequences: merged,
            bbox,
        })
    }

    pub fn sequences(&self) -> &[Sequence<V>] {
        &self.sequences
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn bbox(&self) -> BBox4D {
        self.bbox
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.sequences[0].start_timestamp()
    }

    pub fn end_timestamp(&self) -> Timestamp {
        self.sequences[self.sequences.len() - 1].end_timestamp()
    }

    pub fn value_at(&self, t: Timestamp) -> Option<V> {
        let idx = self
            .sequences
            .binary_search_by(|s| {
                use std::cmp::Ordering;
                if t < s.start_timestamp() {
                    Ordering::Greater
                } else if t > s.end_timestamp() {
                    Ordering::Less
                } else if t == s.end_timestamp() && !s.upper_inc() {
                    Ordering::Less
                } else if t == s.start_timestamp() && !s.lower_inc() {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;
        self.sequences[idx].value_at(t)
    }

    pub fn values(&self) -> Vec<&V> {
        self.sequences.iter().flat_map(|s| s.values()).collect()
    }

    pub fn shift(&self, interval: Interval) -> Self {
        let sequences = self.sequences.iter().map(|s| s.shift(interval)).collect();
        let mut bbox = BBox4D::empty();
        for s in &self.sequences {
            bbox.union(&s.bbox());
        }
        Self { sequences, bbox }
    }
}

fn merge_touching<V: BaseValue>(a: Sequence<V>, b: Sequence<V>) -> Result<Sequence<V>> {
    let lower_inc = a.lower_inc();
    let upper_inc = b.upper_inc();
    let interpolation = a.interpolation();

    let mut instants: Vec<Instant<V>> = a.instants().to_vec();
    // The shared boundary instant is carried by `a`'s last entry; `b`'s
    // matching first entry is a duplicate timestamp and is dropped.
    instants.extend(b.instants().iter().skip(1).cloned());

    Sequence::new(instants, lower_inc, upper_inc, interpolation)
}
