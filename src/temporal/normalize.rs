//! Normal-form helpers shared by `Sequence` and `SequenceSet`
//! (`spec.md` §4.C).

use crate::temporal::instant::Instant;
use crate::value::BaseValue;

/// Drops a middle instant `i1` between `i0` and `i2` when, under linear
/// interpolation, `i1`'s value is exactly what interpolating from `i0` to
/// `i2` at `i1`'s time fraction would already produce — i.e. `i1` carries
/// no information a reader couldn't recover from its neighbors.
///
/// Only applies to continuous, `Linear`-interpolated sequences; step
/// sequences and discrete types keep every instant since each one marks a
/// genuine value change.
pub fn remove_redundant_collinear<V: BaseValue>(instants: Vec<Instant<V>>) -> Vec<Instant<V>> {
    if !V::CONTINUOUS || instants.len() < 3 {
        return instants;
    }

    let mut out: Vec<Instant<V>> = Vec::with_capacity(instants.len());
    for inst in instants {
        if out.len() >= 2 {
            let i0 = &out[out.len() - 2];
            let i1 = &out[out.len() - 1];
            let t0 = i0.timestamp().as_micros() as f64;
            let t1 = i1.timestamp().as_micros() as f64;
            let t2 = inst.timestamp().as_micros() as f64;
            if t2 > t0 {
                let frac = (t1 - t0) / (t2 - t0);
                let predicted = i0.value().interpolate(inst.value(), frac);
                if predicted.approx_eq(i1.value()) {
                    out.pop();
                }
            }
        }
        out.push(inst);
    }
    out
}
