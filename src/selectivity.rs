//! N-d histogram selectivity estimation (`spec.md` §4.K), grounded on
//! `estimate_selectivity`/`estimate_selectivity_temporal_dimension` in
//! `original_source/point/src/GeoEstimate.c`.
//!
//! A histogram is a regular grid over an n-dimensional extent with one
//! feature count per cell. Overlap-family operators sum each touched
//! cell's count weighted by the fraction of the cell the query box
//! covers; directional operators instead sweep a single axis and prorate
//! only the boundary cells that straddle the split.

const DEFAULT_SELECTIVITY: f64 = 0.01;

/// `×0.5` applied only to strict directional operators (`left`/`right`/
/// `before`/`after`, not their `over*` counterparts). This isn't
/// re-derived from first principles — it's carried over unchanged to
/// stay bit-compatible with the statistics this estimator was distilled
/// from, which applies the same constant for the same reason (see
/// `DESIGN.md`).
pub const DIRECTIONAL_BOUNDARY_SHIFT: f64 = 0.5;

/// A regular n-dimensional grid of feature counts, flattened row-major
/// (the last dimension varies fastest).
#[derive(Debug, Clone)]
pub struct Histogram {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub size: Vec<usize>,
    pub value: Vec<f64>,
}

impl Histogram {
    pub fn ndims(&self) -> usize {
        self.size.len()
    }

    fn total(&self) -> f64 {
        self.value.iter().sum()
    }

    fn cell_width(&self, dim: usize) -> f64 {
        (self.upper[dim] - self.lower[dim]) / self.size[dim] as f64
    }

    /// Row-major unravel of a flat cell index into per-dimension bin indices.
    fn unravel(&self, mut flat: usize) -> Vec<usize> {
        let mut idx = vec![0usize; self.ndims()];
        for d in (0..self.ndims()).rev() {
            idx[d] = flat % self.size[d];
            flat /= self.size[d];
        }
        idx
    }
}

/// Fraction of `[cell_lo, cell_hi)` covered by `[q_lo, q_hi]`, as a
/// fraction of the cell's own width. `0.0` for a degenerate (zero-width)
/// cell rather than dividing by zero.
fn axis_overlap_fraction(cell_lo: f64, width: f64, q_lo: f64, q_hi: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    let cell_hi = cell_lo + width;
    ((cell_hi.min(q_hi)) - (cell_lo.max(q_lo))).max(0.0) / width
}

/// Selectivity of an overlap-family operator (`overlaps`, `contains`,
/// `contained`, `same`): these all reduce to "how much of the query box's
/// extent intersects the histogram's mass", since at the bucket
/// granularity of a histogram, `contains`/`contained`/`same` can't be
/// distinguished from `overlaps` any more precisely than by that
/// fraction. `query` gives `(lower, upper)` per dimension, matching
/// `hist.ndims()`.
pub fn estimate_overlap_selectivity(hist: &Histogram, query: &[(f64, f64)]) -> f64 {
    assert_eq!(query.len(), hist.ndims(), "query dimensionality must match the histogram");
    let total = hist.total();
    if total <= 0.0 {
        return DEFAULT_SELECTIVITY;
    }

    let mut touched = 0.0;
    for (flat, &count) in hist.value.iter().enumerate() {
        let idx = hist.unravel(flat);
        let mut frac = 1.0;
        for d in 0..hist.ndims() {
            let width = hist.cell_width(d);
            let cell_lo = hist.lower[d] + idx[d] as f64 * width;
            frac *= axis_overlap_fraction(cell_lo, width, query[d].0, query[d].1);
            if frac == 0.0 {
                break;
            }
        }
        touched += frac * count;
    }

    (touched / total).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The operator's predicate is `value < bound` (`left`/`before`) or,
    /// for the `over*` variant, `value <= bound`.
    Before,
    /// `value > bound` (`right`/`after`), or `value >= bound` for `over*`.
    After,
}

/// Selectivity of a directional operator restricted to axis `axis` of
/// the histogram (e.g. `left`/`overleft` on the X axis, `before`/`after`
/// on the time axis): sums the fraction of each cell's axis-extent that
/// falls on the query side of `bound`, leaving every other axis
/// unrestricted. `strict` selects the non-`over*` form and applies
/// [`DIRECTIONAL_BOUNDARY_SHIFT`].
pub fn estimate_directional_selectivity(hist: &Histogram, axis: usize, bound: f64, side: Side, strict: bool) -> f64 {
    let total = hist.total();
    if total <= 0.0 {
        return DEFAULT_SELECTIVITY;
    }

    let (q_lo, q_hi) = match side {
        Side::Before => (f64::NEG_INFINITY, bound),
        Side::After => (bound, f64::INFINITY),
    };

    let mut touched = 0.0;
    for (flat, &count) in hist.value.iter().enumerate() {
        let idx = hist.unravel(flat);
        let width = hist.cell_width(axis);
        let cell_lo = hist.lower[axis] + idx[axis] as f64 * width;
        touched += axis_overlap_fraction(cell_lo, width, q_lo, q_hi) * count;
    }

    let raw = (touched / total).clamp(0.0, 1.0);
    if strict {
        (raw * DIRECTIONAL_BOUNDARY_SHIFT).clamp(0.0, 1.0)
    } else {
        raw
    }
}

/// Combines a spatial selectivity with a time-dimension selectivity
/// (from a separate period-bounds histogram) under the independence
/// assumption: their product, clamped to `[0, 1]`.
pub fn combine_spatial_and_time(spatial: f64, time: f64) -> f64 {
    (spatial * time).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_2d(size_x: usize, size_y: usize) -> Histogram {
        Histogram {
            lower: vec![0.0, 0.0],
            upper: vec![10.0, 10.0],
            size: vec![size_x, size_y],
            value: vec![1.0; size_x * size_y],
        }
    }

    #[test]
    fn overlap_selectivity_of_full_extent_is_one() {
        let hist = uniform_2d(4, 4);
        let sel = estimate_overlap_selectivity(&hist, &[(0.0, 10.0), (0.0, 10.0)]);
        assert!((sel - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_selectivity_of_half_extent_is_half() {
        let hist = uniform_2d(4, 4);
        let sel = estimate_overlap_selectivity(&hist, &[(0.0, 5.0), (0.0, 10.0)]);
        assert!((sel - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_histogram_defaults_to_low_selectivity() {
        let hist = Histogram { lower: vec![0.0], upper: vec![10.0], size: vec![4], value: vec![0.0; 4] };
        assert_eq!(estimate_overlap_selectivity(&hist, &[(0.0, 10.0)]), DEFAULT_SELECTIVITY);
    }

    #[test]
    fn strict_directional_is_shifted_relative_to_over_variant() {
        let hist = uniform_2d(4, 4);
        let strict = estimate_directional_selectivity(&hist, 0, 5.0, Side::Before, true);
        let over = estimate_directional_selectivity(&hist, 0, 5.0, Side::Before, false);
        assert!((over - 0.5).abs() < 1e-9);
        assert!((strict - 0.25).abs() < 1e-9);
    }

    #[test]
    fn combine_applies_independence_product() {
        assert!((combine_spatial_and_time(0.5, 0.5) - 0.25).abs() < 1e-9);
        assert_eq!(combine_spatial_and_time(2.0, 2.0), 1.0);
    }
}
