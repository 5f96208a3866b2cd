//! Base-value traits (`spec.md` §4.B).
//!
//! Every temporal variant is generic over a base value type `V: BaseValue`.
//! `V::CONTINUOUS` decides whether adjacent instants interpolate linearly
//! (floats, points) or step (ints, text); `cmp_value` gives the total order
//! `InstantSet` construction needs for sorting and
//! `datum_remove_duplicates`.

use chronogeo_types::accumulator::{Double2, Double3, Double4};
use chronogeo_types::point::GeomPoint;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Per-scalar-type operations the temporal algebra depends on.
pub trait BaseValue: Clone + Debug + PartialEq {
    /// Whether this type supports continuous (linear) interpolation
    /// between instants, vs. stepwise-constant interpolation.
    const CONTINUOUS: bool;

    /// Linear interpolation at fraction `t` in `[0, 1]`. Only ever called
    /// when `CONTINUOUS` is true.
    fn interpolate(&self, other: &Self, t: f64) -> Self;

    /// Total order used by `InstantSet` sorting and
    /// `datum_remove_duplicates`; for floats this routes through
    /// `partial_cmp` defaulting ties/NaN to `Equal`, matching the
    /// teacher's `knn`/`spatial` sort discipline (`src/spatial.rs`).
    fn cmp_value(&self, other: &Self) -> Ordering;

    /// `(x, y, z)` for point types; `None` for scalar types.
    fn spatial_coords(&self) -> Option<(f64, f64, Option<f64>)> {
        None
    }

    fn srid(&self) -> Option<i32> {
        None
    }

    fn geodetic(&self) -> bool {
        false
    }

    /// Tolerant equality used by redundant-instant removal
    /// (`spec.md` §4.C's collinearity rule). Defaults to exact
    /// `PartialEq`; continuous numeric types override it with an
    /// epsilon, since a recomputed linear interpolant rarely lands on
    /// the exact same bit pattern as the stored value.
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }

    /// The fraction `s` in `(0, 1)` at which the segment from `a0` to `a1`
    /// (under this type's own `interpolate`) passes through `target`, if
    /// any. Used by `restrict::at_value`/`minus_value` to insert the
    /// interior crossing instant a restriction to an interior value needs
    /// (`spec.md` §4.G). Defaults to `None`: non-continuous types only
    /// ever equal a target at a sampled instant, never strictly between
    /// two of them.
    fn crossing_fraction(_a0: &Self, _a1: &Self, _target: &Self) -> Option<f64> {
        None
    }
}

const COLLINEAR_EPS: f64 = 1e-9;

impl BaseValue for i64 {
    const CONTINUOUS: bool = false;

    fn interpolate(&self, _other: &Self, _t: f64) -> Self {
        *self
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl BaseValue for f64 {
    const CONTINUOUS: bool = true;

    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < COLLINEAR_EPS
    }

    fn crossing_fraction(a0: &Self, a1: &Self, target: &Self) -> Option<f64> {
        crate::sync::linear_equality_crossing(*a0, *a1, *target, *target)
    }
}

impl BaseValue for String {
    const CONTINUOUS: bool = false;

    fn interpolate(&self, _other: &Self, _t: f64) -> Self {
        self.clone()
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl BaseValue for GeomPoint {
    const CONTINUOUS: bool = true;

    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(other, t)
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        self.x()
            .partial_cmp(&other.x())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.y().partial_cmp(&other.y()).unwrap_or(Ordering::Equal))
            .then_with(|| {
                self.z()
                    .unwrap_or(0.0)
                    .partial_cmp(&other.z().unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
    }

    fn spatial_coords(&self) -> Option<(f64, f64, Option<f64>)> {
        Some((self.x(), self.y(), self.z()))
    }

    fn srid(&self) -> Option<i32> {
        Some(self.srid())
    }

    fn geodetic(&self) -> bool {
        self.geodetic()
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self.x() - other.x()).abs() < COLLINEAR_EPS
            && (self.y() - other.y()).abs() < COLLINEAR_EPS
            && match (self.z(), other.z()) {
                (Some(a), Some(b)) => (a - b).abs() < COLLINEAR_EPS,
                (None, None) => true,
                _ => false,
            }
    }

    /// Solves for the fraction at which the chord from `a0` to `a1` passes
    /// through `target`, picking whichever axis moves most over the
    /// segment to avoid dividing by a near-zero delta, then verifying the
    /// other axes agree with the same fraction — a point off the chord's
    /// line has no solution even if one axis alone would match.
    fn crossing_fraction(a0: &Self, a1: &Self, target: &Self) -> Option<f64> {
        let dx = a1.x() - a0.x();
        let dy = a1.y() - a0.y();
        let s = if dx.abs() >= dy.abs() && dx.abs() > COLLINEAR_EPS {
            (target.x() - a0.x()) / dx
        } else if dy.abs() > COLLINEAR_EPS {
            (target.y() - a0.y()) / dy
        } else {
            return None;
        };
        if !(s > 1e-9 && s < 1.0 - 1e-9) {
            return None;
        }
        a0.interpolate(a1, s).approx_eq(target).then_some(s)
    }
}

macro_rules! impl_base_value_for_accumulator {
    ($ty:ty, $($field:ident),+) => {
        impl BaseValue for $ty {
            const CONTINUOUS: bool = true;

            fn interpolate(&self, other: &Self, t: f64) -> Self {
                let mut out = *self;
                $(
                    out.$field = self.$field + (other.$field - self.$field) * t;
                )+
                out
            }

            fn cmp_value(&self, other: &Self) -> Ordering {
                Ordering::Equal
                    $(.then_with(|| self.$field.partial_cmp(&other.$field).unwrap_or(Ordering::Equal)))+
            }
        }
    };
}

impl_base_value_for_accumulator!(Double2, a, b);
impl_base_value_for_accumulator!(Double3, a, b, c);

impl BaseValue for Double4 {
    const CONTINUOUS: bool = true;

    fn interpolate(&self, other: &Self, t: f64) -> Self {
        Double4 {
            sx: self.sx + (other.sx - self.sx) * t,
            sy: self.sy + (other.sy - self.sy) * t,
            sz: match (self.sz, other.sz) {
                (Some(a), Some(b)) => Some(a + (b - a) * t),
                _ => None,
            },
            count: self.count,
        }
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        self.sx
            .partial_cmp(&other.sx)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.sy.partial_cmp(&other.sy).unwrap_or(Ordering::Equal))
            .then_with(|| self.count.cmp(&other.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_is_step_interpolated() {
        assert!(!i64::CONTINUOUS);
        assert_eq!(5i64.interpolate(&9, 0.5), 5);
    }

    #[test]
    fn float_interpolates_linearly() {
        assert!(f64::CONTINUOUS);
        assert_eq!(0.0f64.interpolate(&10.0, 0.25), 2.5);
    }

    #[test]
    fn point_cmp_is_total_order() {
        let a = GeomPoint::new_2d(0.0, 0.0, 0);
        let b = GeomPoint::new_2d(1.0, 0.0, 0);
        assert_eq!(a.cmp_value(&b), Ordering::Less);
    }
}
