//! `BBox4D`: a 4D closed interval over `(x, y, z, t)`.
//!
//! Generalizes the teacher's 2D `bounding_box`/`point_in_bbox`
//! (`src/spatial.rs`) from a planar `geo::Rect` to four axes with `±∞`
//! sentinels on dimensions a value does not carry (no Z, no spatial
//! component at all, or — in principle — no time component).

use crate::time::{Interval, Period, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox4D {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub tmin: i64,
    pub tmax: i64,
    pub has_x: bool,
    pub has_z: bool,
    pub has_t: bool,
    pub geodetic: bool,
}

impl BBox4D {
    pub fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
            zmin: f64::INFINITY,
            zmax: f64::NEG_INFINITY,
            tmin: i64::MAX,
            tmax: i64::MIN,
            has_x: false,
            has_z: false,
            has_t: false,
            geodetic: false,
        }
    }

    pub fn from_point_time(x: f64, y: f64, z: Option<f64>, t: Timestamp, geodetic: bool) -> Self {
        Self {
            xmin: x,
            xmax: x,
            ymin: y,
            ymax: y,
            zmin: z.unwrap_or(0.0),
            zmax: z.unwrap_or(0.0),
            tmin: t.as_micros(),
            tmax: t.as_micros(),
            has_x: true,
            has_z: z.is_some(),
            has_t: true,
            geodetic,
        }
    }

    pub fn from_timestamp(t: Timestamp) -> Self {
        Self {
            tmin: t.as_micros(),
            tmax: t.as_micros(),
            has_t: true,
            ..Self::empty()
        }
    }

    pub fn from_period(p: &Period) -> Self {
        Self {
            tmin: p.lower().as_micros(),
            tmax: p.upper().as_micros(),
            has_t: true,
            ..Self::empty()
        }
    }

    /// In-place expansion of `self` to also cover `other`.
    pub fn union(&mut self, other: &BBox4D) {
        if other.has_x {
            self.xmin = self.xmin.min(other.xmin);
            self.xmax = self.xmax.max(other.xmax);
            self.ymin = self.ymin.min(other.ymin);
            self.ymax = self.ymax.max(other.ymax);
            self.has_x = true;
        }
        if other.has_z {
            self.zmin = self.zmin.min(other.zmin);
            self.zmax = self.zmax.max(other.zmax);
            self.has_z = true;
        }
        if other.has_t {
            self.tmin = self.tmin.min(other.tmin);
            self.tmax = self.tmax.max(other.tmax);
            self.has_t = true;
        }
        if other.has_x || other.has_z {
            self.geodetic = other.geodetic;
        }
    }

    pub fn union_copy(a: &BBox4D, b: &BBox4D) -> BBox4D {
        let mut out = *a;
        out.union(b);
        out
    }

    fn geodetic_compatible(&self, other: &BBox4D) -> bool {
        !(self.has_x && other.has_x && self.geodetic != other.geodetic)
    }

    pub fn contains(&self, other: &BBox4D) -> bool {
        if !self.geodetic_compatible(other) {
            return false;
        }
        let x_ok = !other.has_x || (self.has_x && self.xmin <= other.xmin && other.xmax <= self.xmax
            && self.ymin <= other.ymin && other.ymax <= self.ymax);
        let z_ok = !other.has_z || (self.has_z && self.zmin <= other.zmin && other.zmax <= self.zmax);
        let t_ok = !other.has_t || (self.has_t && self.tmin <= other.tmin && other.tmax <= self.tmax);
        x_ok && z_ok && t_ok
    }

    pub fn contained(&self, other: &BBox4D) -> bool {
        other.contains(self)
    }

    pub fn overlaps(&self, other: &BBox4D) -> bool {
        if !self.geodetic_compatible(other) {
            return false;
        }
        let x_ok = !self.has_x || !other.has_x || (self.xmin <= other.xmax && other.xmin <= self.xmax
            && self.ymin <= other.ymax && other.ymin <= self.ymax);
        let z_ok = !self.has_z || !other.has_z || (self.zmin <= other.zmax && other.zmin <= self.zmax);
        let t_ok = !self.has_t || !other.has_t || (self.tmin <= other.tmax && other.tmin <= self.tmax);
        x_ok && z_ok && t_ok
    }

    pub fn same(&self, other: &BBox4D) -> bool {
        if !self.geodetic_compatible(other) {
            return false;
        }
        let x_ok = self.has_x != other.has_x
            || (self.xmin == other.xmin && self.xmax == other.xmax && self.ymin == other.ymin && self.ymax == other.ymax);
        let z_ok = self.has_z != other.has_z || (self.zmin == other.zmin && self.zmax == other.zmax);
        let t_ok = self.has_t != other.has_t || (self.tmin == other.tmin && self.tmax == other.tmax);
        x_ok && z_ok && t_ok
    }

    /// `a` lies strictly before `b` in time: `a.tmax < b.tmin`. Missing
    /// time extent on either side makes the predicate moot (`true`,
    /// matching `contains`/`overlaps`'s "ignore" treatment of absent axes).
    pub fn before(&self, other: &BBox4D) -> bool {
        !self.has_t || !other.has_t || self.tmax < other.tmin
    }

    pub fn after(&self, other: &BBox4D) -> bool {
        !self.has_t || !other.has_t || self.tmin > other.tmax
    }

    pub fn overbefore(&self, other: &BBox4D) -> bool {
        !self.has_t || !other.has_t || self.tmax <= other.tmax
    }

    pub fn overafter(&self, other: &BBox4D) -> bool {
        !self.has_t || !other.has_t || self.tmin >= other.tmin
    }

    /// `a` lies strictly to the left of `b` on the X axis: `a.xmax < b.xmin`.
    pub fn left(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.xmax < other.xmin
    }

    pub fn right(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.xmin > other.xmax
    }

    pub fn overleft(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.xmax <= other.xmax
    }

    pub fn overright(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.xmin >= other.xmin
    }

    /// `a` lies strictly below `b` on the Y axis: `a.ymax < b.ymin`.
    pub fn below(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.ymax < other.ymin
    }

    pub fn above(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.ymin > other.ymax
    }

    pub fn overbelow(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.ymax <= other.ymax
    }

    pub fn overabove(&self, other: &BBox4D) -> bool {
        !self.has_x || !other.has_x || self.ymin >= other.ymin
    }

    /// `a` lies strictly in front of `b` on the Z axis: `a.zmax < b.zmin`.
    pub fn front(&self, other: &BBox4D) -> bool {
        !self.has_z || !other.has_z || self.zmax < other.zmin
    }

    pub fn back(&self, other: &BBox4D) -> bool {
        !self.has_z || !other.has_z || self.zmin > other.zmax
    }

    pub fn overfront(&self, other: &BBox4D) -> bool {
        !self.has_z || !other.has_z || self.zmax <= other.zmax
    }

    pub fn overback(&self, other: &BBox4D) -> bool {
        !self.has_z || !other.has_z || self.zmin >= other.zmin
    }

    /// Zero if overlapping; `+inf` if the time intervals are disjoint;
    /// otherwise the 2D/3D Euclidean distance in space, computed with a
    /// numerically-robust scale-and-add hypotenuse (`spec.md` §9).
    pub fn distance(&self, other: &BBox4D) -> f64 {
        if self.has_t && other.has_t && (self.tmax < other.tmin || other.tmax < self.tmin) {
            return f64::INFINITY;
        }
        if self.overlaps(other) {
            return 0.0;
        }
        if !self.has_x || !other.has_x {
            return 0.0;
        }
        let dx = axis_gap(self.xmin, self.xmax, other.xmin, other.xmax);
        let dy = axis_gap(self.ymin, self.ymax, other.ymin, other.ymax);
        if self.has_z && other.has_z {
            let dz = axis_gap(self.zmin, self.zmax, other.zmin, other.zmax);
            hypot3(dx, dy, dz)
        } else {
            dx.hypot(dy)
        }
    }

    pub fn expand_spatial(&mut self, d: f64) {
        if self.has_x {
            self.xmin -= d;
            self.xmax += d;
            self.ymin -= d;
            self.ymax += d;
        }
        if self.has_z {
            self.zmin -= d;
            self.zmax += d;
        }
    }

    pub fn expand_temporal(&mut self, interval: Interval) {
        if self.has_t {
            let lo = Timestamp::from_micros(self.tmin);
            let hi = Timestamp::from_micros(self.tmax);
            self.tmin = interval.apply(lo).as_micros().min(self.tmin);
            self.tmax = interval.apply(hi).as_micros().max(self.tmax);
        }
    }
}

fn axis_gap(amin: f64, amax: f64, bmin: f64, bmax: f64) -> f64 {
    if amax < bmin {
        bmin - amax
    } else if bmax < amin {
        amin - bmax
    } else {
        0.0
    }
}

/// Scale-and-add 3D hypotenuse, avoiding overflow for very large
/// components (`spec.md` §9's `distance_gbox_gbox` numeric semantics).
fn hypot3(x: f64, y: f64, z: f64) -> f64 {
    let m = x.abs().max(y.abs()).max(z.abs());
    if m == 0.0 {
        return 0.0;
    }
    let (nx, ny, nz) = (x / m, y / m, z / m);
    m * (nx * nx + ny * ny + nz * nz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_have_zero_distance() {
        let a = BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(0), false);
        let b = BBox4D::from_point_time(0.5, 0.5, None, Timestamp::from_micros(0), false);
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn disjoint_time_is_infinite_distance() {
        let mut a = BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(0), false);
        a.union(&BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(1), false));
        let mut b = BBox4D::from_point_time(10.0, 10.0, None, Timestamp::from_micros(100), false);
        b.union(&BBox4D::from_point_time(10.0, 10.0, None, Timestamp::from_micros(200), false));
        assert!(a.distance(&b).is_infinite());
    }

    #[test]
    fn spatial_distance_uses_euclidean_gap() {
        let a = BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(0), false);
        let b = BBox4D::from_point_time(3.0, 4.0, None, Timestamp::from_micros(0), false);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn geodetic_mismatch_fails_every_comparator() {
        let a = BBox4D {
            geodetic: true,
            ..BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(0), true)
        };
        let b = BBox4D::from_point_time(0.0, 0.0, None, Timestamp::from_micros(0), false);
        assert!(!a.overlaps(&b));
        assert!(!a.contains(&b));
        assert!(!a.same(&b));
    }

    #[test]
    fn union_ignores_missing_dimensions() {
        let mut a = BBox4D::from_timestamp(Timestamp::from_micros(0));
        let b = BBox4D::from_point_time(1.0, 2.0, None, Timestamp::from_micros(10), false);
        a.union(&b);
        assert!(a.has_x);
        assert_eq!(a.tmin, 0);
        assert_eq!(a.tmax, 10);
    }
}
