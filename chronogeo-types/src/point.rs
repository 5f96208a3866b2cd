//! The point base-value: an opaque geometry blob with typed accessors.
//!
//! A temporal point's instants hold a `GeomPoint`, never a raw `geo::Point`,
//! so that SRID/hasZ/geodetic metadata travels with every observation and
//! can be checked for agreement across an entire `Sequence` at construction
//! time (see `chronogeo::temporal::sequence`).

use geo::Point;
use serde::{Deserialize, Serialize};

/// A 2D or 3D point carrying its SRID and geodetic flag.
///
/// Two `GeomPoint`s compare equal iff every accessed coordinate compares
/// equal bit-for-bit (`f64::to_bits`), not within some epsilon — this
/// matches the base-value equality contract relied on by `InstantSet`
/// deduplication and `Sequence` normal-form collinearity checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeomPoint {
    x: f64,
    y: f64,
    z: Option<f64>,
    srid: i32,
    geodetic: bool,
}

impl GeomPoint {
    pub fn new_2d(x: f64, y: f64, srid: i32) -> Self {
        Self {
            x,
            y,
            z: None,
            srid,
            geodetic: false,
        }
    }

    pub fn new_3d(x: f64, y: f64, z: f64, srid: i32) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            srid,
            geodetic: false,
        }
    }

    pub fn with_geodetic(mut self, geodetic: bool) -> Self {
        self.geodetic = geodetic;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn geodetic(&self) -> bool {
        self.geodetic
    }

    /// Project to a `geo::Point`, dropping any Z coordinate.
    pub fn get_point2d(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    /// Return `(x, y, z)`, with `z` defaulting to `0.0` for 2D points.
    pub fn get_point3d(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z.unwrap_or(0.0))
    }

    /// Linear interpolation between `self` and `other` at fraction `t` in `[0, 1]`.
    pub fn lerp(&self, other: &GeomPoint, t: f64) -> GeomPoint {
        let x = self.x + (other.x - self.x) * t;
        let y = self.y + (other.y - self.y) * t;
        let z = match (self.z, other.z) {
            (Some(z0), Some(z1)) => Some(z0 + (z1 - z0) * t),
            _ => None,
        };
        GeomPoint {
            x,
            y,
            z,
            srid: self.srid,
            geodetic: self.geodetic,
        }
    }
}

impl PartialEq for GeomPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.map(f64::to_bits) == other.z.map(f64::to_bits)
            && self.srid == other.srid
            && self.geodetic == other.geodetic
    }
}

impl Eq for GeomPoint {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_for_bit_equality() {
        let a = GeomPoint::new_2d(1.0, 2.0, 4326);
        let b = GeomPoint::new_2d(1.0, 2.0, 4326);
        assert_eq!(a, b);
        let c = GeomPoint::new_2d(1.0, 2.0 + f64::EPSILON, 4326);
        assert_ne!(a, c);
    }

    #[test]
    fn lerp_midpoint() {
        let a = GeomPoint::new_2d(0.0, 0.0, 0);
        let b = GeomPoint::new_2d(4.0, 4.0, 0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.x(), 2.0);
        assert_eq!(mid.y(), 2.0);
    }

    #[test]
    fn three_d_round_trip() {
        let p = GeomPoint::new_3d(1.0, 2.0, 3.0, 4326);
        assert!(p.has_z());
        assert_eq!(p.get_point3d(), (1.0, 2.0, 3.0));
    }
}
