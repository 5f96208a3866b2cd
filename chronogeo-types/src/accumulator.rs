//! Internal accumulator base-value types: `double2`/`double3`/`double4`.
//!
//! These are never user-facing value types; they are the running sums a
//! centroid aggregation transition builds up before the finalizer divides
//! by the observation count. `Double4` additionally carries the count so
//! a `final` step never needs a second accumulator.

use serde::{Deserialize, Serialize};
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Double2 {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Double3 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Sum-of-x, sum-of-y, sum-of-z (optional) and running count, used as the
/// centroid transition's accumulator for both 2D and 3D points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Double4 {
    pub sx: f64,
    pub sy: f64,
    pub sz: Option<f64>,
    pub count: u64,
}

impl Double2 {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Double3 {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl Double4 {
    pub fn from_point(x: f64, y: f64, z: Option<f64>) -> Self {
        Self {
            sx: x,
            sy: y,
            sz: z,
            count: 1,
        }
    }

    pub fn zero(has_z: bool) -> Self {
        Self {
            sx: 0.0,
            sy: 0.0,
            sz: has_z.then_some(0.0),
            count: 0,
        }
    }

    pub fn has_z(&self) -> bool {
        self.sz.is_some()
    }

    /// Divide the sums by the count, yielding `(x, y, z)`. `None` when `count == 0`.
    pub fn finalize(&self) -> Option<(f64, f64, Option<f64>)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sx / n, self.sy / n, self.sz.map(|s| s / n)))
    }
}

impl Add for Double2 {
    type Output = Double2;
    fn add(self, rhs: Double2) -> Double2 {
        Double2::new(self.a + rhs.a, self.b + rhs.b)
    }
}

impl Add for Double3 {
    type Output = Double3;
    fn add(self, rhs: Double3) -> Double3 {
        Double3::new(self.a + rhs.a, self.b + rhs.b, self.c + rhs.c)
    }
}

impl Add for Double4 {
    type Output = Double4;
    fn add(self, rhs: Double4) -> Double4 {
        Double4 {
            sx: self.sx + rhs.sx,
            sy: self.sy + rhs.sy,
            sz: match (self.sz, rhs.sz) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            },
            count: self.count + rhs.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double4_add_and_finalize() {
        let a = Double4::from_point(0.0, 0.0, None);
        let b = Double4::from_point(2.0, 0.0, None);
        let c = Double4::from_point(0.0, 2.0, None);
        let sum = a + b + c;
        let (x, y, z) = sum.finalize().unwrap();
        assert!((x - 2.0 / 3.0).abs() < 1e-12);
        assert!((y - 2.0 / 3.0).abs() < 1e-12);
        assert!(z.is_none());
    }

    #[test]
    fn double4_empty_finalizes_to_none() {
        let empty = Double4::zero(false);
        assert!(empty.finalize().is_none());
    }
}
