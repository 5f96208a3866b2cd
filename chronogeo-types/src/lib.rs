//! # chronogeo-types
//!
//! Base-value primitives shared by the `chronogeo` temporal type engine:
//!
//! - **Point base value**: [`point::GeomPoint`], an opaque geometry blob
//!   with SRID/hasZ/geodetic metadata and bit-for-bit equality.
//! - **Accumulator base values**: [`accumulator::Double2`],
//!   [`accumulator::Double3`], [`accumulator::Double4`] — the running sums
//!   a centroid aggregation accumulates before its finalizer divides.
//!
//! These are kept in their own crate (mirroring the teacher's
//! `spatio-types` split) because both the core temporal algebra crate and,
//! eventually, independent index/codec crates need them without pulling in
//! the rest of `chronogeo`.

pub mod accumulator;
pub mod point;
