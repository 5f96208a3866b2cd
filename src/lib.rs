//! A temporal type engine for moving points and moving scalars:
//! timestamped trajectories and scalar sequences with synchronization,
//! restriction, aggregation, and spatiotemporal indexing.
//!
//! ```rust
//! use chronogeo::prelude::*;
//!
//! let instants = vec![
//!     Instant::new(GeomPoint::new_2d(0.0, 0.0, 4326), Timestamp::from_micros(0)),
//!     Instant::new(GeomPoint::new_2d(10.0, 0.0, 4326), Timestamp::from_micros(10_000_000)),
//! ];
//! let path = Sequence::new(instants, true, true, Interpolation::Linear)?;
//! assert!((chronogeo::geomops::length(&path) - 10.0).abs() < 1e-9);
//! # Ok::<(), chronogeo::ChronoError>(())
//! ```

pub mod aggregate;
pub mod bbox;
pub mod config;
pub mod error;
pub mod geomops;
#[cfg(feature = "mfjson")]
pub mod mfjson;
pub mod octree;
pub mod parser;
pub mod restrict;
pub mod selectivity;
pub mod sync;
pub mod temporal;
pub mod time;
pub mod value;
pub mod wkb;

pub use bbox::BBox4D;
pub use config::Config;
pub use error::{ChronoError, Result};
pub use temporal::{Instant, InstantSet, Interpolation, Sequence, SequenceSet, Temporal};
pub use time::{Interval, Period, PeriodSet, Range, Timestamp, TimestampSet};
pub use value::BaseValue;

pub use chronogeo_types::accumulator::{Double2, Double3, Double4};
pub use chronogeo_types::point::GeomPoint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for working with temporal points.
pub mod prelude {
    pub use crate::{BBox4D, BaseValue, ChronoError, Config, Result};
    pub use crate::{Instant, InstantSet, Interpolation, Sequence, SequenceSet, Temporal};
    pub use crate::{Interval, Period, PeriodSet, Range, Timestamp, TimestampSet};
    pub use crate::{Double2, Double3, Double4, GeomPoint};

    pub use crate::{geomops, octree, restrict, selectivity, sync};

    #[cfg(feature = "mfjson")]
    pub use crate::mfjson;

    pub use crate::parser::{emit_temporal_point, parse_temporal_point};
    pub use crate::parser::{emit_temporal_float, parse_temporal_float};
    pub use crate::parser::{emit_temporal_int, parse_temporal_int};
    pub use crate::parser::{emit_temporal_text, parse_temporal_text};

    pub use crate::wkb::{from_hexwkb, from_wkb, to_hexwkb, to_wkb};
    pub use crate::wkb::{from_hexwkb_float, from_wkb_float, to_hexwkb_float, to_wkb_float};
    pub use crate::wkb::{from_hexwkb_int, from_wkb_int, to_hexwkb_int, to_wkb_int};
    pub use crate::wkb::{from_hexwkb_text, from_wkb_text, to_hexwkb_text, to_wkb_text};
}
