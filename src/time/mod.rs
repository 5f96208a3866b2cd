//! Primitive time types: timestamps, calendar intervals, periods, spans,
//! and the timezone cache.

pub mod interval;
pub mod period;
pub mod span;
pub mod timestamp;
pub mod timestamp_set;
pub mod tz;

pub use interval::Interval;
pub use period::{Period, PeriodSet};
pub use span::Range;
pub use timestamp::Timestamp;
pub use timestamp_set::TimestampSet;
