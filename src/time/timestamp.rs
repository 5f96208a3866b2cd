//! Microsecond-precision timestamps.
//!
//! `Timestamp` is a thin newtype over `i64` microseconds since the Unix
//! epoch. Arithmetic and ISO-8601 parsing delegate to `chrono`, which the
//! teacher never needed (it tracks wall-clock `SystemTime` for TTLs, not
//! microsecond event time) but the MEOS example crates pull in for exactly
//! this purpose.

use crate::error::{ChronoError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Microseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn as_micros(self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_micros())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_micros())
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        Utc.timestamp_micros(self.0)
            .single()
            .expect("microsecond timestamp within chrono's representable range")
    }

    /// Parse the canonical textual form: `YYYY-MM-DD HH:MM:SS[.ffffff]`,
    /// also accepting `T` as the date/time separator (MF-JSON's
    /// `datetimes` convention, per `spec.md` §6.3).
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.replacen('T', " ", 1);
        let trimmed = normalized.trim();

        let formats = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

        for fmt in formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self::from_datetime(naive.and_utc()));
            }
        }

        Err(ChronoError::InvalidTextRepresentation(format!(
            "could not parse timestamp: {s}"
        )))
    }

    pub fn checked_add_micros(self, micros: i64) -> Option<Self> {
        self.0.checked_add(micros).map(Self)
    }

    pub fn checked_sub(self, other: Timestamp) -> Option<i64> {
        self.0.checked_sub(other.0)
    }

    /// Fraction of the way from `self` to `other` that `mid` sits at,
    /// clamped to `[0, 1]`. Used by segment interpolation to recover a
    /// linear parameter `t` from three timestamps.
    pub fn fraction_between(self, other: Timestamp, mid: Timestamp) -> f64 {
        let span = (other.0 - self.0) as f64;
        if span == 0.0 {
            return 0.0;
        }
        ((mid.0 - self.0) as f64 / span).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.to_datetime();
        let micros = self.0.rem_euclid(1_000_000);
        if micros == 0 {
            write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
        } else {
            write!(
                f,
                "{}.{:06}",
                dt.format("%Y-%m-%d %H:%M:%S"),
                micros
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_space_and_t_separator_agree() {
        let a = Timestamp::parse("2001-01-01 00:00:00").unwrap();
        let b = Timestamp::parse("2001-01-01T00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let t = Timestamp::from_micros(978_307_200_500_000);
        let text = t.to_string();
        let back = Timestamp::parse(&text).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn fraction_between_midpoint() {
        let a = Timestamp::from_micros(0);
        let b = Timestamp::from_micros(1_000_000);
        let mid = Timestamp::from_micros(250_000);
        assert!((a.fraction_between(b, mid) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn ordering_is_total() {
        let a = Timestamp::from_micros(1);
        let b = Timestamp::from_micros(2);
        assert!(a < b);
    }
}
