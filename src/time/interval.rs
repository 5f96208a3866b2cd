//! Calendar intervals: `(months, days, microseconds)` triples.
//!
//! Kept separate from a plain microsecond delta because month/day
//! components are calendar-relative (a month is not a fixed number of
//! microseconds) — `shift` on a temporal value applies the triple in the
//! conventional months-then-days-then-micros order via `chrono`.

use chrono::{Datelike, Duration as ChronoDuration, Months, Utc};

use crate::time::timestamp::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub micros: i64,
}

impl Interval {
    pub fn new(months: i32, days: i32, micros: i64) -> Self {
        Self {
            months,
            days,
            micros,
        }
    }

    pub fn from_micros(micros: i64) -> Self {
        Self {
            months: 0,
            days: 0,
            micros,
        }
    }

    /// Apply the interval to a timestamp: months, then days, then micros.
    pub fn apply(self, ts: Timestamp) -> Timestamp {
        let mut dt = ts.to_datetime();

        if self.months != 0 {
            dt = if self.months > 0 {
                dt.checked_add_months(Months::new(self.months as u32))
                    .unwrap_or(dt)
            } else {
                dt.checked_sub_months(Months::new((-self.months) as u32))
                    .unwrap_or(dt)
            };
        }
        if self.days != 0 {
            dt += ChronoDuration::days(self.days as i64);
        }
        if self.micros != 0 {
            dt += ChronoDuration::microseconds(self.micros);
        }

        Timestamp::from_datetime(dt)
    }

    /// True iff this interval carries no calendar component, i.e. it is a
    /// plain fixed-length duration (safe to apply to any timestamp without
    /// month-length ambiguity).
    pub fn is_fixed_length(self) -> bool {
        self.months == 0
    }
}

/// Helper retained for symmetry with calendar month arithmetic above;
/// not part of the public API surface, used only by tests.
#[cfg(test)]
fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap();
    let first = chrono::NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    (next - first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_length_micros_only() {
        let iv = Interval::from_micros(1_000_000);
        assert!(iv.is_fixed_length());
        let t0 = Timestamp::from_micros(0);
        assert_eq!(iv.apply(t0).as_micros(), 1_000_000);
    }

    #[test]
    fn month_shift_respects_calendar() {
        let iv = Interval::new(1, 0, 0);
        let jan15 = Timestamp::parse("2001-01-15 00:00:00").unwrap();
        let shifted = iv.apply(jan15);
        let dt = shifted.to_datetime();
        assert_eq!(dt.month(), 2);
        assert_eq!(dt.day(), 15);
        assert_eq!(days_in_month(2001, 2), 28);
    }
}
