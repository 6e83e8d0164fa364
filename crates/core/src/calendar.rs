//! Calendar position within the current month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Where a date sits inside its month.
///
/// Built once per refresh and shared by every pacing computation, so all
/// derived figures agree on what "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    /// The reference date
    pub date: NaiveDate,

    /// Number of days in the reference month
    pub days_in_month: u32,

    /// Day of month, 1-indexed (day 1 counts as one elapsed day)
    pub days_elapsed: u32,

    /// Days left after today, never negative
    pub days_remaining: u32,
}

impl MonthCalendar {
    /// Derive the calendar position for a date.
    pub fn for_date(date: NaiveDate) -> Self {
        let days_in_month = days_in_month(date.year(), date.month());
        let days_elapsed = date.day();

        Self {
            date,
            days_in_month,
            days_elapsed,
            days_remaining: days_in_month.saturating_sub(days_elapsed),
        }
    }

    /// Fraction of the month that has elapsed, in `(0, 1]`.
    pub fn elapsed_ratio(&self) -> f64 {
        if self.days_in_month == 0 {
            return 0.0;
        }
        self.days_elapsed as f64 / self.days_in_month as f64
    }

    /// True on the last day of the month.
    pub fn is_last_day(&self) -> bool {
        self.days_remaining == 0
    }
}

/// Number of days in a month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        // Out-of-range year or month; fall back to the shortest month.
        _ => 28,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month_lengths() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_first_day_counts_as_elapsed() {
        let cal = MonthCalendar::for_date(date(2025, 6, 1));
        assert_eq!(cal.days_elapsed, 1);
        assert_eq!(cal.days_in_month, 30);
        assert_eq!(cal.days_remaining, 29);
    }

    #[test]
    fn test_last_day_has_no_remaining_days() {
        let cal = MonthCalendar::for_date(date(2024, 2, 29));
        assert_eq!(cal.days_in_month, 29);
        assert_eq!(cal.days_remaining, 0);
        assert!(cal.is_last_day());
    }

    #[test]
    fn test_remaining_is_zero_only_on_last_day() {
        for (year, month) in [(2024, 2), (2025, 2), (2025, 4), (2025, 12)] {
            let len = days_in_month(year, month);
            for day in 1..=len {
                let cal = MonthCalendar::for_date(date(year, month, day));
                assert_eq!(cal.days_remaining, len - day);
                assert_eq!(cal.is_last_day(), day == len);
            }
        }
    }

    #[test]
    fn test_elapsed_ratio() {
        let cal = MonthCalendar::for_date(date(2025, 9, 10));
        assert!((cal.elapsed_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }
}
