//! # Stay Dates
//!
//! A validated `[check_in, check_out)` range of calendar dates.
//!
//! ## The Half-Open Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two ranges [a, b) and [c, d) overlap  ⇔  a < d  AND  c < b            │
//! │                                                                         │
//! │  Jan 10 ───── Jan 12                                                    │
//! │               Jan 12 ───── Jan 14     same-day turnover: NO overlap     │
//! │                                                                         │
//! │  Jan 10 ───── Jan 12                                                    │
//! │        Jan 11 ───── Jan 13            shares night of Jan 11: OVERLAP   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same predicate is written in SQL by the room repository; this type is
//! the in-memory form used for validation and tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, CoreError};
use crate::validation::{parse_date, ValidationResult};

/// A stay of at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Creates a stay, rejecting `check_in >= check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<Self> {
        if check_in >= check_out {
            return Err(ValidationError::InvalidDateRange {
                start_field: "check_in".to_string(),
                end_field: "check_out".to_string(),
            });
        }
        Ok(StayDates {
            check_in,
            check_out,
        })
    }

    /// Parses a stay from two `YYYY-MM-DD` strings.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::stay::StayDates;
    ///
    /// let stay = StayDates::parse("2024-01-10", "2024-01-12").unwrap();
    /// assert_eq!(stay.nights(), 2);
    /// assert!(StayDates::parse("2024-01-12", "2024-01-10").is_err());
    /// ```
    pub fn parse(check_in: &str, check_out: &str) -> ValidationResult<Self> {
        let check_in = parse_date("check_in", check_in)?;
        let check_out = parse_date("check_out", check_out)?;
        StayDates::new(check_in, check_out)
    }

    /// Wraps dates already known to be ordered (e.g. loaded from storage,
    /// where a CHECK constraint enforces it).
    pub(crate) fn from_validated(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        StayDates {
            check_in,
            check_out,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights, `(check_out - check_in) / 1 day`.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Same as [`nights`](Self::nights) but refuses a non-positive count.
    pub fn billable_nights(&self) -> Result<i64, CoreError> {
        let nights = self.nights();
        if nights <= 0 {
            return Err(CoreError::NonPositiveNights { nights });
        }
        Ok(nights)
    }

    /// Half-open overlap test against another `[start, end)` range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.check_in < end && start < self.check_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(StayDates::new(date("2024-01-10"), date("2024-01-10")).is_err());
        assert!(StayDates::new(date("2024-01-11"), date("2024-01-10")).is_err());
        assert!(StayDates::new(date("2024-01-10"), date("2024-01-11")).is_ok());
    }

    #[test]
    fn test_nights_across_month_boundary() {
        let stay = StayDates::new(date("2024-01-30"), date("2024-02-02")).unwrap();
        assert_eq!(stay.nights(), 3);
        assert_eq!(stay.billable_nights().unwrap(), 3);
    }

    #[test]
    fn test_same_day_turnover_is_not_overlap() {
        let stay = StayDates::new(date("2024-01-10"), date("2024-01-12")).unwrap();
        assert!(!stay.overlaps(date("2024-01-12"), date("2024-01-14")));
        assert!(!stay.overlaps(date("2024-01-08"), date("2024-01-10")));
        assert!(stay.overlaps(date("2024-01-11"), date("2024-01-13")));
        assert!(stay.overlaps(date("2024-01-01"), date("2024-01-31")));
    }

    #[test]
    fn test_parse_rejects_malformed_dates() {
        assert!(matches!(
            StayDates::parse("2024-13-01", "2024-13-05"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(StayDates::parse("10/01/2024", "2024-01-12").is_err());
    }
}
