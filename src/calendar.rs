//! Calendar month helpers for bucketing transactions and computing the rewards window.

use std::fmt::Display;

use serde::{Serialize, Serializer};
use time::{Date, Month, PrimitiveDateTime};

/// A calendar year and month, e.g. "2024-09".
///
/// Month keys order chronologically and serialize as `"YYYY-MM"` strings, so
/// they can be used directly as JSON object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    /// Create a month key for `month` of `year`.
    pub fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: month.into(),
        }
    }

    /// The calendar month that `datetime` falls in.
    ///
    /// The day and time of day are ignored.
    pub fn of(datetime: PrimitiveDateTime) -> Self {
        Self::new(datetime.year(), datetime.month())
    }

    /// The year of the month key.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the month key as a number from 1 (January) to 12 (December).
    pub fn month_number(&self) -> u8 {
        self.month
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Step back `months` calendar months from `datetime`.
///
/// The time of day is preserved. If the day of the month does not exist in the
/// target month, it is clamped to the last day of that month, e.g. 31 May
/// minus three months is 29 February in a leap year.
///
/// Returns [PrimitiveDateTime::MIN] if the result would be before the earliest
/// representable date.
pub fn months_before(datetime: PrimitiveDateTime, months: u8) -> PrimitiveDateTime {
    let month_index =
        datetime.year() * 12 + i32::from(u8::from(datetime.month())) - 1 - i32::from(months);
    let year = month_index.div_euclid(12);
    let month_number = month_index.rem_euclid(12) as u8 + 1;

    Month::try_from(month_number)
        .ok()
        .and_then(|month| {
            let day = datetime.day().min(last_day_of_month(year, month));
            Date::from_calendar_date(year, month, day).ok()
        })
        .map(|date| PrimitiveDateTime::new(date, datetime.time()))
        .unwrap_or(PrimitiveDateTime::MIN)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use time::{Month, PrimitiveDateTime, macros::datetime};

    use super::{MonthKey, months_before};

    #[test]
    fn month_key_ignores_day_and_time() {
        let early = MonthKey::of(datetime!(2024-09-01 00:00:00));
        let late = MonthKey::of(datetime!(2024-09-30 23:59:59.999));

        assert_eq!(early, late);
        assert_eq!(early, MonthKey::new(2024, Month::September));
    }

    #[test]
    fn month_key_formats_as_year_dash_month() {
        assert_eq!(MonthKey::new(2024, Month::September).to_string(), "2024-09");
        assert_eq!(MonthKey::new(987, Month::December).to_string(), "0987-12");
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let mut keys = vec![
            MonthKey::new(2025, Month::January),
            MonthKey::new(2024, Month::December),
            MonthKey::new(2024, Month::February),
        ];

        keys.sort();

        assert_eq!(
            keys,
            vec![
                MonthKey::new(2024, Month::February),
                MonthKey::new(2024, Month::December),
                MonthKey::new(2025, Month::January),
            ]
        );
    }

    #[test]
    fn month_key_serializes_as_string() {
        let json = serde_json::to_string(&MonthKey::new(2024, Month::March)).unwrap();

        assert_eq!(json, "\"2024-03\"");
    }

    #[test]
    fn months_before_keeps_day_and_time() {
        let got = months_before(datetime!(2024-09-15 13:45:10.5), 3);

        assert_eq!(got, datetime!(2024-06-15 13:45:10.5));
    }

    #[test]
    fn months_before_crosses_year_boundary() {
        let got = months_before(datetime!(2025-02-10 08:00), 3);

        assert_eq!(got, datetime!(2024-11-10 08:00));
    }

    #[test]
    fn months_before_clamps_to_end_of_shorter_month() {
        assert_eq!(
            months_before(datetime!(2024-05-31 12:00), 3),
            datetime!(2024-02-29 12:00)
        );
        assert_eq!(
            months_before(datetime!(2023-05-31 12:00), 3),
            datetime!(2023-02-28 12:00)
        );
        assert_eq!(
            months_before(datetime!(2024-12-31 12:00), 3),
            datetime!(2024-09-30 12:00)
        );
    }

    #[test]
    fn months_before_zero_is_identity() {
        let datetime = datetime!(2024-01-31 00:00);

        assert_eq!(months_before(datetime, 0), datetime);
    }

    #[test]
    fn months_before_saturates_at_earliest_date() {
        assert_eq!(
            months_before(PrimitiveDateTime::MIN, 3),
            PrimitiveDateTime::MIN
        );
    }
}
